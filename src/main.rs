//! `generate_planet` command-line tool
//!
//! Command-line values override the config file, which overrides defaults.
//! `--input` loads an existing planet file and prints its summary.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use icosphere_planet::tectonics::CratonStrategy;
use icosphere_planet::{
    ConfigOverrides, ExportStrategy, MeshStrategy, Pipeline, Planet, Result,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Procedural icosphere planet generator.
#[derive(Parser, Debug)]
#[command(name = "generate_planet")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the generated planet to this file.
    #[arg(long)]
    output: Option<PathBuf>,

    /// Load an existing planet file and print its summary.
    #[arg(long, conflicts_with = "output")]
    input: Option<PathBuf>,

    /// Planet radius in kilometers.
    #[arg(long)]
    radius: Option<f64>,

    /// Mesh subdivision level.
    #[arg(long, allow_negative_numbers = true)]
    subdivision: Option<i32>,

    /// Random seed for deterministic generation.
    #[arg(long)]
    seed: Option<u64>,

    /// Mesh generation strategy (icosphere).
    #[arg(long)]
    strategy: Option<MeshStrategy>,

    /// Craton seeding strategy (spaced_random, pairwise_rejection).
    #[arg(long = "craton_strategy")]
    craton_strategy: Option<CratonStrategy>,

    /// Number of cratons to place.
    #[arg(long = "craton_count")]
    craton_count: Option<usize>,

    /// Scale factor for the derived craton spacing.
    #[arg(long = "craton_spacing")]
    craton_spacing: Option<f64>,

    /// Export strategy (binary).
    #[arg(long = "export_strategy")]
    export_strategy: Option<ExportStrategy>,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            radius: self.radius,
            subdivision_level: self.subdivision,
            seed: self.seed,
            mesh_strategy: self.strategy,
            craton_strategy: self.craton_strategy,
            craton_count: self.craton_count,
            craton_spacing: self.craton_spacing,
            export_strategy: self.export_strategy,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "icosphere_planet=debug,generate_planet=debug"
    } else {
        "icosphere_planet=info,generate_planet=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    if let Some(input) = &cli.input {
        let planet = Planet::load(input)?;
        println!("{}", planet.summary());
        return Ok(());
    }

    let config = cli.overrides().resolve(cli.config.as_deref())?;
    if let Some(path) = &cli.config {
        info!(path = %path.display(), "loaded config");
    }

    let planet = Pipeline::from_config(&config).run(cli.output.as_deref())?;
    info!("planet generated:\n{}", planet.summary());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_overrides() {
        let cli = Cli::try_parse_from([
            "generate_planet",
            "--radius",
            "1000",
            "--subdivision",
            "4",
            "--seed",
            "7",
            "--strategy",
            "icosphere",
            "--craton_strategy",
            "pairwise_rejection",
            "--craton_count",
            "6",
            "--craton_spacing",
            "0.5",
            "--output",
            "out.bin",
            "--verbose",
        ])
        .unwrap();

        let overrides = cli.overrides();
        assert_eq!(overrides.radius, Some(1000.0));
        assert_eq!(overrides.subdivision_level, Some(4));
        assert_eq!(overrides.seed, Some(7));
        assert_eq!(overrides.mesh_strategy, Some(MeshStrategy::Icosphere));
        assert_eq!(overrides.craton_strategy, Some(CratonStrategy::PairwiseRejection));
        assert_eq!(overrides.craton_count, Some(6));
        assert_eq!(overrides.craton_spacing, Some(0.5));
        assert_eq!(cli.output, Some(PathBuf::from("out.bin")));
        assert!(cli.verbose);
    }

    #[test]
    fn test_defaults_leave_config_untouched() {
        let cli = Cli::try_parse_from(["generate_planet"]).unwrap();
        assert_eq!(cli.overrides(), ConfigOverrides::default());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_parse_errors() {
        assert!(Cli::try_parse_from(["generate_planet", "--seed"]).is_err());
        assert!(Cli::try_parse_from(["generate_planet", "--seed", "abc"]).is_err());
        assert!(Cli::try_parse_from(["generate_planet", "--strategy", "cube"]).is_err());
        assert!(Cli::try_parse_from(["generate_planet", "--export_strategy", "hdf5"]).is_err());
        assert!(Cli::try_parse_from(["generate_planet", "--bogus"]).is_err());
    }

    #[test]
    fn test_input_conflicts_with_output() {
        let result = Cli::try_parse_from([
            "generate_planet",
            "--input",
            "a.bin",
            "--output",
            "b.bin",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_subdivision_parses() {
        let cli = Cli::try_parse_from(["generate_planet", "--subdivision", "-1"]).unwrap();
        assert_eq!(cli.overrides().subdivision_level, Some(-1));
    }

    #[test]
    fn test_command_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
