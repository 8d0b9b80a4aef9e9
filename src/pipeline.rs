//! Generation pipeline: mesh, craton and export stages
//!
//! Each stage takes ownership of the [`Planet`], updates it and hands it back,
//! so exactly one stage holds the planet at a time. Strategy names are parsed
//! into closed enums once, when the pipeline is configured.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::{CratonSeedingConfig, PlanetConfig};
use crate::error::{PlanetError, Result};
use crate::geometry::{generate_icosphere, RelaxOptions};
use crate::planet::Planet;
use crate::tectonics::CratonSeeder;

/// Mesh generation strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshStrategy {
    /// Subdivided icosahedron projected onto the sphere
    #[default]
    Icosphere,
}

impl MeshStrategy {
    /// Registry name of the strategy
    pub fn name(self) -> &'static str {
        match self {
            MeshStrategy::Icosphere => "icosphere",
        }
    }
}

impl fmt::Display for MeshStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for MeshStrategy {
    type Err = PlanetError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "icosphere" => Ok(MeshStrategy::Icosphere),
            other => Err(PlanetError::InvalidConfig(format!(
                "unknown mesh strategy: {}",
                other
            ))),
        }
    }
}

/// Planet export strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportStrategy {
    /// Versioned binary planet file
    #[default]
    Binary,
}

impl ExportStrategy {
    /// Registry name of the strategy
    pub fn name(self) -> &'static str {
        match self {
            ExportStrategy::Binary => "binary",
        }
    }
}

impl fmt::Display for ExportStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ExportStrategy {
    type Err = PlanetError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "binary" => Ok(ExportStrategy::Binary),
            other => Err(PlanetError::InvalidConfig(format!(
                "unknown export strategy: {}",
                other
            ))),
        }
    }
}

/// Resolved mesh stage parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshStage {
    pub strategy: MeshStrategy,
    pub relax: RelaxOptions,
}

impl MeshStage {
    /// Mesh stage parameters from a planet configuration
    pub fn from_config(config: &PlanetConfig) -> Self {
        Self {
            strategy: config.mesh_strategy,
            relax: RelaxOptions::iterations(config.relax_iterations),
        }
    }
}

impl Default for MeshStage {
    fn default() -> Self {
        Self {
            strategy: MeshStrategy::default(),
            relax: RelaxOptions::default(),
        }
    }
}

/// Generate the planet's mesh, replacing any existing one
///
/// # Errors
///
/// Returns `InvalidSubdivision` or `SubdivisionTooLarge` for an out-of-range
/// subdivision level and `InvalidConfig` for a negative or non-finite radius.
pub fn run_mesh(mut planet: Planet, stage: &MeshStage) -> Result<Planet> {
    info!(strategy = %stage.strategy, "running mesh generation stage");

    let mesh = match stage.strategy {
        MeshStrategy::Icosphere => {
            generate_icosphere(planet.subdivision_level(), planet.radius(), stage.relax)?
        }
    };
    planet.set_mesh(mesh);

    info!("mesh generation complete");
    Ok(planet)
}

/// Seed cratons on the planet's mesh, replacing any existing cratons
///
/// # Errors
///
/// Returns `MeshMissing` if the mesh stage has not run.
pub fn run_cratons<R: Rng + ?Sized>(
    mut planet: Planet,
    config: &CratonSeedingConfig,
    rng: &mut R,
) -> Result<Planet> {
    info!(strategy = %config.strategy, "running craton seeding stage");

    let seeder = CratonSeeder::from_config(config);
    let outcome = planet.seed_cratons(&seeder, rng)?;

    info!(cratons = outcome.cratons.len(), "craton seeding complete");
    Ok(planet)
}

/// Write the planet to `output`, or skip when no path is given
pub fn run_export(planet: Planet, output: Option<&Path>) -> Result<Planet> {
    let Some(path) = output else {
        info!("no output path provided, skipping export");
        return Ok(planet);
    };

    info!(path = %path.display(), "exporting planet");
    planet.save(path)?;
    Ok(planet)
}

/// Full generation run configured once up front
///
/// # Example
///
/// ```
/// use icosphere_planet::*;
///
/// let config = PlanetConfigBuilder::new()
///     .subdivision_level(2)
///     .unwrap()
///     .craton_count(3)
///     .craton_min_distance(2)
///     .build()
///     .unwrap();
///
/// let planet = Pipeline::from_config(&config).run(None).unwrap();
/// assert_eq!(planet.face_count(), 320);
/// assert_eq!(planet.cratons().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PlanetConfig,
    mesh: MeshStage,
    export: ExportStrategy,
}

impl Pipeline {
    /// Configure a pipeline from a resolved configuration
    pub fn from_config(config: &PlanetConfig) -> Self {
        Self {
            config: config.clone(),
            mesh: MeshStage::from_config(config),
            export: config.export_strategy,
        }
    }

    /// The configuration this pipeline runs with
    pub fn config(&self) -> &PlanetConfig {
        &self.config
    }

    /// Run mesh, craton and export stages in order
    ///
    /// Craton placement draws from a generator seeded with the planet seed, so
    /// the same configuration reproduces the same planet.
    pub fn run(self, output: Option<&Path>) -> Result<Planet> {
        let start = Instant::now();

        let planet = Planet::from_config(&self.config);
        info!(summary = %planet.summary(), "initialized planet");

        let planet = run_mesh(planet, &self.mesh)?;

        let mut rng = planet.rng();
        let planet = run_cratons(planet, &self.config.craton_seeding, &mut rng)?;

        debug!(export = %self.export, "export strategy");
        let planet = match self.export {
            ExportStrategy::Binary => run_export(planet, output)?,
        };

        debug!(elapsed = ?start.elapsed(), "pipeline finished");
        Ok(planet)
    }
}
