//! Planet generation configuration and builder
//!
//! Configuration is resolved once before the pipeline runs, in three layers:
//! built-in defaults, an optional JSON config file, then command-line
//! overrides. Later layers win.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{PlanetError, Result};
use crate::geometry::MAX_SUBDIVISION_LEVEL;
use crate::pipeline::{ExportStrategy, MeshStrategy};
use crate::tectonics::CratonStrategy;

/// Default planet radius (Earth, in kilometers)
pub const DEFAULT_RADIUS: f64 = 6371.0;

/// Default icosphere subdivision level (40,962 vertices / 81,920 faces)
pub const DEFAULT_SUBDIVISION_LEVEL: i32 = 6;

/// Default random seed
pub const DEFAULT_SEED: u64 = 42;

/// Default number of vertex relaxation passes
pub const DEFAULT_RELAX_ITERATIONS: usize = 10;

/// Craton seeding parameters
///
/// `count` and `min_distance` are derived from the planet when left unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CratonSeedingConfig {
    /// Selection algorithm
    pub strategy: CratonStrategy,
    /// Number of cratons to place; derived from surface area when `None`
    pub count: Option<usize>,
    /// Minimum hop distance between craton centers; derived when `None`
    pub min_distance: Option<usize>,
    /// Scale applied to the derived `min_distance`
    pub spacing_factor: f64,
}

impl Default for CratonSeedingConfig {
    fn default() -> Self {
        Self {
            strategy: CratonStrategy::default(),
            count: None,
            min_distance: None,
            spacing_factor: 1.0,
        }
    }
}

/// Configuration for deterministic planet generation
///
/// The same configuration always produces the same planet: the seed drives
/// every random choice made after meshing.
///
/// # Example
///
/// ```rust
/// use icosphere_planet::*;
///
/// let config = PlanetConfigBuilder::new()
///     .seed(7)
///     .subdivision_level(3)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let json = serde_json::to_string(&config).unwrap();
/// let restored: PlanetConfig = serde_json::from_str(&json).unwrap();
/// assert_eq!(config, restored);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanetConfig {
    /// Sphere radius (km)
    pub radius: f64,
    /// Number of icosphere subdivisions
    pub subdivision_level: i32,
    /// Random seed for craton placement
    pub seed: u64,
    /// Mesh generation strategy
    pub mesh_strategy: MeshStrategy,
    /// Vertex relaxation passes after projection (0 disables relaxation)
    pub relax_iterations: usize,
    /// Craton seeding parameters
    pub craton_seeding: CratonSeedingConfig,
    /// Output format for the export stage
    pub export_strategy: ExportStrategy,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            subdivision_level: DEFAULT_SUBDIVISION_LEVEL,
            seed: DEFAULT_SEED,
            mesh_strategy: MeshStrategy::default(),
            relax_iterations: DEFAULT_RELAX_ITERATIONS,
            craton_seeding: CratonSeedingConfig::default(),
            export_strategy: ExportStrategy::default(),
        }
    }
}

impl PlanetConfig {
    /// Load a configuration from a JSON file
    ///
    /// Keys missing from the file keep their default values.
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` if the path does not exist, `ConfigParse` for
    /// invalid JSON and `InvalidConfig` if a value fails validation.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PlanetError::FileNotFound(path.to_path_buf()));
        }

        let text = fs::read_to_string(path)?;
        let config: PlanetConfig = serde_json::from_str(&text)?;
        config.validate()?;

        debug!(path = %path.display(), ?config, "loaded config file");
        Ok(config)
    }

    /// Apply command-line overrides on top of this configuration
    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Result<Self> {
        if let Some(radius) = overrides.radius {
            self.radius = radius;
        }
        if let Some(level) = overrides.subdivision_level {
            self.subdivision_level = level;
        }
        if let Some(seed) = overrides.seed {
            self.seed = seed;
        }
        if let Some(strategy) = overrides.mesh_strategy {
            self.mesh_strategy = strategy;
        }
        if let Some(strategy) = overrides.craton_strategy {
            self.craton_seeding.strategy = strategy;
        }
        if let Some(count) = overrides.craton_count {
            self.craton_seeding.count = Some(count);
        }
        if let Some(spacing) = overrides.craton_spacing {
            self.craton_seeding.spacing_factor = spacing;
        }
        if let Some(strategy) = overrides.export_strategy {
            self.export_strategy = strategy;
        }

        self.validate()?;
        Ok(self)
    }

    /// Check value ranges
    ///
    /// The subdivision level is deliberately not checked here; the mesh stage
    /// rejects negative levels with `InvalidSubdivision`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` for a negative or non-finite radius or a
    /// non-positive spacing factor.
    pub fn validate(&self) -> Result<()> {
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(PlanetError::InvalidConfig(format!(
                "radius must be finite and >= 0 (got {})",
                self.radius
            )));
        }
        let spacing = self.craton_seeding.spacing_factor;
        if !spacing.is_finite() || spacing <= 0.0 {
            return Err(PlanetError::InvalidConfig(format!(
                "craton spacing factor must be > 0 (got {})",
                spacing
            )));
        }
        Ok(())
    }
}

/// Values supplied on the command line
///
/// Every field is optional; `None` leaves the underlying value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub radius: Option<f64>,
    pub subdivision_level: Option<i32>,
    pub seed: Option<u64>,
    pub mesh_strategy: Option<MeshStrategy>,
    pub craton_strategy: Option<CratonStrategy>,
    pub craton_count: Option<usize>,
    pub craton_spacing: Option<f64>,
    pub export_strategy: Option<ExportStrategy>,
}

impl ConfigOverrides {
    /// Resolve the final configuration: overrides > file > defaults
    pub fn resolve(&self, config_file: Option<&Path>) -> Result<PlanetConfig> {
        let base = match config_file {
            Some(path) => PlanetConfig::from_json_file(path)?,
            None => PlanetConfig::default(),
        };
        base.with_overrides(self)
    }
}

/// Builder for creating PlanetConfig with validation
///
/// # Example
///
/// ```rust
/// use icosphere_planet::*;
///
/// let config = PlanetConfigBuilder::new()
///     .radius(1.0)
///     .unwrap()
///     .craton_count(6)
///     .craton_min_distance(3)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.craton_seeding.count, Some(6));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PlanetConfigBuilder {
    config: PlanetConfig,
}

impl PlanetConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - radius: 6371.0
    /// - subdivision_level: 6
    /// - seed: 42
    /// - relax_iterations: 10
    /// - cratons: derived count and spacing, eager exclusion
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sphere radius
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the radius is negative or not finite
    pub fn radius(mut self, radius: f64) -> Result<Self> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(PlanetError::InvalidConfig(format!(
                "radius must be finite and >= 0 (got {})",
                radius
            )));
        }
        self.config.radius = radius;
        Ok(self)
    }

    /// Set the subdivision level
    ///
    /// # Errors
    ///
    /// Returns `InvalidSubdivision` if the level is negative and
    /// `SubdivisionTooLarge` above [`MAX_SUBDIVISION_LEVEL`]
    pub fn subdivision_level(mut self, level: i32) -> Result<Self> {
        if level < 0 {
            return Err(PlanetError::InvalidSubdivision(level));
        }
        if level > MAX_SUBDIVISION_LEVEL {
            return Err(PlanetError::SubdivisionTooLarge {
                level,
                max: MAX_SUBDIVISION_LEVEL,
            });
        }
        self.config.subdivision_level = level;
        Ok(self)
    }

    /// Set the random seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// Set the mesh strategy
    pub fn mesh_strategy(mut self, strategy: MeshStrategy) -> Self {
        self.config.mesh_strategy = strategy;
        self
    }

    /// Set the number of relaxation passes
    pub fn relax_iterations(mut self, iterations: usize) -> Self {
        self.config.relax_iterations = iterations;
        self
    }

    /// Set the export strategy
    pub fn export_strategy(mut self, strategy: ExportStrategy) -> Self {
        self.config.export_strategy = strategy;
        self
    }

    /// Set the craton seeding strategy
    pub fn craton_strategy(mut self, strategy: CratonStrategy) -> Self {
        self.config.craton_seeding.strategy = strategy;
        self
    }

    /// Fix the number of cratons
    pub fn craton_count(mut self, count: usize) -> Self {
        self.config.craton_seeding.count = Some(count);
        self
    }

    /// Fix the minimum craton spacing in hops
    pub fn craton_min_distance(mut self, hops: usize) -> Self {
        self.config.craton_seeding.min_distance = Some(hops);
        self
    }

    /// Scale the derived craton spacing
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the factor is not positive
    pub fn craton_spacing(mut self, factor: f64) -> Result<Self> {
        if !factor.is_finite() || factor <= 0.0 {
            return Err(PlanetError::InvalidConfig(format!(
                "craton spacing factor must be > 0 (got {})",
                factor
            )));
        }
        self.config.craton_seeding.spacing_factor = factor;
        Ok(self)
    }

    /// Build the configuration
    pub fn build(self) -> Result<PlanetConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
