//! Icosphere planet generation
//!
//! Builds a triangulated sphere by subdividing an icosahedron, derives the
//! face adjacency graph, seeds tectonic cratons with a minimum graph-distance
//! spacing, and stores the result in a versioned binary file.
//!
//! # Quick Start
//!
//! ```rust
//! use icosphere_planet::*;
//!
//! let config = PlanetConfigBuilder::new()
//!     .seed(42)
//!     .subdivision_level(3).unwrap()
//!     .craton_count(5)
//!     .craton_min_distance(2)
//!     .build().unwrap();
//!
//! let planet = Pipeline::from_config(&config).run(None).unwrap();
//! assert_eq!(planet.vertex_count(), 642);
//! assert_eq!(planet.cratons().len(), 5);
//!
//! // Flat-shaded buffers with craton centers highlighted
//! let data = MeshRenderData::from_planet(&planet).unwrap();
//! let buffers = data.flat_buffers(&CratonHighlighter::new(planet.cratons()));
//! println!("Generated {} triangles", buffers.triangle_count());
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) position-to-face lookups using KD-tree

// Modules
pub mod error;
pub mod config;
pub mod geometry;
pub mod adjacency;
pub mod tectonics;
pub mod mesh;
pub mod planet;
pub mod store;
pub mod pipeline;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{PlanetError, Result};
pub use config::{ConfigOverrides, CratonSeedingConfig, PlanetConfig, PlanetConfigBuilder};
pub use adjacency::{build_face_adjacency, FaceAdjacency};
pub use tectonics::{Craton, CratonSeeder, CratonStrategy, SeedingOutcome};
pub use mesh::{
    load_render_data, CratonHighlighter, FaceColor, FaceColorMapper, MeshRenderData, PlanetMesh,
    RenderBuffers, RenderSource, UniformFaceColor,
};
pub use planet::Planet;
pub use pipeline::{run_cratons, run_export, run_mesh, ExportStrategy, MeshStage, MeshStrategy, Pipeline};

#[cfg(feature = "spatial-index")]
pub use spatial::SpatialIndex;

// Re-export glam::DVec3 for convenience
pub use glam::DVec3;
