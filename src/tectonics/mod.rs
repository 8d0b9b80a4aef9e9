//! Tectonic seed regions
//!
//! Cratons are the ancient, stable nuclei of future tectonic plates. Each is
//! anchored at a single mesh face, and seeding keeps every pair of craton
//! centers a minimum number of adjacency hops apart.

mod seeder;

pub use seeder::{
    estimate_craton_count, estimate_min_distance, CratonSeeder, CratonStrategy, SeedingOutcome,
    BASE_PLATE_COUNT, EARTH_RADIUS_KM, MAX_CRATON_COUNT, MIN_CRATON_COUNT,
};

use serde::{Deserialize, Serialize};

/// A craton seed placed on the mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Craton {
    /// Position in the seeding order (0-based)
    pub id: usize,
    /// Index of the face the craton is centered on
    pub center_index: usize,
}

impl Craton {
    /// Create a new craton
    pub fn new(id: usize, center_index: usize) -> Self {
        Self { id, center_index }
    }
}
