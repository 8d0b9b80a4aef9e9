//! Graph-spaced random craton seeding
//!
//! # Algorithm
//!
//! The default [`CratonStrategy::SpacedRandom`] strategy keeps a pool of
//! candidate faces. Each round it draws one candidate uniformly at random,
//! accepts it, and removes every face within `min_distance` hops of it from
//! the pool with a bounded BFS. Any face left in the pool is therefore at
//! least `min_distance + 1` hops from every accepted center, so no pairwise
//! check is ever needed.
//!
//! [`CratonStrategy::PairwiseRejection`] draws faces from the whole mesh and
//! rejects a draw when a bounded BFS finds an accepted center fewer than
//! `min_distance` hops away. It reaches the same guarantee at up to
//! `count` BFS runs per draw.
//!
//! Both stop after `face_count * 5` draws. Falling short of the requested
//! count is reported, not treated as an error.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::Craton;
use crate::adjacency::FaceAdjacency;
use crate::config::CratonSeedingConfig;
use crate::error::PlanetError;
use crate::mesh::PlanetMesh;

/// Earth's mean radius in kilometers, the reference for craton count scaling
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Craton count for an Earth-sized planet
pub const BASE_PLATE_COUNT: f64 = 10.0;

/// Lower clamp for the estimated craton count
pub const MIN_CRATON_COUNT: usize = 4;

/// Upper clamp for the estimated craton count
pub const MAX_CRATON_COUNT: usize = 50;

/// Draw budget per mesh face
const ATTEMPTS_PER_FACE: usize = 5;

/// Craton selection algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CratonStrategy {
    /// Eager exclusion: one BFS per accepted craton
    #[default]
    SpacedRandom,
    /// Rejection sampling with a distance check against every accepted craton
    PairwiseRejection,
}

impl CratonStrategy {
    /// Registry name of the strategy
    pub fn name(self) -> &'static str {
        match self {
            CratonStrategy::SpacedRandom => "spaced_random",
            CratonStrategy::PairwiseRejection => "pairwise_rejection",
        }
    }
}

impl fmt::Display for CratonStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CratonStrategy {
    type Err = PlanetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "spaced_random" => Ok(CratonStrategy::SpacedRandom),
            "pairwise_rejection" => Ok(CratonStrategy::PairwiseRejection),
            other => Err(PlanetError::InvalidConfig(format!(
                "unknown craton seeding strategy: {}",
                other
            ))),
        }
    }
}

/// Estimate a craton count from planet surface area
///
/// Scales [`BASE_PLATE_COUNT`] by the ratio of the planet's surface area to
/// Earth's, rounds, and clamps to
/// [`MIN_CRATON_COUNT`]..=[`MAX_CRATON_COUNT`].
///
/// ```
/// use icosphere_planet::tectonics::estimate_craton_count;
///
/// assert_eq!(estimate_craton_count(6371.0), 10);
/// assert_eq!(estimate_craton_count(100.0), 4);
/// assert_eq!(estimate_craton_count(100_000.0), 50);
/// ```
pub fn estimate_craton_count(radius: f64) -> usize {
    let area_ratio = (radius * radius) / (EARTH_RADIUS_KM * EARTH_RADIUS_KM);
    clamp_craton_count(BASE_PLATE_COUNT * area_ratio)
}

/// Round half to even, then clamp to the craton count range
fn clamp_craton_count(estimate: f64) -> usize {
    let raw = estimate.round_ties_even();

    if !raw.is_finite() || raw >= MAX_CRATON_COUNT as f64 {
        MAX_CRATON_COUNT
    } else {
        (raw as usize).clamp(MIN_CRATON_COUNT, MAX_CRATON_COUNT)
    }
}

/// Estimate a minimum craton spacing in hops
///
/// `max(1, floor(sqrt(face_count / count) * spacing_factor))`
pub fn estimate_min_distance(face_count: usize, count: usize, spacing_factor: f64) -> usize {
    let base = (face_count as f64 / count.max(1) as f64).sqrt();
    let scaled = (base * spacing_factor).floor();
    if scaled.is_finite() && scaled >= 1.0 {
        scaled as usize
    } else {
        1
    }
}

/// Result of a seeding run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedingOutcome {
    /// Placed cratons, in selection order
    pub cratons: Vec<Craton>,
    /// Resolved target count
    pub requested: usize,
    /// Resolved minimum spacing in hops
    pub min_distance: usize,
    /// Number of random draws made
    pub attempts: usize,
}

impl SeedingOutcome {
    /// Check if fewer cratons were placed than requested
    pub fn is_shortfall(&self) -> bool {
        self.cratons.len() < self.requested
    }
}

/// Craton seeder with optional fixed count and spacing
///
/// # Example
///
/// ```
/// use icosphere_planet::geometry::{generate_icosphere, RelaxOptions};
/// use icosphere_planet::tectonics::CratonSeeder;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let mesh = generate_icosphere(3, 6371.0, RelaxOptions::default()).unwrap();
/// let mut rng = ChaCha8Rng::seed_from_u64(42);
///
/// let outcome = CratonSeeder::default()
///     .count(5)
///     .min_distance(2)
///     .seed(&mesh, 6371.0, &mut rng);
/// assert_eq!(outcome.cratons.len(), 5);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CratonSeeder {
    strategy: CratonStrategy,
    count: Option<usize>,
    min_distance: Option<usize>,
    spacing_factor: f64,
}

impl Default for CratonSeeder {
    fn default() -> Self {
        Self {
            strategy: CratonStrategy::default(),
            count: None,
            min_distance: None,
            spacing_factor: 1.0,
        }
    }
}

impl CratonSeeder {
    /// Create a seeder for the given strategy with derived count and spacing
    pub fn new(strategy: CratonStrategy) -> Self {
        Self {
            strategy,
            ..Default::default()
        }
    }

    /// Create a seeder from resolved configuration
    pub fn from_config(config: &CratonSeedingConfig) -> Self {
        Self {
            strategy: config.strategy,
            count: config.count,
            min_distance: config.min_distance,
            spacing_factor: config.spacing_factor,
        }
    }

    /// Fix the number of cratons to place
    pub fn count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    /// Fix the minimum spacing in hops
    pub fn min_distance(mut self, min_distance: usize) -> Self {
        self.min_distance = Some(min_distance);
        self
    }

    /// Scale the derived spacing (ignored when `min_distance` is fixed)
    pub fn spacing_factor(mut self, spacing_factor: f64) -> Self {
        self.spacing_factor = spacing_factor;
        self
    }

    /// Selected strategy
    pub fn strategy(&self) -> CratonStrategy {
        self.strategy
    }

    /// Resolve `(count, min_distance)` for a planet radius and face count
    pub fn resolve(&self, radius: f64, face_count: usize) -> (usize, usize) {
        let count = match self.count {
            Some(count) => count,
            None => {
                let count = estimate_craton_count(radius);
                debug!(radius, count, "computed craton count from surface area");
                count
            }
        };

        let min_distance = match self.min_distance {
            Some(distance) => {
                debug!(min_distance = distance, "using fixed min_distance");
                distance
            }
            None => {
                let distance = estimate_min_distance(face_count, count, self.spacing_factor);
                debug!(
                    face_count,
                    spacing_factor = self.spacing_factor,
                    min_distance = distance,
                    "computed dynamic min_distance"
                );
                distance
            }
        };

        (count, min_distance)
    }

    /// Place cratons on the mesh
    ///
    /// `radius` only feeds the count estimate. The random source is injected
    /// so that a seeded generator reproduces the same cratons.
    pub fn seed<R: Rng + ?Sized>(&self, mesh: &PlanetMesh, radius: f64, rng: &mut R) -> SeedingOutcome {
        let face_count = mesh.face_count();
        let (requested, min_distance) = self.resolve(radius, face_count);

        info!(
            strategy = %self.strategy,
            faces = face_count,
            requested,
            min_distance,
            "seeding cratons"
        );

        let max_attempts = face_count * ATTEMPTS_PER_FACE;
        let adjacency = mesh.adjacency();
        let (centers, attempts) = match self.strategy {
            CratonStrategy::SpacedRandom => {
                select_eager(adjacency, requested, min_distance, max_attempts, rng)
            }
            CratonStrategy::PairwiseRejection => {
                select_rejection(adjacency, requested, min_distance, max_attempts, rng)
            }
        };

        let cratons: Vec<Craton> = centers
            .into_iter()
            .enumerate()
            .map(|(id, center)| Craton::new(id, center))
            .collect();

        let outcome = SeedingOutcome {
            cratons,
            requested,
            min_distance,
            attempts,
        };

        if outcome.is_shortfall() {
            warn!(
                placed = outcome.cratons.len(),
                requested, attempts, "craton count shortfall"
            );
        } else {
            info!(placed = outcome.cratons.len(), attempts, "cratons placed");
        }

        outcome
    }
}

/// Pool of selectable faces with O(1) random draw and removal
struct CandidatePool {
    faces: Vec<usize>,
    /// Position of each face in `faces`, `usize::MAX` once removed
    slots: Vec<usize>,
}

impl CandidatePool {
    fn full(face_count: usize) -> Self {
        Self {
            faces: (0..face_count).collect(),
            slots: (0..face_count).collect(),
        }
    }

    fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    fn len(&self) -> usize {
        self.faces.len()
    }

    fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        self.faces[rng.gen_range(0..self.faces.len())]
    }

    fn remove(&mut self, face: usize) {
        let slot = self.slots[face];
        if slot == usize::MAX {
            return;
        }

        self.faces.swap_remove(slot);
        if let Some(&moved) = self.faces.get(slot) {
            self.slots[moved] = slot;
        }
        self.slots[face] = usize::MAX;
    }
}

fn select_eager<R: Rng + ?Sized>(
    adjacency: &FaceAdjacency,
    count: usize,
    min_distance: usize,
    max_attempts: usize,
    rng: &mut R,
) -> (Vec<usize>, usize) {
    let mut pool = CandidatePool::full(adjacency.len());
    let mut selected = Vec::with_capacity(count);
    let mut attempts = 0;

    while selected.len() < count && attempts < max_attempts && !pool.is_empty() {
        let candidate = pool.draw(rng);
        selected.push(candidate);
        adjacency.walk_within(candidate, min_distance, |face, _| pool.remove(face));
        attempts += 1;

        debug!(
            craton = selected.len() - 1,
            face = candidate,
            remaining = pool.len(),
            "selected craton"
        );
    }

    (selected, attempts)
}

fn select_rejection<R: Rng + ?Sized>(
    adjacency: &FaceAdjacency,
    count: usize,
    min_distance: usize,
    max_attempts: usize,
    rng: &mut R,
) -> (Vec<usize>, usize) {
    let face_count = adjacency.len();
    let mut selected: Vec<usize> = Vec::with_capacity(count);
    let mut attempts = 0;

    if face_count == 0 {
        return (selected, attempts);
    }

    while selected.len() < count && attempts < max_attempts {
        let candidate = rng.gen_range(0..face_count);
        attempts += 1;

        let too_close = selected.iter().any(|&center| {
            center == candidate || adjacency.is_closer_than(center, candidate, min_distance)
        });
        if too_close {
            continue;
        }

        selected.push(candidate);
        debug!(
            craton = selected.len() - 1,
            face = candidate,
            attempts,
            "selected craton"
        );
    }

    (selected, attempts)
}
