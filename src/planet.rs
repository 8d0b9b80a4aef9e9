//! Planet aggregate: configuration metadata, mesh and cratons

use std::fmt::Write as _;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use crate::config::PlanetConfig;
use crate::error::{PlanetError, Result};
use crate::mesh::PlanetMesh;
use crate::tectonics::{Craton, CratonSeeder, SeedingOutcome};

#[cfg(feature = "spatial-index")]
use crate::spatial::SpatialIndex;
#[cfg(feature = "spatial-index")]
use glam::DVec3;

/// A generated (or partially generated) planet
///
/// Radius, subdivision level and seed are fixed at construction. The mesh and
/// cratons start absent and are filled in by the pipeline stages, each of
/// which takes the planet by value and hands it on.
///
/// # Examples
///
/// ```
/// use icosphere_planet::*;
/// use icosphere_planet::geometry::{generate_icosphere, RelaxOptions};
///
/// let mut planet = Planet::new(6371.0, 2, 42);
/// assert!(planet.mesh().is_none());
///
/// planet.set_mesh(generate_icosphere(2, 6371.0, RelaxOptions::default()).unwrap());
/// assert_eq!(planet.face_count(), 320);
/// assert_eq!(planet.get_neighbors(0).len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Planet {
    radius: f64,
    subdivision_level: i32,
    seed: u64,

    mesh: Option<PlanetMesh>,

    /// Replaced wholesale by each seeding run
    cratons: Vec<Craton>,

    /// Face-center lookup, rebuilt whenever the mesh changes
    #[cfg(feature = "spatial-index")]
    spatial_index: Option<SpatialIndex>,
}

impl Planet {
    /// Create a planet with no mesh and no cratons
    pub fn new(radius: f64, subdivision_level: i32, seed: u64) -> Self {
        Self {
            radius,
            subdivision_level,
            seed,
            mesh: None,
            cratons: Vec::new(),
            #[cfg(feature = "spatial-index")]
            spatial_index: None,
        }
    }

    /// Create an empty planet from a resolved configuration
    pub fn from_config(config: &PlanetConfig) -> Self {
        Self::new(config.radius, config.subdivision_level, config.seed)
    }

    /// Sphere radius
    #[inline]
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Subdivision level the planet was configured with
    #[inline]
    pub fn subdivision_level(&self) -> i32 {
        self.subdivision_level
    }

    /// Random seed
    #[inline]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// A fresh random generator seeded from the planet seed
    ///
    /// Every call returns a generator in the same initial state.
    pub fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed)
    }

    /// The mesh, if generated
    #[inline]
    pub fn mesh(&self) -> Option<&PlanetMesh> {
        self.mesh.as_ref()
    }

    /// Attach a mesh, replacing any previous one
    pub fn set_mesh(&mut self, mesh: PlanetMesh) {
        #[cfg(feature = "spatial-index")]
        {
            self.spatial_index = mesh.face_centers().map(SpatialIndex::new);
        }
        self.mesh = Some(mesh);
    }

    /// Placed cratons, in selection order
    #[inline]
    pub fn cratons(&self) -> &[Craton] {
        &self.cratons
    }

    /// Replace the craton list
    pub fn set_cratons(&mut self, cratons: Vec<Craton>) {
        self.cratons = cratons;
    }

    /// Run a craton seeder on the mesh and store the result
    ///
    /// # Errors
    ///
    /// Returns `MeshMissing` if no mesh has been attached.
    pub fn seed_cratons<R: rand::Rng + ?Sized>(
        &mut self,
        seeder: &CratonSeeder,
        rng: &mut R,
    ) -> Result<SeedingOutcome> {
        let mesh = self.mesh.as_ref().ok_or(PlanetError::MeshMissing)?;
        let outcome = seeder.seed(mesh, self.radius, rng);
        self.cratons = outcome.cratons.clone();
        Ok(outcome)
    }

    /// Number of faces (0 without a mesh)
    pub fn face_count(&self) -> usize {
        self.mesh.as_ref().map_or(0, PlanetMesh::face_count)
    }

    /// Number of vertices (0 without a mesh)
    pub fn vertex_count(&self) -> usize {
        self.mesh.as_ref().map_or(0, PlanetMesh::vertex_count)
    }

    /// Get the neighbors of a face
    ///
    /// Returns an empty slice for an invalid face or a planet without a mesh.
    pub fn get_neighbors(&self, face: usize) -> &[usize] {
        match &self.mesh {
            Some(mesh) => mesh.adjacency().neighbors(face),
            None => &[],
        }
    }

    /// Find all faces within N hops of a face, center included
    ///
    /// Results are in breadth-first order.
    ///
    /// # Example
    ///
    /// ```
    /// # use icosphere_planet::*;
    /// # use icosphere_planet::geometry::{generate_icosphere, RelaxOptions};
    /// # let mut planet = Planet::new(1.0, 2, 0);
    /// # planet.set_mesh(generate_icosphere(2, 1.0, RelaxOptions::default()).unwrap());
    /// let nearby = planet.find_faces_within_radius(0, 1);
    /// assert_eq!(nearby.len(), 4); // center + 3 neighbors
    /// ```
    pub fn find_faces_within_radius(&self, face: usize, hops: usize) -> Vec<usize> {
        match &self.mesh {
            Some(mesh) => mesh.adjacency().faces_within(face, hops),
            None => Vec::new(),
        }
    }

    /// Hop count of the shortest path between two faces
    pub fn graph_distance(&self, from: usize, to: usize) -> Option<usize> {
        self.mesh.as_ref()?.adjacency().graph_distance(from, to)
    }

    /// Find the face whose center is nearest to a position
    ///
    /// Returns `None` without a mesh.
    #[cfg(feature = "spatial-index")]
    pub fn find_face_at(&self, position: DVec3) -> Option<usize> {
        self.spatial_index.as_ref()?.find_nearest(position)
    }

    /// Human-readable multi-line summary
    pub fn summary(&self) -> String {
        let mut out = format!(
            "Planet(radius={}, subdivision_level={}, seed={})",
            self.radius, self.subdivision_level, self.seed
        );

        match &self.mesh {
            Some(mesh) => {
                let _ = write!(
                    out,
                    "\n  mesh: {} vertices, {} faces",
                    mesh.vertex_count(),
                    mesh.face_count()
                );
            }
            None => out.push_str("\n  mesh: not generated"),
        }
        let _ = write!(out, "\n  cratons: {}", self.cratons.len());

        debug!(summary_len = out.len(), "built planet summary");
        out
    }
}
