//! Planet mesh data and the read-only render boundary

mod colors;
mod render;

pub use colors::{CratonHighlighter, FaceColor, FaceColorMapper, UniformFaceColor};
pub use render::{load_render_data, MeshRenderData, RenderBuffers, RenderSource};

use glam::DVec3;

use crate::adjacency::{build_face_adjacency, FaceAdjacency};
use crate::error::{PlanetError, Result};
use crate::geometry::compute_face_centers;

/// Triangulated sphere surface with its face adjacency graph
///
/// Faces reference vertices by index and are themselves identified by their
/// position in the face list; that index is what adjacency lists, craton
/// centers and face IDs refer to.
///
/// # Invariants
///
/// - every face index is `< vertex_count()`
/// - the adjacency graph has exactly one entry per face
/// - `face_ids`, when present, has one entry per face
/// - `face_centers`, when present, has one entry per face
#[derive(Debug, Clone, PartialEq)]
pub struct PlanetMesh {
    vertices: Vec<DVec3>,
    faces: Vec<[u32; 3]>,
    adjacency: FaceAdjacency,
    face_ids: Option<Vec<u32>>,
    face_centers: Option<Vec<DVec3>>,
}

impl PlanetMesh {
    /// Build a mesh from final vertex positions and faces
    ///
    /// Derives the adjacency graph, identity face IDs and face centroids.
    /// Vertex positions must already be final; centroids are not updated
    /// afterwards.
    pub fn from_geometry(vertices: Vec<DVec3>, faces: Vec<[u32; 3]>) -> Self {
        let adjacency = build_face_adjacency(&faces);
        let face_ids = Some((0..faces.len() as u32).collect());
        let face_centers = Some(compute_face_centers(&vertices, &faces));

        Self {
            vertices,
            faces,
            adjacency,
            face_ids,
            face_centers,
        }
    }

    /// Assemble a mesh from stored parts, checking every invariant
    ///
    /// Face centroids are recomputed from the vertices.
    ///
    /// # Errors
    ///
    /// Returns `MalformedFile` if a face references a missing vertex, if the
    /// adjacency or face ID counts differ from the face count.
    pub fn from_parts(
        vertices: Vec<DVec3>,
        faces: Vec<[u32; 3]>,
        adjacency: FaceAdjacency,
        face_ids: Option<Vec<u32>>,
    ) -> Result<Self> {
        let vertex_count = vertices.len() as u64;
        if let Some((face, _)) = faces
            .iter()
            .enumerate()
            .find(|(_, f)| f.iter().any(|&v| v as u64 >= vertex_count))
        {
            return Err(PlanetError::MalformedFile(format!(
                "face {} references a vertex beyond {}",
                face, vertex_count
            )));
        }

        if adjacency.len() != faces.len() {
            return Err(PlanetError::MalformedFile(format!(
                "adjacency covers {} faces, mesh has {}",
                adjacency.len(),
                faces.len()
            )));
        }

        if let Some(ids) = &face_ids {
            if ids.len() != faces.len() {
                return Err(PlanetError::MalformedFile(format!(
                    "{} face ids for {} faces",
                    ids.len(),
                    faces.len()
                )));
            }
        }

        let face_centers = Some(compute_face_centers(&vertices, &faces));
        Ok(Self {
            vertices,
            faces,
            adjacency,
            face_ids,
            face_centers,
        })
    }

    /// Vertex positions
    #[inline]
    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    /// Faces as vertex index triples
    #[inline]
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    /// Face adjacency graph
    #[inline]
    pub fn adjacency(&self) -> &FaceAdjacency {
        &self.adjacency
    }

    /// Number of vertices
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Explicit face IDs, if populated
    pub fn face_ids(&self) -> Option<&[u32]> {
        self.face_ids.as_deref()
    }

    /// Face IDs, falling back to the identity sequence `0..face_count`
    pub fn face_ids_or_identity(&self) -> Vec<u32> {
        match &self.face_ids {
            Some(ids) => ids.clone(),
            None => (0..self.faces.len() as u32).collect(),
        }
    }

    /// Replace or clear the face IDs
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the ID count differs from the face count.
    pub fn set_face_ids(&mut self, face_ids: Option<Vec<u32>>) -> Result<()> {
        if let Some(ids) = &face_ids {
            if ids.len() != self.faces.len() {
                return Err(PlanetError::InvalidConfig(format!(
                    "{} face ids for {} faces",
                    ids.len(),
                    self.faces.len()
                )));
            }
        }
        self.face_ids = face_ids;
        Ok(())
    }

    /// Face centroids, if computed
    pub fn face_centers(&self) -> Option<&[DVec3]> {
        self.face_centers.as_deref()
    }

    /// Centroid of a single face
    ///
    /// Uses the cached centroid when available, otherwise computes it.
    pub fn face_center(&self, face: usize) -> Result<DVec3> {
        if let Some(center) = self.face_centers.as_ref().and_then(|c| c.get(face)) {
            return Ok(*center);
        }

        let [a, b, c] = *self.faces.get(face).ok_or(PlanetError::FaceNotFound(face))?;
        Ok((self.vertices[a as usize] + self.vertices[b as usize] + self.vertices[c as usize]) / 3.0)
    }
}
