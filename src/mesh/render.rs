//! Read-only render projection of a planet
//!
//! Viewers consume [`MeshRenderData`] instead of the full planet model. It
//! carries single-precision vertex data, the face list, optional face IDs and
//! elevation, and an optional back-reference to the planet for overlays.

use std::path::Path;

use glam::Vec3;
use tracing::{debug, info};

use super::colors::{FaceColor, FaceColorMapper};
use crate::error::{PlanetError, Result};
use crate::planet::Planet;

/// Engine-agnostic render view of a planet mesh
///
/// # Invariants
///
/// Checked by [`MeshRenderData::new`]:
/// - every face index is `< vertices.len()`
/// - `face_ids`, when present, has exactly one entry per face
/// - `elevation`, when present, has one entry per vertex or one per face
#[derive(Debug, Clone)]
pub struct MeshRenderData<'a> {
    /// Vertex positions (N x 3)
    pub vertices: Vec<[f32; 3]>,
    /// Triangle vertex indices (M x 3)
    pub faces: Vec<[u32; 3]>,
    /// Stable face identifiers (M)
    pub face_ids: Option<Vec<u32>>,
    /// Elevation per vertex (N) or per face (M)
    pub elevation: Option<Vec<f32>>,
    /// Full planet for overlay access
    pub planet: Option<&'a Planet>,
}

impl<'a> MeshRenderData<'a> {
    /// Create render data, validating the boundary invariants
    ///
    /// # Errors
    ///
    /// Returns `InvalidRenderData` describing the first violated invariant.
    pub fn new(
        vertices: Vec<[f32; 3]>,
        faces: Vec<[u32; 3]>,
        face_ids: Option<Vec<u32>>,
        elevation: Option<Vec<f32>>,
    ) -> Result<Self> {
        let n = vertices.len();
        let m = faces.len();

        if let Some(face) = faces.iter().position(|f| f.iter().any(|&v| v as usize >= n)) {
            return Err(PlanetError::InvalidRenderData(format!(
                "face {} references a vertex beyond {}",
                face, n
            )));
        }

        if let Some(ids) = &face_ids {
            if ids.len() != m {
                return Err(PlanetError::InvalidRenderData(format!(
                    "face_ids length {} must match face count {}",
                    ids.len(),
                    m
                )));
            }
        }

        if let Some(elevation) = &elevation {
            if elevation.len() != n && elevation.len() != m {
                return Err(PlanetError::InvalidRenderData(format!(
                    "elevation length {} must match vertex count {} or face count {}",
                    elevation.len(),
                    n,
                    m
                )));
            }
        }

        Ok(Self {
            vertices,
            faces,
            face_ids,
            elevation,
            planet: None,
        })
    }

    /// Project a planet's mesh for rendering, keeping a reference to the planet
    ///
    /// # Errors
    ///
    /// Returns `MeshMissing` if the planet has no mesh yet.
    pub fn from_planet(planet: &'a Planet) -> Result<Self> {
        let mesh = planet.mesh().ok_or(PlanetError::MeshMissing)?;

        let vertices = mesh
            .vertices()
            .iter()
            .map(|v| v.as_vec3().to_array())
            .collect();
        let face_ids = mesh.face_ids().map(|ids| ids.to_vec());

        let mut data = Self::new(vertices, mesh.faces().to_vec(), face_ids, None)?;
        data.planet = Some(planet);
        Ok(data)
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Build flat-shaded vertex buffers, one color per face
    ///
    /// Every face gets its own three vertices so that colors and normals do
    /// not bleed across edges.
    pub fn flat_buffers<C: FaceColorMapper>(&self, color_mapper: &C) -> RenderBuffers {
        let mut buffers = RenderBuffers::with_capacity(self.faces.len());

        for (face_idx, face) in self.faces.iter().enumerate() {
            let corners = face.map(|v| Vec3::from_array(self.vertices[v as usize]));
            let normal = face_normal(corners);
            let color = color_mapper.map_color(face_idx);

            let base = buffers.positions.len() as u32;
            for corner in corners {
                buffers.positions.push(corner.to_array());
                buffers.normals.push(normal.to_array());
                buffers.colors.push(color);
            }
            buffers.indices.extend_from_slice(&[base, base + 1, base + 2]);
        }

        buffers
    }
}

/// Outward unit normal of a triangle, or zero for a degenerate one
fn face_normal([a, b, c]: [Vec3; 3]) -> Vec3 {
    let normal = (b - a).cross(c - a).normalize_or_zero();
    let centroid = (a + b + c) / 3.0;
    if normal.dot(centroid) < 0.0 {
        -normal
    } else {
        normal
    }
}

/// GPU-ready vertex buffers
///
/// Contains raw vertex data suitable for any rendering engine:
/// - Bevy: Convert to `Mesh` with attributes
/// - wgpu: Use directly as vertex buffers
#[derive(Debug, Clone, Default)]
pub struct RenderBuffers {
    /// Vertex positions
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals (face normal, repeated per corner)
    pub normals: Vec<[f32; 3]>,
    /// Vertex colors (RGBA)
    pub colors: Vec<FaceColor>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl RenderBuffers {
    fn with_capacity(faces: usize) -> Self {
        Self {
            positions: Vec::with_capacity(faces * 3),
            normals: Vec::with_capacity(faces * 3),
            colors: Vec::with_capacity(faces * 3),
            indices: Vec::with_capacity(faces * 3),
        }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if the buffers are empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// A planet loaded from disk for viewing
///
/// Owns the planet so that [`MeshRenderData`] can borrow it for overlays.
#[derive(Debug, Clone)]
pub struct RenderSource {
    planet: Planet,
}

impl RenderSource {
    /// Load a planet file for rendering
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound` for a missing file, `MeshMissing` if the file
    /// holds no mesh, or any load error from the store.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading planet for rendering");

        let planet = Planet::load(path)?;
        let mesh = planet.mesh().ok_or(PlanetError::MeshMissing)?;

        info!(
            vertices = mesh.vertex_count(),
            faces = mesh.face_count(),
            "loaded mesh"
        );
        debug!(
            face_ids = mesh.face_ids().is_some(),
            cratons = planet.cratons().len(),
            "optional groups"
        );

        Ok(Self { planet })
    }

    /// Wrap an in-memory planet
    pub fn from_planet(planet: Planet) -> Self {
        Self { planet }
    }

    /// The loaded planet
    pub fn planet(&self) -> &Planet {
        &self.planet
    }

    /// Render view borrowing the loaded planet
    pub fn render_data(&self) -> Result<MeshRenderData<'_>> {
        MeshRenderData::from_planet(&self.planet)
    }
}

/// Load a planet file for a viewer
///
/// Shorthand for [`RenderSource::load`]; call
/// [`RenderSource::render_data`] on the result.
pub fn load_render_data<P: AsRef<Path>>(path: P) -> Result<RenderSource> {
    RenderSource::load(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{generate_icosphere, RelaxOptions};
    use crate::mesh::{CratonHighlighter, UniformFaceColor};
    use crate::tectonics::Craton;

    fn grid(n: usize) -> Vec<[f32; 3]> {
        (0..n).map(|i| [i as f32, 0.0, 1.0]).collect()
    }

    fn tris(m: usize, n: usize) -> Vec<[u32; 3]> {
        (0..m)
            .map(|i| {
                let i = i as u32;
                let n = n as u32;
                [i % n, (i + 1) % n, (i + 2) % n]
            })
            .collect()
    }

    #[test]
    fn test_valid_render_data() {
        let data = MeshRenderData::new(
            grid(100),
            tris(200, 100),
            Some((0..200).collect()),
            Some(vec![0.5; 100]),
        )
        .unwrap();

        assert_eq!(data.vertex_count(), 100);
        assert_eq!(data.face_count(), 200);
        assert!(data.planet.is_none());
    }

    #[test]
    fn test_elevation_per_face_accepted() {
        let data = MeshRenderData::new(grid(100), tris(200, 100), None, Some(vec![0.0; 200]));
        assert!(data.is_ok());
    }

    #[test]
    fn test_invalid_elevation_length() {
        let result = MeshRenderData::new(grid(100), tris(200, 100), None, Some(vec![0.0; 50]));
        assert!(matches!(result, Err(PlanetError::InvalidRenderData(_))));
    }

    #[test]
    fn test_invalid_face_ids_length() {
        let result = MeshRenderData::new(grid(100), tris(200, 100), Some(vec![0; 150]), None);
        assert!(matches!(result, Err(PlanetError::InvalidRenderData(_))));
    }

    #[test]
    fn test_out_of_range_face() {
        let result = MeshRenderData::new(grid(3), vec![[0, 1, 3]], None, None);
        assert!(matches!(result, Err(PlanetError::InvalidRenderData(_))));
    }

    #[test]
    fn test_from_planet_requires_mesh() {
        let planet = Planet::new(1.0, 1, 7);
        assert!(matches!(
            MeshRenderData::from_planet(&planet),
            Err(PlanetError::MeshMissing)
        ));
    }

    #[test]
    fn test_from_planet() {
        let mut planet = Planet::new(1.0, 2, 7);
        planet.set_mesh(generate_icosphere(2, 1.0, RelaxOptions::default()).unwrap());

        let data = MeshRenderData::from_planet(&planet).unwrap();
        assert_eq!(data.vertex_count(), 162);
        assert_eq!(data.face_count(), 320);
        assert_eq!(data.face_ids.as_ref().map(|ids| ids.len()), Some(320));
        assert!(data.planet.is_some());
    }

    #[test]
    fn test_flat_buffers() {
        let mut planet = Planet::new(1.0, 1, 7);
        planet.set_mesh(generate_icosphere(1, 1.0, RelaxOptions::default()).unwrap());
        planet.set_cratons(vec![Craton { id: 0, center_index: 0 }]);

        let data = MeshRenderData::from_planet(&planet).unwrap();
        let buffers = data.flat_buffers(&CratonHighlighter::new(planet.cratons()));

        assert_eq!(buffers.vertex_count(), 240);
        assert_eq!(buffers.triangle_count(), 80);
        assert_eq!(buffers.colors[0], CratonHighlighter::DEFAULT_HIGHLIGHT);
        assert_eq!(buffers.colors[3], UniformFaceColor::default().0);

        // Normals point away from the sphere center
        for (position, normal) in buffers.positions.iter().zip(&buffers.normals) {
            assert!(Vec3::from_array(*position).dot(Vec3::from_array(*normal)) > 0.0);
        }
    }

    #[test]
    fn test_render_source_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("planet.bin");

        let mut planet = Planet::new(1.0, 1, 7);
        planet.set_mesh(generate_icosphere(1, 1.0, RelaxOptions::default()).unwrap());
        planet.save(&path).unwrap();

        let source = load_render_data(&path).unwrap();
        let data = source.render_data().unwrap();
        assert_eq!(data.face_count(), 80);
        assert_eq!(data.vertex_count(), 42);
    }

    #[test]
    fn test_render_source_without_mesh() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.bin");
        Planet::new(1.0, 1, 7).save(&path).unwrap();

        assert!(matches!(RenderSource::load(&path), Err(PlanetError::MeshMissing)));
    }
}
