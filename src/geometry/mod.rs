//! Icosphere geometry kernel
//!
//! Builds a closed triangulated sphere by recursively subdividing a regular
//! icosahedron, projecting onto the target radius and optionally relaxing
//! vertex spacing.

mod icosahedron;
mod relax;
mod sphere;
mod subdivide;

pub use icosahedron::{create_base_solid, BASE_FACE_COUNT, BASE_VERTEX_COUNT, PHI};
pub use relax::{build_vertex_neighbors, relax_vertices, RelaxOptions};
pub use sphere::{compute_face_centers, project_to_sphere};
pub use subdivide::subdivide;

use crate::error::{PlanetError, Result};
use crate::mesh::PlanetMesh;
use glam::DVec3;
use tracing::{debug, info};

/// Highest subdivision level whose vertex and face indices fit in `u32`
///
/// Level 13 has 671,088,642 vertices and 1,342,177,280 faces; level 14
/// already exceeds `u32::MAX` faces.
pub const MAX_SUBDIVISION_LEVEL: i32 = 13;

/// Expected vertex count of an icosphere at the given subdivision level
///
/// `10 * 4^L + 2`
pub fn expected_vertex_count(subdivision_level: u32) -> usize {
    10 * 4usize.pow(subdivision_level) + 2
}

/// Expected face count of an icosphere at the given subdivision level
///
/// `20 * 4^L`
pub fn expected_face_count(subdivision_level: u32) -> usize {
    20 * 4usize.pow(subdivision_level)
}

/// Build raw icosphere vertices and faces projected onto `radius`
///
/// # Errors
///
/// Returns `InvalidSubdivision` if `subdivision_level` is negative,
/// `SubdivisionTooLarge` above [`MAX_SUBDIVISION_LEVEL`] and `InvalidConfig`
/// for a negative or non-finite radius. The checks happen before any geometry
/// is allocated.
pub fn build_icosphere(
    subdivision_level: i32,
    radius: f64,
) -> Result<(Vec<DVec3>, Vec<[u32; 3]>)> {
    if subdivision_level < 0 {
        return Err(PlanetError::InvalidSubdivision(subdivision_level));
    }
    if subdivision_level > MAX_SUBDIVISION_LEVEL {
        return Err(PlanetError::SubdivisionTooLarge {
            level: subdivision_level,
            max: MAX_SUBDIVISION_LEVEL,
        });
    }
    if !radius.is_finite() || radius < 0.0 {
        return Err(PlanetError::InvalidConfig(format!(
            "radius must be finite and >= 0 (got {})",
            radius
        )));
    }

    let (mut vertices, mut faces) = create_base_solid();
    for level in 0..subdivision_level {
        let (v, f) = subdivide(vertices, &faces);
        vertices = v;
        faces = f;
        debug!(
            level = level + 1,
            vertices = vertices.len(),
            faces = faces.len(),
            "subdivision complete"
        );
    }

    project_to_sphere(&mut vertices, radius);
    Ok((vertices, faces))
}

/// Generate a complete icosphere mesh with adjacency and face centers
///
/// # Arguments
///
/// * `subdivision_level` - Number of 1-to-4 subdivisions (must be >= 0)
/// * `radius` - Sphere radius; 0.0 collapses every vertex onto the origin
/// * `relax` - Relaxation options; `max_iterations = 0` disables smoothing
///
/// # Example
///
/// ```
/// use icosphere_planet::geometry::{generate_icosphere, RelaxOptions};
///
/// let mesh = generate_icosphere(3, 6371.0, RelaxOptions::default()).unwrap();
/// assert_eq!(mesh.vertex_count(), 642);
/// assert_eq!(mesh.face_count(), 1280);
/// ```
pub fn generate_icosphere(
    subdivision_level: i32,
    radius: f64,
    relax: RelaxOptions,
) -> Result<PlanetMesh> {
    info!(subdivision_level, radius, "generating icosphere mesh");

    let (vertices, faces) = build_icosphere(subdivision_level, radius)?;
    let vertices = relax_vertices(vertices, &faces, radius, relax);
    let mesh = PlanetMesh::from_geometry(vertices, faces);

    info!(
        vertices = mesh.vertex_count(),
        faces = mesh.face_count(),
        "icosphere mesh generation complete"
    );
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topology_closure() {
        for level in 0..=4 {
            let mesh = generate_icosphere(level, 1.0, RelaxOptions::iterations(0)).unwrap();
            assert_eq!(mesh.vertex_count(), expected_vertex_count(level as u32));
            assert_eq!(mesh.face_count(), expected_face_count(level as u32));
        }
    }

    #[test]
    fn test_base_solid_level() {
        let mesh = generate_icosphere(0, 1.0, RelaxOptions::default()).unwrap();
        assert_eq!(mesh.vertex_count(), 12);
        assert_eq!(mesh.face_count(), 20);
        assert_eq!(mesh.adjacency().len(), 20);
    }

    #[test]
    fn test_earth_scenario() {
        let mesh = generate_icosphere(3, 6371.0, RelaxOptions::default()).unwrap();
        assert_eq!(mesh.vertex_count(), 642);
        assert_eq!(mesh.face_count(), 1280);
    }

    #[test]
    fn test_negative_subdivision_rejected() {
        let result = generate_icosphere(-1, 1.0, RelaxOptions::default());
        assert!(matches!(result, Err(PlanetError::InvalidSubdivision(-1))));
    }

    #[test]
    fn test_oversized_subdivision_rejected() {
        let result = generate_icosphere(MAX_SUBDIVISION_LEVEL + 1, 1.0, RelaxOptions::default());
        assert!(matches!(
            result,
            Err(PlanetError::SubdivisionTooLarge { level: 14, max: 13 })
        ));
        assert!(build_icosphere(i32::MAX, 1.0).is_err());
    }

    #[test]
    fn test_max_level_fits_u32_indices() {
        let level = MAX_SUBDIVISION_LEVEL as u32;
        assert!(expected_vertex_count(level) <= u32::MAX as usize);
        assert!(expected_face_count(level) <= u32::MAX as usize);
        assert!(expected_face_count(level + 1) > u32::MAX as usize);
    }

    #[test]
    fn test_negative_radius_rejected() {
        for radius in [-1.0, f64::NAN, f64::INFINITY] {
            let result = generate_icosphere(1, radius, RelaxOptions::default());
            assert!(matches!(result, Err(PlanetError::InvalidConfig(_))));
        }
    }

    #[test]
    fn test_sphere_projection() {
        let radius = 6371.0;
        let mesh = generate_icosphere(3, radius, RelaxOptions::default()).unwrap();
        for v in mesh.vertices() {
            assert!((v.length() - radius).abs() / radius < 1e-6);
        }
    }

    #[test]
    fn test_zero_radius() {
        let mesh = generate_icosphere(1, 0.0, RelaxOptions::default()).unwrap();
        assert!(mesh.vertices().iter().all(|v| *v == DVec3::ZERO));
        assert_eq!(mesh.face_count(), 80);
    }

    #[test]
    fn test_face_indices_valid() {
        let mesh = generate_icosphere(2, 1.0, RelaxOptions::default()).unwrap();
        let n = mesh.vertex_count() as u32;
        assert!(mesh.faces().iter().flatten().all(|&v| v < n));
    }

    #[test]
    fn test_face_center_planarity() {
        let mesh = generate_icosphere(2, 1.0, RelaxOptions::default()).unwrap();
        let centers = mesh.face_centers().expect("centers computed at generation");
        assert_eq!(centers.len(), mesh.face_count());

        for (face, center) in mesh.faces().iter().zip(centers) {
            let v0 = mesh.vertices()[face[0] as usize];
            let v1 = mesh.vertices()[face[1] as usize];
            let v2 = mesh.vertices()[face[2] as usize];
            let normal = (v1 - v0).cross(v2 - v0).normalize();
            let plane_distance = (*center - v0).dot(normal);
            assert!(plane_distance.abs() < 1e-6);
        }
    }
}
