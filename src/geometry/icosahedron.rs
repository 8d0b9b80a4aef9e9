//! Regular icosahedron base solid
//!
//! The 12 vertices are the cyclic permutations of `(±1, ±φ, 0)`, which places
//! them on a sphere of radius `sqrt(1 + φ²)`. They are left unnormalized here;
//! subdivision normalizes every midpoint it creates and the final projection
//! pass normalizes everything else.

use glam::DVec3;

/// Golden ratio φ = (1 + √5) / 2
pub const PHI: f64 = 1.618_033_988_749_895;

/// Vertex count of the base icosahedron
pub const BASE_VERTEX_COUNT: usize = 12;

/// Face count of the base icosahedron
pub const BASE_FACE_COUNT: usize = 20;

const BASE_FACES: [[u32; 3]; BASE_FACE_COUNT] = [
    // 5 faces around vertex 0
    [0, 11, 5],
    [0, 5, 1],
    [0, 1, 7],
    [0, 7, 10],
    [0, 10, 11],
    // 5 adjacent faces
    [1, 5, 9],
    [5, 11, 4],
    [11, 10, 2],
    [10, 7, 6],
    [7, 1, 8],
    // 5 faces around vertex 3
    [3, 9, 4],
    [3, 4, 2],
    [3, 2, 6],
    [3, 6, 8],
    [3, 8, 9],
    // 5 adjacent faces
    [4, 9, 5],
    [2, 4, 11],
    [6, 2, 10],
    [8, 6, 7],
    [9, 8, 1],
];

/// Create the 12 vertices and 20 faces of a regular icosahedron
///
/// Faces share a consistent outward winding. The result is deterministic.
///
/// # Example
///
/// ```
/// use icosphere_planet::geometry::create_base_solid;
///
/// let (vertices, faces) = create_base_solid();
/// assert_eq!(vertices.len(), 12);
/// assert_eq!(faces.len(), 20);
/// ```
pub fn create_base_solid() -> (Vec<DVec3>, Vec<[u32; 3]>) {
    let t = PHI;
    let vertices = vec![
        DVec3::new(-1.0, t, 0.0),
        DVec3::new(1.0, t, 0.0),
        DVec3::new(-1.0, -t, 0.0),
        DVec3::new(1.0, -t, 0.0),
        DVec3::new(0.0, -1.0, t),
        DVec3::new(0.0, 1.0, t),
        DVec3::new(0.0, -1.0, -t),
        DVec3::new(0.0, 1.0, -t),
        DVec3::new(t, 0.0, -1.0),
        DVec3::new(t, 0.0, 1.0),
        DVec3::new(-t, 0.0, -1.0),
        DVec3::new(-t, 0.0, 1.0),
    ];

    (vertices, BASE_FACES.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_solid_counts() {
        let (vertices, faces) = create_base_solid();
        assert_eq!(vertices.len(), BASE_VERTEX_COUNT);
        assert_eq!(faces.len(), BASE_FACE_COUNT);
    }

    #[test]
    fn test_base_vertices_equidistant() {
        let (vertices, _) = create_base_solid();
        let expected = (1.0 + PHI * PHI).sqrt();
        for v in &vertices {
            assert!((v.length() - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_every_vertex_has_degree_five() {
        let (_, faces) = create_base_solid();
        let mut uses = [0usize; BASE_VERTEX_COUNT];
        for face in &faces {
            for &v in face {
                uses[v as usize] += 1;
            }
        }
        assert!(uses.iter().all(|&n| n == 5));
    }

    #[test]
    fn test_faces_wind_outward() {
        let (vertices, faces) = create_base_solid();
        for face in &faces {
            let a = vertices[face[0] as usize];
            let b = vertices[face[1] as usize];
            let c = vertices[face[2] as usize];
            let normal = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(normal.dot(centroid) > 0.0, "face {:?} winds inward", face);
        }
    }
}
