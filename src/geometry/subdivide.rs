//! Loop-style 1-to-4 triangle subdivision with shared midpoints

use glam::DVec3;
use std::collections::HashMap;

/// Cache from an unordered vertex pair to the index of its midpoint vertex
///
/// Keys are stored with the smaller index first so that `(a, b)` and `(b, a)`
/// resolve to the same midpoint. Every edge shared by two triangles therefore
/// produces exactly one new vertex, which keeps the subdivided mesh watertight.
#[derive(Debug, Default)]
struct MidpointCache {
    midpoints: HashMap<(u32, u32), u32>,
}

impl MidpointCache {
    fn with_capacity(edges: usize) -> Self {
        Self {
            midpoints: HashMap::with_capacity(edges),
        }
    }

    /// Return the midpoint index of edge `(a, b)`, appending a new unit-length
    /// vertex to `vertices` on first use
    fn midpoint(&mut self, a: u32, b: u32, vertices: &mut Vec<DVec3>) -> u32 {
        let key = if a < b { (a, b) } else { (b, a) };
        if let Some(&index) = self.midpoints.get(&key) {
            return index;
        }

        let mid = (vertices[a as usize] + vertices[b as usize]) * 0.5;
        let index = vertices.len() as u32;
        vertices.push(mid.normalize_or_zero());
        self.midpoints.insert(key, index);
        index
    }
}

/// Subdivide every triangle into four
///
/// For a triangle `(v1, v2, v3)` with edge midpoints `a = mid(v1, v2)`,
/// `b = mid(v2, v3)` and `c = mid(v3, v1)`, the output faces are
/// `(v1, a, c)`, `(v2, b, a)`, `(v3, c, b)` and the center `(a, b, c)`,
/// preserving the input winding. Original vertices keep their indices and
/// new midpoints are appended after them, normalized to unit length.
///
/// # Example
///
/// ```
/// use icosphere_planet::geometry::{create_base_solid, subdivide};
///
/// let (vertices, faces) = create_base_solid();
/// let (vertices, faces) = subdivide(vertices, &faces);
/// assert_eq!(vertices.len(), 42);
/// assert_eq!(faces.len(), 80);
/// ```
pub fn subdivide(mut vertices: Vec<DVec3>, faces: &[[u32; 3]]) -> (Vec<DVec3>, Vec<[u32; 3]>) {
    // Closed triangle mesh: E = 3F / 2
    let edge_count = faces.len() * 3 / 2;
    let mut cache = MidpointCache::with_capacity(edge_count);
    vertices.reserve(edge_count);

    let mut new_faces = Vec::with_capacity(faces.len() * 4);
    for &[v1, v2, v3] in faces {
        let a = cache.midpoint(v1, v2, &mut vertices);
        let b = cache.midpoint(v2, v3, &mut vertices);
        let c = cache.midpoint(v3, v1, &mut vertices);

        new_faces.push([v1, a, c]);
        new_faces.push([v2, b, a]);
        new_faces.push([v3, c, b]);
        new_faces.push([a, b, c]);
    }

    (vertices, new_faces)
}
