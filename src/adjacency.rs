//! Face adjacency graph
//!
//! Nodes are mesh faces (identified by their index in the face list) and two
//! faces are connected when they share a mesh edge. On a closed 2-manifold
//! triangulation such as an icosphere every face has exactly three neighbors.

use std::collections::{HashMap, VecDeque};

use crate::error::{PlanetError, Result};

/// Face index -> neighboring face indices
///
/// Neighbor order is reproducible for a given face list but carries no
/// geometric meaning; compare adjacencies with [`FaceAdjacency::same_membership`]
/// when order should not matter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaceAdjacency {
    neighbors: Vec<Vec<usize>>,
}

/// Build the face adjacency graph from shared edges
///
/// Each face contributes its three undirected edges, keyed with the smaller
/// vertex index first. When an edge has been seen before, every face already
/// recorded for it is linked with the current face in both directions.
/// A non-manifold edge (shared by more than two faces) links all of its faces
/// to each other; the geometry kernel never produces one.
///
/// # Example
///
/// ```
/// use icosphere_planet::adjacency::build_face_adjacency;
/// use icosphere_planet::geometry::create_base_solid;
///
/// let (_, faces) = create_base_solid();
/// let adjacency = build_face_adjacency(&faces);
/// assert!((0..20).all(|f| adjacency.neighbors(f).len() == 3));
/// ```
pub fn build_face_adjacency(faces: &[[u32; 3]]) -> FaceAdjacency {
    let mut neighbors: Vec<Vec<usize>> = vec![Vec::with_capacity(3); faces.len()];
    let mut edge_faces: HashMap<(u32, u32), Vec<usize>> = HashMap::with_capacity(faces.len() * 3 / 2);

    for (face_idx, face) in faces.iter().enumerate() {
        for i in 0..3 {
            let a = face[i];
            let b = face[(i + 1) % 3];
            let edge = if a < b { (a, b) } else { (b, a) };

            let owners = edge_faces.entry(edge).or_default();
            for &other in owners.iter() {
                link(&mut neighbors, face_idx, other);
                link(&mut neighbors, other, face_idx);
            }
            owners.push(face_idx);
        }
    }

    FaceAdjacency { neighbors }
}

/// Record `to` as a neighbor of `from`, once
fn link(neighbors: &mut [Vec<usize>], from: usize, to: usize) {
    if from != to && !neighbors[from].contains(&to) {
        neighbors[from].push(to);
    }
}

impl FaceAdjacency {
    /// Wrap precomputed neighbor lists
    pub fn from_lists(neighbors: Vec<Vec<usize>>) -> Self {
        Self { neighbors }
    }

    /// Number of faces in the graph
    #[inline]
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// Check if the graph has no faces
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Neighbors of a face, or an empty slice for an unknown face
    #[inline]
    pub fn neighbors(&self, face: usize) -> &[usize] {
        self.neighbors
            .get(face)
            .map(|n| n.as_slice())
            .unwrap_or(&[])
    }

    /// All neighbor lists in face order
    pub fn lists(&self) -> &[Vec<usize>] {
        &self.neighbors
    }

    /// Check that both graphs connect the same faces, ignoring neighbor order
    pub fn same_membership(&self, other: &FaceAdjacency) -> bool {
        if self.len() != other.len() {
            return false;
        }

        self.neighbors.iter().zip(&other.neighbors).all(|(a, b)| {
            let mut a = a.clone();
            let mut b = b.clone();
            a.sort_unstable();
            b.sort_unstable();
            a == b
        })
    }

    /// Breadth-first walk from `start` visiting every face within `max_hops`
    ///
    /// `visit` receives each face once together with its hop count, in BFS
    /// order. Does nothing if `start` is out of range.
    pub fn walk_within<F>(&self, start: usize, max_hops: usize, mut visit: F)
    where
        F: FnMut(usize, usize),
    {
        if start >= self.len() {
            return;
        }

        let mut visited = vec![false; self.len()];
        let mut queue = VecDeque::new();
        visited[start] = true;
        queue.push_back((start, 0usize));

        while let Some((face, depth)) = queue.pop_front() {
            visit(face, depth);
            if depth == max_hops {
                continue;
            }
            for &neighbor in &self.neighbors[face] {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    queue.push_back((neighbor, depth + 1));
                }
            }
        }
    }

    /// Faces within `hops` graph steps of `center`, including `center`
    ///
    /// Returned in BFS order. Empty if `center` is out of range.
    pub fn faces_within(&self, center: usize, hops: usize) -> Vec<usize> {
        let mut faces = Vec::new();
        self.walk_within(center, hops, |face, _| faces.push(face));
        faces
    }

    /// Shortest path length in hops between two faces
    ///
    /// Returns `None` if either face is out of range or they are disconnected.
    pub fn graph_distance(&self, from: usize, to: usize) -> Option<usize> {
        if from >= self.len() || to >= self.len() {
            return None;
        }

        let mut result = None;
        self.walk_within(from, usize::MAX, |face, depth| {
            if face == to && result.is_none() {
                result = Some(depth);
            }
        });
        result
    }

    /// Check whether `to` is reachable from `from` in fewer than `hops` steps
    ///
    /// Only explores `hops - 1` layers, so the cost is bounded by the
    /// neighborhood size rather than the whole mesh.
    pub fn is_closer_than(&self, from: usize, to: usize, hops: usize) -> bool {
        if hops == 0 {
            return false;
        }

        let mut found = false;
        self.walk_within(from, hops - 1, |face, _| {
            if face == to {
                found = true;
            }
        });
        found
    }

    /// Encode as ragged arrays: per-face neighbor counts plus the flattened
    /// concatenation of all neighbor lists in face order
    pub fn to_ragged(&self) -> (Vec<u32>, Vec<u32>) {
        let lengths = self.neighbors.iter().map(|n| n.len() as u32).collect();
        let flat = self
            .neighbors
            .iter()
            .flat_map(|n| n.iter().map(|&f| f as u32))
            .collect();
        (lengths, flat)
    }

    /// Decode ragged arrays produced by [`FaceAdjacency::to_ragged`]
    ///
    /// # Errors
    ///
    /// Returns `MalformedFile` if the lengths do not cover exactly the flat
    /// array, if there is not one length per face, or if a neighbor index is
    /// not a valid face.
    pub fn from_ragged(lengths: &[u32], flat: &[u32], face_count: usize) -> Result<Self> {
        if lengths.len() != face_count {
            return Err(PlanetError::MalformedFile(format!(
                "adjacency has {} length entries for {} faces",
                lengths.len(),
                face_count
            )));
        }

        let total: usize = lengths.iter().map(|&n| n as usize).sum();
        if total != flat.len() {
            return Err(PlanetError::MalformedFile(format!(
                "adjacency lengths sum to {} but flat array holds {}",
                total,
                flat.len()
            )));
        }

        let mut cursor = 0;
        let mut neighbors = Vec::with_capacity(face_count);
        for &count in lengths {
            let end = cursor + count as usize;
            let list: Vec<usize> = flat[cursor..end].iter().map(|&f| f as usize).collect();
            if let Some(&bad) = list.iter().find(|&&f| f >= face_count) {
                return Err(PlanetError::MalformedFile(format!(
                    "adjacency references face {} of {}",
                    bad, face_count
                )));
            }
            neighbors.push(list);
            cursor = end;
        }

        Ok(Self { neighbors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{build_icosphere, create_base_solid};

    #[test]
    fn test_icosahedron_adjacency_complete() {
        let (_, faces) = create_base_solid();
        let adjacency = build_face_adjacency(&faces);

        assert_eq!(adjacency.len(), 20);
        for face in 0..20 {
            let neighbors = adjacency.neighbors(face);
            assert_eq!(neighbors.len(), 3);
            assert!(!neighbors.contains(&face));
            assert!(neighbors.iter().all(|&n| n < 20));
        }
    }

    #[test]
    fn test_subdivided_adjacency_symmetric() {
        let (_, faces) = build_icosphere(3, 1.0).unwrap();
        let adjacency = build_face_adjacency(&faces);

        for face in 0..adjacency.len() {
            assert_eq!(adjacency.neighbors(face).len(), 3);
            for &n in adjacency.neighbors(face) {
                assert!(adjacency.neighbors(n).contains(&face));
            }
        }
    }

    #[test]
    fn test_neighbors_share_an_edge() {
        let (_, faces) = build_icosphere(2, 1.0).unwrap();
        let adjacency = build_face_adjacency(&faces);

        for (face, verts) in faces.iter().enumerate() {
            for &n in adjacency.neighbors(face) {
                let shared = verts.iter().filter(|v| faces[n].contains(v)).count();
                assert_eq!(shared, 2);
            }
        }
    }

    #[test]
    fn test_non_manifold_edge_links_all_owners() {
        // Three triangles fanned around edge (0, 1)
        let faces = [[0, 1, 2], [1, 0, 3], [0, 1, 4]];
        let adjacency = build_face_adjacency(&faces);

        let mut n0 = adjacency.neighbors(0).to_vec();
        n0.sort();
        assert_eq!(n0, vec![1, 2]);
        assert_eq!(adjacency.neighbors(2).len(), 2);
    }

    #[test]
    fn test_deterministic_order() {
        let (_, faces) = build_icosphere(2, 1.0).unwrap();
        assert_eq!(build_face_adjacency(&faces), build_face_adjacency(&faces));
    }

    #[test]
    fn test_invalid_face_has_no_neighbors() {
        let (_, faces) = create_base_solid();
        let adjacency = build_face_adjacency(&faces);
        assert!(adjacency.neighbors(999).is_empty());
        assert!(adjacency.faces_within(999, 3).is_empty());
        assert_eq!(adjacency.graph_distance(0, 999), None);
    }

    #[test]
    fn test_faces_within_radius() {
        let (_, faces) = build_icosphere(2, 1.0).unwrap();
        let adjacency = build_face_adjacency(&faces);

        assert_eq!(adjacency.faces_within(0, 0), vec![0]);

        let r1 = adjacency.faces_within(0, 1);
        assert_eq!(r1.len(), 4);
        assert_eq!(r1[0], 0);

        let r2 = adjacency.faces_within(0, 2);
        assert!(r2.len() > r1.len());
    }

    #[test]
    fn test_graph_distance() {
        let (_, faces) = build_icosphere(1, 1.0).unwrap();
        let adjacency = build_face_adjacency(&faces);

        assert_eq!(adjacency.graph_distance(5, 5), Some(0));
        let n = adjacency.neighbors(5)[0];
        assert_eq!(adjacency.graph_distance(5, n), Some(1));
        assert_eq!(adjacency.graph_distance(n, 5), Some(1));

        for target in 0..adjacency.len() {
            let d = adjacency.graph_distance(5, target).unwrap();
            assert!(adjacency.is_closer_than(5, target, d + 1));
            assert!(!adjacency.is_closer_than(5, target, d));
        }
    }

    #[test]
    fn test_ragged_roundtrip() {
        let (_, faces) = build_icosphere(1, 1.0).unwrap();
        let adjacency = build_face_adjacency(&faces);

        let (lengths, flat) = adjacency.to_ragged();
        assert_eq!(lengths.len(), 80);
        assert_eq!(flat.len(), 240);

        let decoded = FaceAdjacency::from_ragged(&lengths, &flat, 80).unwrap();
        assert_eq!(decoded, adjacency);
    }

    #[test]
    fn test_ragged_rejects_inconsistent_lengths() {
        let result = FaceAdjacency::from_ragged(&[1, 2], &[1, 0], 2);
        assert!(matches!(result, Err(PlanetError::MalformedFile(_))));

        let result = FaceAdjacency::from_ragged(&[1], &[0], 2);
        assert!(matches!(result, Err(PlanetError::MalformedFile(_))));

        let result = FaceAdjacency::from_ragged(&[1, 1], &[1, 7], 2);
        assert!(matches!(result, Err(PlanetError::MalformedFile(_))));
    }

    #[test]
    fn test_same_membership_ignores_order() {
        let a = FaceAdjacency::from_lists(vec![vec![1, 2], vec![0], vec![0]]);
        let b = FaceAdjacency::from_lists(vec![vec![2, 1], vec![0], vec![0]]);
        let c = FaceAdjacency::from_lists(vec![vec![1], vec![0], vec![0]]);
        assert!(a.same_membership(&b));
        assert!(!a.same_membership(&c));
    }
}
