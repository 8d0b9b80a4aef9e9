//! Spatial indexing for fast position-to-face lookups
//!
//! This module is only available with the `spatial-index` feature.

use std::fmt;

use glam::DVec3;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

/// KD-tree over face centers
///
/// Provides O(log n) nearest-neighbor lookups to convert 3D positions into
/// face indices, e.g. for picking a face under a cursor ray hit.
///
/// # Performance
///
/// - Construction: O(n log n)
/// - Query: O(log n)
#[derive(Clone)]
pub struct SpatialIndex {
    tree: Option<ImmutableKdTree<f64, usize, 3, 32>>,
    len: usize,
}

impl SpatialIndex {
    /// Build a spatial index from face centers
    ///
    /// # Example
    ///
    /// ```
    /// use icosphere_planet::*;
    ///
    /// let centers = vec![
    ///     DVec3::new(1.0, 0.0, 0.0),
    ///     DVec3::new(0.0, 1.0, 0.0),
    ///     DVec3::new(0.0, 0.0, 1.0),
    /// ];
    ///
    /// let index = SpatialIndex::new(&centers);
    /// assert_eq!(index.find_nearest(DVec3::new(1.0, 0.1, 0.0)), Some(0));
    /// ```
    pub fn new(centers: &[DVec3]) -> Self {
        let points: Vec<[f64; 3]> = centers.iter().map(|c| c.to_array()).collect();

        let tree = if points.is_empty() {
            None
        } else {
            Some(ImmutableKdTree::new_from_slice(&points))
        };

        Self {
            tree,
            len: points.len(),
        }
    }

    /// Find the face whose center is nearest to a position
    ///
    /// Returns `None` for an empty index.
    pub fn find_nearest(&self, position: DVec3) -> Option<usize> {
        let tree = self.tree.as_ref()?;
        let result = tree.nearest_one::<SquaredEuclidean>(&position.to_array());
        Some(result.item as usize)
    }

    /// Number of indexed faces
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the index holds no faces
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialIndex").field("len", &self.len).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spatial_index_basic() {
        let centers = vec![
            DVec3::new(1.0, 0.0, 0.0),
            DVec3::new(0.0, 1.0, 0.0),
            DVec3::new(0.0, 0.0, 1.0),
            DVec3::new(-1.0, 0.0, 0.0),
        ];

        let index = SpatialIndex::new(&centers);
        assert_eq!(index.len(), 4);

        assert_eq!(index.find_nearest(DVec3::new(0.9, 0.1, 0.0)), Some(0));
        assert_eq!(index.find_nearest(DVec3::new(0.0, 0.95, 0.0)), Some(1));
        assert_eq!(index.find_nearest(DVec3::new(0.0, 0.1, 0.9)), Some(2));
        assert_eq!(index.find_nearest(DVec3::new(-0.8, 0.0, 0.0)), Some(3));
    }

    #[test]
    fn test_spatial_index_exact_match() {
        let centers = vec![DVec3::new(10.0, 0.0, 0.0), DVec3::new(0.0, 10.0, 0.0)];
        let index = SpatialIndex::new(&centers);

        assert_eq!(index.find_nearest(centers[0]), Some(0));
        assert_eq!(index.find_nearest(centers[1]), Some(1));
    }

    #[test]
    fn test_empty_index() {
        let index = SpatialIndex::new(&[]);
        assert!(index.is_empty());
        assert_eq!(index.find_nearest(DVec3::X), None);
    }
}
