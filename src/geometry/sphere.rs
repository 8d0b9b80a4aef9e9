//! Sphere projection and per-face centroids

use glam::DVec3;

/// Project every vertex onto the sphere of the given radius
///
/// Each vertex is normalized to unit length and scaled by `radius`. A radius
/// of zero collapses every vertex onto the origin instead of normalizing.
pub fn project_to_sphere(vertices: &mut [DVec3], radius: f64) {
    if radius == 0.0 {
        vertices.iter_mut().for_each(|v| *v = DVec3::ZERO);
        return;
    }

    for v in vertices.iter_mut() {
        *v = v.normalize_or_zero() * radius;
    }
}

/// Compute the centroid (mean of the three corners) of every face
pub fn compute_face_centers(vertices: &[DVec3], faces: &[[u32; 3]]) -> Vec<DVec3> {
    faces
        .iter()
        .map(|&[a, b, c]| {
            (vertices[a as usize] + vertices[b as usize] + vertices[c as usize]) / 3.0
        })
        .collect()
}
