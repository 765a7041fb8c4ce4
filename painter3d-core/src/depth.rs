/// Per-triangle depth metrics and painter's-algorithm ordering
use std::cmp::Ordering;

use crate::geometry::{Triangle, Vertex};
use crate::projection::Camera;

/// Computes the sort key of a world triangle
pub trait DepthMetric {
    fn depth(&self, triangle: &Triangle, vertices: &[Vertex], camera: &Camera) -> f64;
}

/// Mean world-space z of the three corners, ignoring the camera entirely.
///
/// This is the legacy metric. It only matches view depth for an unrotated
/// camera looking down +z.
#[derive(Debug, Clone, Copy, Default)]
pub struct WorldDepth;

impl DepthMetric for WorldDepth {
    fn depth(&self, triangle: &Triangle, vertices: &[Vertex], _camera: &Camera) -> f64 {
        let [a, b, c] = triangle.indices;
        (vertices[a].z + vertices[b].z + vertices[c].z) / 3.0
    }
}

/// Mean z of the three corners after the camera translation and rotation
#[derive(Debug, Clone, Copy, Default)]
pub struct CameraDepth;

impl DepthMetric for CameraDepth {
    fn depth(&self, triangle: &Triangle, vertices: &[Vertex], camera: &Camera) -> f64 {
        let [a, b, c] = triangle.indices;
        let z = |i: usize| camera.to_camera_space(&vertices[i]).z;
        (z(a) + z(b) + z(c)) / 3.0
    }
}

/// A triangle's position in the world triangle buffer and its sort key
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthEntry {
    pub triangle: usize,
    pub depth: f64,
}

/// Order triangles by ascending depth.
///
/// The sort is stable, so ties keep their buffer order. Triangles with a NaN
/// depth (non-finite corners) sort after every finite or infinite depth and
/// are therefore drawn last, in buffer order. Indices must already be
/// validated.
pub fn sort_by_depth(
    triangles: &[Triangle],
    vertices: &[Vertex],
    camera: &Camera,
    metric: &dyn DepthMetric,
) -> Vec<DepthEntry> {
    let mut entries: Vec<DepthEntry> = triangles
        .iter()
        .enumerate()
        .map(|(triangle, tri)| DepthEntry {
            triangle,
            depth: metric.depth(tri, vertices, camera),
        })
        .collect();

    entries.sort_by(|a, b| compare_depth(a.depth, b.depth));
    entries
}

/// Total order on depths: NaN ranks above everything, `-0.0 == 0.0`
fn compare_depth(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (nan_a, nan_b) => nan_a.cmp(&nan_b),
    }
}
