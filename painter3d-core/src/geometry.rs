/// Geometry primitives for 3D rendering
use std::fmt;

use crate::linalg::Vec3;

/// A point in some local, world or camera space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vertex {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn to_vector(self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

impl From<Vec3> for Vertex {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

/// A projected point in pixel units, origin top-left, y growing downward
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Opaque color token handed verbatim to the draw surface (e.g. `"#f00"`)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Color(String);

impl Color {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Color {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for Color {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A flat-colored triangle defined by three indices into a vertex buffer
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub indices: [usize; 3],
    pub color: Color,
}

impl Triangle {
    pub fn new(a: usize, b: usize, c: usize, color: impl Into<Color>) -> Self {
        Self {
            indices: [a, b, c],
            color: color.into(),
        }
    }

    /// Same triangle with every index shifted by `offset`
    pub fn offset(&self, offset: usize) -> Self {
        Self {
            indices: self.indices.map(|i| i + offset),
            color: self.color.clone(),
        }
    }

    /// First index that does not address a buffer of `vertex_count` vertices
    pub fn invalid_index(&self, vertex_count: usize) -> Option<usize> {
        self.indices.iter().copied().find(|&i| i >= vertex_count)
    }
}

/// Reusable geometry template: a vertex buffer and the triangles indexing it
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Model {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
}

impl Model {
    pub fn new(vertices: Vec<Vertex>, triangles: Vec<Triangle>) -> Self {
        Self {
            vertices,
            triangles,
        }
    }

    /// Axis-aligned cube spanning `[-size, 0]` on x and z and `[0, size]` on y.
    ///
    /// Eight vertices and twelve triangles, two per face, each face pair
    /// sharing a color token.
    pub fn cube(size: f64) -> Self {
        let vertices = vec![
            Vertex::new(0.0, 0.0, 0.0),
            Vertex::new(0.0, size, 0.0),
            Vertex::new(-size, 0.0, 0.0),
            Vertex::new(-size, size, 0.0),
            Vertex::new(0.0, 0.0, -size),
            Vertex::new(0.0, size, -size),
            Vertex::new(-size, 0.0, -size),
            Vertex::new(-size, size, -size),
        ];
        let triangles = vec![
            Triangle::new(0, 1, 2, "#f00"),
            Triangle::new(3, 1, 2, "#f00"),
            Triangle::new(4, 5, 6, "#00f"),
            Triangle::new(7, 5, 6, "#00f"),
            Triangle::new(3, 2, 6, "#0f0"),
            Triangle::new(3, 6, 7, "#0f0"),
            Triangle::new(5, 3, 7, "#0ff"),
            Triangle::new(5, 3, 1, "#0ff"),
            Triangle::new(4, 5, 1, "#0f0"),
            Triangle::new(0, 1, 4, "#0f0"),
            Triangle::new(0, 4, 2, "#ff0"),
            Triangle::new(4, 2, 6, "#ff0"),
        ];
        Self::new(vertices, triangles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_offset_keeps_color() {
        let tri = Triangle::new(0, 1, 2, "#abc");
        let moved = tri.offset(8);
        assert_eq!(moved.indices, [8, 9, 10]);
        assert_eq!(moved.color.as_str(), "#abc");
    }

    #[test]
    fn test_invalid_index() {
        let tri = Triangle::new(0, 5, 2, "#fff");
        assert_eq!(tri.invalid_index(6), None);
        assert_eq!(tri.invalid_index(5), Some(5));
    }

    #[test]
    fn test_cube_indices_are_valid() {
        let cube = Model::cube(50.0);
        assert_eq!(cube.vertices.len(), 8);
        assert_eq!(cube.triangles.len(), 12);
        assert!(cube
            .triangles
            .iter()
            .all(|t| t.invalid_index(cube.vertices.len()).is_none()));
    }
}
