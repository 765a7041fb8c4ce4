/// Rotation state, rotation matrices and entity placement (model -> world)
use crate::geometry::Vertex;
use crate::linalg::{multiply_matrix_matrix, multiply_matrix_vector, Mat3, Vec3};

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl RotationState {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

/// Rotation matrix builders (right-handed, radians)
pub struct Transform;

impl Transform {
    /// Rotation about the x axis; leaves x untouched
    pub fn rotation_x(angle: f64) -> Mat3 {
        let (sin, cos) = angle.sin_cos();
        Mat3::new(1.0, 0.0, 0.0, 0.0, cos, -sin, 0.0, sin, cos)
    }

    /// Rotation about the y axis; leaves y untouched
    pub fn rotation_y(angle: f64) -> Mat3 {
        let (sin, cos) = angle.sin_cos();
        Mat3::new(cos, 0.0, sin, 0.0, 1.0, 0.0, -sin, 0.0, cos)
    }

    /// Rotation about the z axis; leaves z untouched
    pub fn rotation_z(angle: f64) -> Mat3 {
        let (sin, cos) = angle.sin_cos();
        Mat3::new(cos, -sin, 0.0, sin, cos, 0.0, 0.0, 0.0, 1.0)
    }

    /// Composite rotation `Rz * Ry * Rx`: x is applied first, then y, then z.
    pub fn rotation_matrix(rotation: &RotationState) -> Mat3 {
        let rx = Self::rotation_x(rotation.x);
        let ry = Self::rotation_y(rotation.y);
        let rz = Self::rotation_z(rotation.z);

        multiply_matrix_matrix(&multiply_matrix_matrix(&rz, &ry), &rx)
    }
}

/// Where an entity sits in the world: position, rotation and per-axis scale.
///
/// The default is the identity placement (origin, no rotation, unit scale),
/// which is also what an absolute `set` falls back to for omitted fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vec3,
    pub rotation: RotationState,
    pub scale: Vec3,
}

impl Placement {
    pub fn at(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            ..Self::default()
        }
    }

    pub fn with_rotation(mut self, rx: f64, ry: f64, rz: f64) -> Self {
        self.rotation = RotationState::new(rx, ry, rz);
        self
    }

    pub fn with_scale(mut self, sx: f64, sy: f64, sz: f64) -> Self {
        self.scale = Vec3::new(sx, sy, sz);
        self
    }

    /// Scale componentwise, rotate by `Rz * Ry * Rx`, then translate.
    pub fn apply(&self, vertex: &Vertex) -> Vertex {
        let scaled = vertex.to_vector().component_mul(&self.scale);
        let rotated = multiply_matrix_vector(&Transform::rotation_matrix(&self.rotation), &scaled);
        Vertex::from(rotated + self.position)
    }

    /// Add every field of `delta` in place
    pub fn apply_delta(&mut self, delta: &PlacementDelta) {
        self.position += delta.translation;
        self.rotation
            .rotate(delta.rotation.x, delta.rotation.y, delta.rotation.z);
        self.scale += delta.scale;
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: RotationState::zero(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

/// Relative change to a [`Placement`].
///
/// Every field defaults to zero, scale included, so a delta that only names a
/// translation leaves rotation and scale exactly as they were.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlacementDelta {
    pub translation: Vec3,
    pub rotation: RotationState,
    pub scale: Vec3,
}

impl PlacementDelta {
    pub fn translate(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            translation: Vec3::new(dx, dy, dz),
            ..Self::default()
        }
    }

    pub fn with_rotation(mut self, drx: f64, dry: f64, drz: f64) -> Self {
        self.rotation = RotationState::new(drx, dry, drz);
        self
    }

    pub fn with_scale(mut self, dsx: f64, dsy: f64, dsz: f64) -> Self {
        self.scale = Vec3::new(dsx, dsy, dsz);
        self
    }
}

impl Default for PlacementDelta {
    fn default() -> Self {
        Self {
            translation: Vec3::zeros(),
            rotation: RotationState::zero(),
            scale: Vec3::zeros(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_rotation_state() {
        let mut state = RotationState::zero();
        assert_eq!(state.x, 0.0);
        assert_eq!(state.y, 0.0);
        assert_eq!(state.z, 0.0);

        state.rotate(0.1, 0.2, 0.3);
        assert!((state.x - 0.1).abs() < 1e-12);
        assert!((state.y - 0.2).abs() < 1e-12);
        assert!((state.z - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_identity_rotation() {
        let rotation = RotationState::zero();
        let matrix = Transform::rotation_matrix(&rotation);
        assert!((matrix - Mat3::identity()).norm() < 1e-12);
    }

    #[test]
    fn test_rotation_is_orthogonal() {
        let angles = [-2.5, -0.7, 0.0, 0.3, 1.1, PI, 4.0];
        for &rx in &angles {
            for &ry in &angles {
                for &rz in &angles {
                    let r = Transform::rotation_matrix(&RotationState::new(rx, ry, rz));
                    assert!((r * r.transpose() - Mat3::identity()).norm() < 1e-9);
                    assert!((r.determinant() - 1.0).abs() < 1e-9);
                }
            }
        }
    }

    #[test]
    fn test_x_rotation_applies_before_z() {
        // x then z: (0,1,0) -> (0,0,1) -> (0,0,1)
        let r = Transform::rotation_matrix(&RotationState::new(FRAC_PI_2, 0.0, FRAC_PI_2));
        let v = multiply_matrix_vector(&r, &Vec3::new(0.0, 1.0, 0.0));
        assert!((v - Vec3::new(0.0, 0.0, 1.0)).norm() < 1e-12);
    }

    #[test]
    fn test_identity_placement_round_trip() {
        let v = Vertex::new(3.5, -2.0, 17.25);
        assert_eq!(Placement::default().apply(&v), v);
    }

    #[test]
    fn test_placement_scales_rotates_then_translates() {
        let placement = Placement::at(10.0, 0.0, 0.0)
            .with_rotation(0.0, 0.0, FRAC_PI_2)
            .with_scale(2.0, 1.0, 1.0);
        let out = placement.apply(&Vertex::new(1.0, 0.0, 0.0));
        // (1,0,0) -> scale (2,0,0) -> rotate z 90deg (0,2,0) -> translate
        assert!((out.x - 10.0).abs() < 1e-12);
        assert!((out.y - 2.0).abs() < 1e-12);
        assert!(out.z.abs() < 1e-12);
    }

    #[test]
    fn test_default_delta_leaves_rotation_and_scale() {
        let mut placement = Placement::at(1.0, 2.0, 3.0)
            .with_rotation(0.4, 0.5, 0.6)
            .with_scale(2.0, 3.0, 4.0);
        placement.apply_delta(&PlacementDelta::translate(1.0, 1.0, 1.0));
        assert_eq!(placement.position, Vec3::new(2.0, 3.0, 4.0));
        assert_eq!(placement.rotation, RotationState::new(0.4, 0.5, 0.6));
        assert_eq!(placement.scale, Vec3::new(2.0, 3.0, 4.0));
    }
}
