/// Camera, view transform and perspective projection (world -> screen)
use crate::geometry::{ScreenPoint, Vertex};
use crate::linalg::{multiply_matrix_vector, Vec3};
use crate::transform::{RotationState, Transform};

/// Pixel dimensions of the draw surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Reflect a point through the viewport center
    pub fn mirror(&self, point: ScreenPoint) -> ScreenPoint {
        ScreenPoint::new(self.width - point.x, self.height - point.y)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1000.0, 1000.0)
    }
}

/// A vertex after the view transform and perspective divide, before any
/// behind-camera handling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Screen position from the plain perspective divide
    pub direct: ScreenPoint,
    /// Dot product of the camera-relative vertex with the facing vector
    pub facing_dot: f64,
}

/// Decides the final screen position of a projected vertex
pub trait BehindCameraPolicy {
    fn resolve(&self, projection: &Projection, viewport: &Viewport) -> ScreenPoint;
}

/// Legacy heuristic: a positive facing dot product mirrors the point about
/// the viewport center.
///
/// This is not clipping. Geometry is never discarded, so triangles straddling
/// the camera plane may be drawn with wrong but finite-or-infinite points.
#[derive(Debug, Clone, Copy, Default)]
pub struct MirrorBehind;

impl BehindCameraPolicy for MirrorBehind {
    fn resolve(&self, projection: &Projection, viewport: &Viewport) -> ScreenPoint {
        if projection.facing_dot > 0.0 {
            viewport.mirror(projection.direct)
        } else {
            projection.direct
        }
    }
}

/// Always use the direct perspective projection
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectProjection;

impl BehindCameraPolicy for DirectProjection {
    fn resolve(&self, projection: &Projection, _viewport: &Viewport) -> ScreenPoint {
        projection.direct
    }
}

/// Camera configuration for 3D rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Field of view in radians
    pub fov: f64,
    pub rotation: RotationState,
}

impl Camera {
    pub fn new(x: f64, y: f64, z: f64, fov: f64, rx: f64, ry: f64, rz: f64) -> Self {
        Self {
            position: Vec3::new(x, y, z),
            fov,
            rotation: RotationState::new(rx, ry, rz),
        }
    }

    /// Rotate a camera-relative vector by the camera angles (`Rz * Ry * Rx`)
    pub fn rotate_vertex(&self, v: &Vec3) -> Vec3 {
        multiply_matrix_vector(&Transform::rotation_matrix(&self.rotation), v)
    }

    /// Translate a world vertex relative to the camera, then rotate it
    pub fn to_camera_space(&self, v: &Vertex) -> Vec3 {
        self.rotate_vertex(&(v.to_vector() - self.position))
    }

    /// Unit facing vector derived from pitch (`rx`) and yaw (`ry`)
    pub fn facing(&self) -> Vec3 {
        let (sin_x, cos_x) = self.rotation.x.sin_cos();
        let (sin_y, cos_y) = self.rotation.y.sin_cos();
        Vec3::new(sin_y * cos_x, -sin_x, cos_y * cos_x)
    }

    /// View transform and perspective divide without behind-camera handling.
    ///
    /// The camera looks down +z. A camera-relative z of zero yields
    /// non-finite coordinates, which are returned as-is.
    pub fn project(&self, v: &Vertex, viewport: &Viewport) -> Projection {
        let rel = self.to_camera_space(v);
        let facing = self.facing();
        let facing_dot = rel.x * facing.x + rel.y * facing.y + rel.z * facing.z;

        let fov_factor = (self.fov / 2.0).tan();
        let x2d = rel.x / (rel.z * fov_factor);
        let y2d = rel.y / (rel.z * fov_factor);

        let direct = ScreenPoint::new(
            (x2d + 1.0) / 2.0 * viewport.width,
            ((y2d + 1.0) / 2.0) * viewport.height,
        );

        Projection { direct, facing_dot }
    }

    /// Full world-to-screen mapping of one vertex under `policy`
    pub fn process_vertex(
        &self,
        v: &Vertex,
        viewport: &Viewport,
        policy: &dyn BehindCameraPolicy,
    ) -> ScreenPoint {
        policy.resolve(&self.project(v, viewport), viewport)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(0.0, 0.0, 0.0, std::f64::consts::FRAC_PI_4, 0.0, 0.0, 0.0)
    }
}
