/// 3x3 linear algebra kernel used by every rotation in the pipeline
use nalgebra::{Matrix3, Vector3};

/// Row-major 3x3 matrix of doubles
pub type Mat3 = Matrix3<f64>;

/// Column 3-vector of doubles
pub type Vec3 = Vector3<f64>;

/// Apply `m` to `v`.
///
/// Each row is accumulated left to right (`m[r][0]*x + m[r][1]*y + m[r][2]*z`)
/// so results are reproducible across platforms and match the rotation
/// tables the rest of the crate is tested against.
pub fn multiply_matrix_vector(m: &Mat3, v: &Vec3) -> Vec3 {
    Vec3::new(
        m[(0, 0)] * v.x + m[(0, 1)] * v.y + m[(0, 2)] * v.z,
        m[(1, 0)] * v.x + m[(1, 1)] * v.y + m[(1, 2)] * v.z,
        m[(2, 0)] * v.x + m[(2, 1)] * v.y + m[(2, 2)] * v.z,
    )
}

/// Standard matrix product `a * b`, built into a fresh matrix.
pub fn multiply_matrix_matrix(a: &Mat3, b: &Mat3) -> Mat3 {
    Mat3::from_fn(|i, j| a[(i, 0)] * b[(0, j)] + a[(i, 1)] * b[(1, j)] + a[(i, 2)] * b[(2, j)])
}
