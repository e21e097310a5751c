//! Math utilities and types
//!
//! Column-major 4x4 matrices for uploading model/view/projection transforms
//! to GLES uniforms.

pub use nalgebra::Matrix4;

/// 4x4 matrix type, stored column-major
pub type Mat4 = Matrix4<f32>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Convert degrees to radians
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees * constants::DEG_TO_RAD
}

/// Build a right-handed rotation about the Z axis.
///
/// The angle is given in degrees. In flat column-major order the result is
/// `[c, s, 0, 0, -s, c, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1]`.
#[rustfmt::skip]
pub fn make_rotate_z(angle_degrees: f32) -> Mat4 {
    let (s, c) = deg_to_rad(angle_degrees).sin_cos();

    Mat4::new(
        c,  -s,  0.0, 0.0,
        s,   c,  0.0, 0.0,
        0.0, 0.0, 1.0, 0.0,
        0.0, 0.0, 0.0, 1.0,
    )
}

/// Build a diagonal scale matrix
pub fn make_scale(sx: f32, sy: f32, sz: f32) -> Mat4 {
    Mat4::new_nonuniform_scaling(&nalgebra::Vector3::new(sx, sy, sz))
}

/// Matrix product `a * b`.
///
/// The product is written into a fresh value, so callers may pass the same
/// matrix for both operands or overwrite an operand with the result.
pub fn multiply(a: &Mat4, b: &Mat4) -> Mat4 {
    a * b
}

/// View a matrix as 16 floats in column-major order, ready for
/// `glUniformMatrix4fv` with `transpose = false`.
pub fn as_column_major(matrix: &Mat4) -> &[f32] {
    matrix.as_slice()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-6;

    #[rustfmt::skip]
    fn sample() -> Mat4 {
        Mat4::new(
            1.0,  2.0,  3.0,  4.0,
            5.0,  6.0,  7.0,  8.0,
            9.0, 10.0, 11.0, 12.0,
           13.0, 14.0, 15.0, 16.0,
        )
    }

    #[test]
    fn test_identity_is_neutral_for_multiply() {
        let m = sample();
        let identity = Mat4::identity();

        assert_eq!(multiply(&identity, &m), m);
        assert_eq!(multiply(&m, &identity), m);
    }

    #[test]
    fn test_rotate_zero_is_identity() {
        assert_relative_eq!(make_rotate_z(0.0), Mat4::identity(), epsilon = EPSILON);
    }

    #[test]
    fn test_rotate_full_turn_is_periodic() {
        assert_relative_eq!(make_rotate_z(360.0), make_rotate_z(0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_rotations_compose_by_adding_angles() {
        let composed = multiply(&make_rotate_z(30.0), &make_rotate_z(60.0));
        assert_relative_eq!(composed, make_rotate_z(90.0), epsilon = 1e-5);

        let composed = multiply(&make_rotate_z(-45.0), &make_rotate_z(135.0));
        assert_relative_eq!(composed, make_rotate_z(90.0), epsilon = 1e-5);
    }

    #[test]
    fn test_rotate_column_major_layout() {
        let rot = make_rotate_z(90.0);
        let flat = as_column_major(&rot);

        // First column is the image of +X, which must land on +Y
        assert_relative_eq!(flat[0], 0.0, epsilon = EPSILON);
        assert_relative_eq!(flat[1], 1.0, epsilon = EPSILON);
        assert_relative_eq!(flat[4], -1.0, epsilon = EPSILON);
        assert_relative_eq!(flat[5], 0.0, epsilon = EPSILON);
        assert_relative_eq!(flat[10], 1.0, epsilon = EPSILON);
        assert_relative_eq!(flat[15], 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_unit_scale_is_identity() {
        assert_eq!(make_scale(1.0, 1.0, 1.0), Mat4::identity());
    }

    #[test]
    fn test_scale_diagonal() {
        let flat: Vec<f32> = as_column_major(&make_scale(0.5, 2.0, 3.0)).to_vec();
        assert_eq!(flat[0], 0.5);
        assert_eq!(flat[5], 2.0);
        assert_eq!(flat[10], 3.0);
        assert_eq!(flat[15], 1.0);
        assert_eq!(flat.iter().filter(|v| **v == 0.0).count(), 12);
    }

    #[test]
    fn test_multiply_result_may_replace_operand() {
        let mut m = make_rotate_z(30.0);
        m = multiply(&m, &m);
        assert_relative_eq!(m, make_rotate_z(60.0), epsilon = 1e-5);
    }
}
