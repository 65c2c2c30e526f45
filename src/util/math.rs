//! Math helpers for world-space transforms.
//!
//! Re-exports the glam types used throughout the library and provides the
//! normal-matrix computation shared by the PLY and splat export paths.

// Re-export glam types
pub use glam::{Mat3, Mat4, Quat, Vec3, Vec4};

/// Determinants smaller than this are treated as singular.
const SINGULAR_EPS: f32 = 1e-8;

/// Compute the normal matrix (inverse-transpose of the upper-left 3x3 block)
/// for a world transform.
///
/// A singular rotation/scale block never fails: the inverse is retried with a
/// nudged diagonal, and falls back to the identity if the matrix is still
/// degenerate (e.g. a zero scale on every axis).
pub fn normal_matrix(world: Mat4) -> Mat3 {
    let r = Mat3::from_mat4(world);
    safe_inverse(r).transpose()
}

/// Invert a 3x3 matrix, substituting a pseudo-inverse for singular input.
pub fn safe_inverse(m: Mat3) -> Mat3 {
    if m.determinant().abs() > SINGULAR_EPS {
        return m.inverse();
    }

    // Nudge the diagonal and retry, like Blender's inverted_safe().
    let nudged = m
        + Mat3::from_diagonal(Vec3::splat(SINGULAR_EPS.sqrt()));
    if nudged.determinant().abs() > SINGULAR_EPS {
        nudged.inverse()
    } else {
        Mat3::IDENTITY
    }
}

/// Normalize a vector, leaving zero-length input unchanged instead of
/// producing NaN (a zero norm is treated as 1).
#[inline]
pub fn normalize_or_zero(v: Vec3) -> Vec3 {
    let len = v.length();
    if len == 0.0 {
        v
    } else {
        v / len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_matrix_identity() {
        let nm = normal_matrix(Mat4::IDENTITY);
        assert!(nm.abs_diff_eq(Mat3::IDENTITY, 1e-6));
    }

    #[test]
    fn test_normal_matrix_uniform_scale() {
        // Uniform scale 2 -> normal matrix is 0.5 * identity.
        let nm = normal_matrix(Mat4::from_scale(Vec3::splat(2.0)));
        assert!(nm.abs_diff_eq(Mat3::from_diagonal(Vec3::splat(0.5)), 1e-6));
    }

    #[test]
    fn test_safe_inverse_singular() {
        let singular = Mat3::from_diagonal(Vec3::new(1.0, 1.0, 0.0));
        let inv = safe_inverse(singular);
        assert!(inv.is_finite());

        let zero = Mat3::ZERO;
        let inv = safe_inverse(zero);
        assert!(inv.is_finite());
    }

    #[test]
    fn test_normalize_or_zero() {
        let n = normalize_or_zero(Vec3::new(3.0, 0.0, 4.0));
        assert!((n.length() - 1.0).abs() < 1e-6);

        let z = normalize_or_zero(Vec3::ZERO);
        assert_eq!(z, Vec3::ZERO);
    }
}
