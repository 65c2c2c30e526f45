//! Gaussian splat numeric conversions.
//!
//! Pure scalar transforms used only by the compact `.splat` record writer:
//! log-scale to linear, opacity logit to alpha byte, 0th-order SH to RGB,
//! quaternion normalization and byte packing. The full-precision splat PLY
//! path writes the stored values untouched.
//!
//! All float-to-byte conversions round half away from zero (`f32::round`).

use glam::Vec3;

/// 0th-order real spherical harmonic normalization constant; recovers RGB
/// from the `f_dc_*` coefficients.
pub const SH_C0: f32 = 0.282_094_791_773_878_14;

/// Logistic sigmoid.
#[inline]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Stored per-axis log scale to linear scale.
#[inline]
pub fn scale_linear(log_scale: f32) -> f32 {
    log_scale.exp()
}

/// Opacity logit to alpha byte via sigmoid activation.
#[inline]
pub fn alpha_byte(opacity_logit: f32) -> u8 {
    (sigmoid(opacity_logit) * 255.0).clamp(0.0, 255.0).round() as u8
}

/// Bake one 0th-order SH coefficient into a color byte.
#[inline]
pub fn sh0_to_byte(f_dc: f32) -> u8 {
    ((0.5 + SH_C0 * f_dc) * 255.0).clamp(0.0, 255.0).round() as u8
}

/// Normalize a quaternion (zero norm guarded) and map each component from
/// `[-1, 1]` to `[0, 255]`.
pub fn quat_to_bytes(q: [f32; 4]) -> [u8; 4] {
    let norm = (q[0] * q[0] + q[1] * q[1] + q[2] * q[2] + q[3] * q[3]).sqrt();
    let scale = if norm == 0.0 { 1.0 } else { 1.0 / norm };
    q.map(|c| ((0.5 + c * scale * 0.5) * 255.0).clamp(0.0, 255.0).round() as u8)
}

/// Componentwise `exp` of a log-scale vector.
#[inline]
pub fn scale_linear_vec3(log_scale: Vec3) -> Vec3 {
    Vec3::new(
        scale_linear(log_scale.x),
        scale_linear(log_scale.y),
        scale_linear(log_scale.z),
    )
}

/// Bake a 0th-order SH color triple into RGB bytes.
#[inline]
pub fn sh0_to_rgb(f_dc: Vec3) -> [u8; 3] {
    [
        sh0_to_byte(f_dc.x),
        sh0_to_byte(f_dc.y),
        sh0_to_byte(f_dc.z),
    ]
}
