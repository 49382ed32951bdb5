// Centralized tolerances and sampling constants

pub const EPS_LEN: f32 = 1e-6; // zero-length vector threshold

/// World-space sample spacing for Bézier segments: one sample every
/// `CURVE_RESOLUTION` units of chord length.
pub const CURVE_RESOLUTION: f32 = 0.008;

/// Offset below 1.0 used to approximate the closed right endpoint of a
/// clamped B-spline without exact-boundary division issues.
pub const KNOT_END_EPS: f32 = 1e-5;

#[inline]
pub fn clamp01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}
