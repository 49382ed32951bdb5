//! Curve evaluation: straight polylines and tangent-continuous piecewise
//! cubic Bézier splines.
//!
//! Output is recomputed fresh on every call; nothing is cached, so point
//! edits are reflected immediately.

use glam::Vec3;

use crate::error::{Result, SketchError};
use crate::geometry::bezier::CubicBezier;
use crate::geometry::tolerance::CURVE_RESOLUTION;
use crate::model::{Curve, CurveKind};
use crate::State;

pub fn evaluate_curve(state: &State, curve: &Curve) -> Result<Vec<Vec3>> {
    evaluate_curve_with_resolution(state, curve, CURVE_RESOLUTION)
}

pub fn evaluate_curve_with_resolution(
    state: &State,
    curve: &Curve,
    resolution: f32,
) -> Result<Vec<Vec3>> {
    if !(resolution > 0.0) {
        return Err(SketchError::MalformedInput(format!(
            "curve resolution must be positive, got {resolution}"
        )));
    }

    let key_points: Vec<Vec3> = curve
        .point_indices
        .iter()
        .map(|&i| state.resolve(i))
        .collect::<Result<_>>()?;

    match curve.kind {
        CurveKind::StraightLine => Ok(key_points),
        CurveKind::BezierSpline => {
            if curve.tangent_spec.len() != key_points.len() {
                return Err(SketchError::MalformedInput(format!(
                    "curve has {} key points but {} tangent entries",
                    key_points.len(),
                    curve.tangent_spec.len()
                )));
            }
            let segments = curve.segment_count();
            if curve.magnitudes.len() != 2 * segments {
                return Err(SketchError::MalformedInput(format!(
                    "curve with {} segments needs {} magnitudes, got {}",
                    segments,
                    2 * segments,
                    curve.magnitudes.len()
                )));
            }

            let tangents = key_tangents(state, curve)?;
            let mut samples = Vec::new();
            for k in 0..segments {
                let c0 = key_points[k];
                let c3 = key_points[k + 1];
                let c1 = c0 + tangents[k] * curve.magnitudes[2 * k];
                let c2 = c3 - tangents[k + 1] * curve.magnitudes[2 * k + 1];
                sample_segment(&mut samples, CubicBezier::new(c0, c1, c2, c3), resolution);
            }
            Ok(samples)
        }
    }
}

/// The tangent at key point `i` is the weighted sum of the referenced line
/// directions. The sum is left unnormalized; the configured weights already
/// encode relative strength.
fn key_tangents(state: &State, curve: &Curve) -> Result<Vec<Vec3>> {
    curve
        .tangent_spec
        .iter()
        .map(|terms| {
            let mut tangent = Vec3::ZERO;
            for term in terms {
                tangent += state.line_direction(term.line)? * term.weight;
            }
            Ok(tangent)
        })
        .collect()
}

/// `floor(chord / resolution)` uniform samples over [0, 1) plus the exact
/// endpoint. A zero-length segment contributes just its endpoint.
fn sample_segment(out: &mut Vec<Vec3>, segment: CubicBezier, resolution: f32) {
    let n = ((segment.c3 - segment.c0).length() / resolution).floor() as usize;
    for i in 0..n {
        out.push(segment.eval(i as f32 / n as f32));
    }
    out.push(segment.c3);
}
