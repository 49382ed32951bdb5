//! Stroke evaluation: control-point reconstruction from live vertex
//! positions, then clamped B-spline sampling.

use glam::Vec3;

use crate::error::{Result, SketchError};
use crate::geometry::bspline;
use crate::model::Stroke;
use crate::State;

/// `C = (Pᵗ · W)ᵗ`: control point `j` is `Σ_i W[i][j] · P_i` over the
/// current vertex positions `P`, in ascending point-index order. This is a
/// fixed linear reconstruction, not a fit; `weights` is immutable after the
/// authority computes it, so the stroke deforms as vertices move.
pub fn reconstruct_control_points(state: &State, stroke: &Stroke) -> Result<Vec<Vec3>> {
    let vertices = state.vertex_positions();
    if stroke.weights.len() != vertices.len() {
        return Err(SketchError::DimensionMismatch {
            rows: stroke.weights.len(),
            vertices: vertices.len(),
        });
    }

    let cols = stroke.control_point_count();
    let mut control = vec![Vec3::ZERO; cols];
    for (row, position) in stroke.weights.iter().zip(&vertices) {
        if row.len() != cols {
            return Err(SketchError::MalformedInput(format!(
                "ragged stroke weight row: {} columns, expected {cols}",
                row.len()
            )));
        }
        for (j, w) in row.iter().enumerate() {
            control[j] += *position * *w;
        }
    }
    Ok(control)
}

/// Reconstruct the control points, then sample the clamped B-spline through
/// them at `sample_count` uniform parameters over [0, 1) plus one just
/// below 1.0.
pub fn evaluate_stroke(state: &State, stroke: &Stroke) -> Result<Vec<Vec3>> {
    let control = reconstruct_control_points(state, stroke)?;
    if stroke.knots.len() != control.len() + stroke.degree + 1 {
        return Err(SketchError::MalformedInput(format!(
            "knot vector has {} entries, expected {} control points + degree {} + 1",
            stroke.knots.len(),
            control.len(),
            stroke.degree
        )));
    }
    if control.len() <= stroke.degree {
        return Err(SketchError::MalformedInput(format!(
            "{} control points cannot carry a degree-{} spline",
            control.len(),
            stroke.degree
        )));
    }
    Ok(bspline::sample(
        &control,
        &stroke.knots,
        stroke.degree,
        stroke.sample_count,
    ))
}
