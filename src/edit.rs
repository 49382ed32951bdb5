//! Gesture-level edits layered on top of [`State::move_point`].
//!
//! The caller owns device tracking, selection and mode policy; this layer
//! turns an already-recognized gesture over a set of selected lines into
//! per-point edits. Spatial deltas on tick points are converted into
//! interpolation-parameter deltas along their reference segment, for every
//! gesture kind.

use glam::{Quat, Vec3};
use indexmap::IndexMap;
use log::debug;

use crate::error::Result;
use crate::geometry::tolerance::{clamp01, EPS_LEN};
use crate::model::{Index, Point};
use crate::State;

/// One recognized edit gesture over a selection of lines.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EditGesture {
    /// Move every selected point by a world-space delta.
    Translate(Vec3),
    /// Scale the selection about its centroid.
    Scale(f32),
    /// Rotate the selection about its centroid.
    Rotate(Quat),
}

/// Resolved positions of the de-duplicated endpoints of the selected lines,
/// in first-seen order. A point shared by two selected lines appears once,
/// so it is edited once.
pub fn selection_points(state: &State, line_indices: &[Index]) -> Result<IndexMap<Index, Vec3>> {
    let mut selected = IndexMap::new();
    for &line_index in line_indices {
        let line = *state.line(line_index)?;
        for point_index in [line.start, line.end] {
            if !selected.contains_key(&point_index) {
                selected.insert(point_index, state.resolve(point_index)?);
            }
        }
    }
    Ok(selected)
}

/// Apply one gesture to the endpoints of the selected lines.
pub fn apply_gesture(state: &mut State, line_indices: &[Index], gesture: EditGesture) -> Result<()> {
    let selected = selection_points(state, line_indices)?;
    if selected.is_empty() {
        return Ok(());
    }
    let centroid =
        selected.values().fold(Vec3::ZERO, |acc, &p| acc + p) / selected.len() as f32;
    debug!(
        "applying {gesture:?} to {} points over {} lines",
        selected.len(),
        line_indices.len()
    );

    for (&index, &position) in &selected {
        let target = match gesture {
            EditGesture::Translate(delta) => position + delta,
            EditGesture::Scale(factor) => centroid + (position - centroid) * factor,
            EditGesture::Rotate(rotation) => centroid + rotation * (position - centroid),
        };
        apply_point_delta(state, index, target - position)?;
    }
    Ok(())
}

/// Move one point by a world-space delta. A vertex takes the delta
/// directly. A tick slides along its reference segment: the delta is
/// projected onto `resolve(ref_b) - resolve(ref_a)` and converted to
/// `Δt = dot(projected, l) / |l|²`, with the result clamped to [0, 1].
pub fn apply_point_delta(state: &mut State, index: Index, delta: Vec3) -> Result<()> {
    match *state.point(index)? {
        Point::Vertex { x, y, z } => state.move_point(index, Vec3::new(x, y, z) + delta, 0.0),
        Point::Tick { t, ref_a, ref_b } => {
            let a = state.resolve(ref_a)?;
            let b = state.resolve(ref_b)?;
            let segment = b - a;
            if segment.length_squared() <= EPS_LEN * EPS_LEN {
                // Degenerate reference segment: nowhere to slide.
                return Ok(());
            }
            let projected = delta.project_onto(segment);
            let dt = projected.dot(segment) / segment.length_squared();
            state.move_point(index, Vec3::ZERO, clamp01(t + dt))
        }
    }
}
