//! Wire-state codec: decodes the authority's textual commands into a fresh
//! [`State`], and re-encodes a state in the same shapes.
//!
//! Points and lines travel as heterogeneous arrays (`[x, y, z, "vertex"]`,
//! `[t, i0, i1, "tick"]`, `[start, end, "free"]`): the discriminant is read
//! first, then the remaining slots are extracted per variant by hand-written
//! readers over `serde_json::Value`. Curves and strokes are ordinary objects
//! and decode through local raw structs.

use log::{debug, warn};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{Result, SketchError};
use crate::model::{Curve, CurveKind, Index, Line, LineRole, Point, Stroke, TangentTerm};
use crate::State;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WireCommand {
    /// Initial full model from the authority.
    Init,
    /// Full model after the authority fit a new freehand stroke.
    DetailStroke,
    /// Authoritative model after a line move was re-optimized.
    MoveLine,
    /// Authoritative model after a tick (detail scaffold) move.
    MoveDetail,
    Undo,
    Redo,
}

impl WireCommand {
    pub fn token(self) -> &'static str {
        match self {
            WireCommand::Init => "init",
            WireCommand::DetailStroke => "detail_stroke",
            WireCommand::MoveLine => "move_line",
            WireCommand::MoveDetail => "move_detail",
            WireCommand::Undo => "undo",
            WireCommand::Redo => "redo",
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "init" => Some(WireCommand::Init),
            "detail_stroke" => Some(WireCommand::DetailStroke),
            "move_line" => Some(WireCommand::MoveLine),
            "move_detail" => Some(WireCommand::MoveDetail),
            "undo" => Some(WireCommand::Undo),
            "redo" => Some(WireCommand::Redo),
            _ => None,
        }
    }

    /// Characters stripped before the JSON payload: the command token plus
    /// one separating space. Fixed per command, not a generic tokenizer.
    fn payload_offset(self) -> usize {
        self.token().len() + 1
    }
}

/// Split a raw `"<command> <payload>"` message and decode the payload into
/// a fresh state.
pub fn parse_message(text: &str) -> Result<(WireCommand, State)> {
    let token = text.split(' ').next().unwrap_or("");
    let command = WireCommand::from_token(token).ok_or_else(|| {
        SketchError::MalformedInput(format!("unknown wire command {token:?}"))
    })?;
    let offset = command.payload_offset();
    if text.len() < offset {
        return Err(SketchError::MalformedInput(format!(
            "command {token:?} carries no payload"
        )));
    }
    let state = parse_state(&text[offset..])?;
    Ok((command, state))
}

/// Decode a message and replace `state` wholesale. The previous model is
/// untouched unless the whole decode succeeds.
pub fn apply_message(state: &mut State, text: &str) -> Result<WireCommand> {
    let (command, fresh) = parse_message(text)?;
    *state = fresh;
    Ok(command)
}

#[derive(Deserialize)]
struct RawDoc {
    points: Vec<Value>,
    lines: Vec<Value>,
    #[serde(default)]
    curves: Vec<RawCurve>,
    #[serde(default)]
    strokes: Vec<RawStroke>,
}

#[derive(Deserialize)]
struct RawCurve {
    points: Vec<Index>,
    #[serde(default)]
    tangents: Vec<Value>,
    #[serde(default)]
    magnitudes: Vec<f32>,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct RawStroke {
    knots: Vec<f32>,
    weights: Vec<Vec<f32>>,
    degree: usize,
    #[serde(rename = "n")]
    sample_count: usize,
}

/// Decode a bare JSON payload into a fresh state. Fails atomically: either
/// every table decodes and validates, or nothing is produced.
pub fn parse_state(payload: &str) -> Result<State> {
    let doc: RawDoc = serde_json::from_str(payload)
        .map_err(|e| SketchError::MalformedInput(e.to_string()))?;

    let points = doc
        .points
        .iter()
        .enumerate()
        .map(|(i, v)| decode_point(i, v))
        .collect::<Result<Vec<Point>>>()?;
    let lines = doc
        .lines
        .iter()
        .enumerate()
        .map(|(i, v)| decode_line(i, v))
        .collect::<Result<Vec<Line>>>()?;
    let curves = doc
        .curves
        .iter()
        .enumerate()
        .map(|(i, raw)| decode_curve(i, raw))
        .collect::<Result<Vec<Curve>>>()?;
    let strokes = doc
        .strokes
        .iter()
        .enumerate()
        .map(|(i, raw)| decode_stroke(i, raw))
        .collect::<Result<Vec<Stroke>>>()?;

    validate_references(&points, &lines, &curves)?;
    for (i, stroke) in strokes.iter().enumerate() {
        let vertices = points.iter().filter(|p| p.is_vertex()).count();
        if stroke.weights.len() != vertices {
            // Tolerated at decode time; evaluation reports DimensionMismatch.
            warn!(
                "stroke {i} carries {} weight rows for {vertices} vertex points",
                stroke.weights.len()
            );
        }
    }

    debug!(
        "decoded wire state: {} points, {} lines, {} curves, {} strokes",
        points.len(),
        lines.len(),
        curves.len(),
        strokes.len()
    );
    Ok(State::from_parts(points, lines, curves, strokes))
}

fn malformed_point(index: usize, reason: impl Into<String>) -> SketchError {
    SketchError::MalformedPoint {
        index,
        reason: reason.into(),
    }
}

fn number_slot(value: &Value, index: usize, slot: &str) -> Result<f64> {
    value
        .as_f64()
        .ok_or_else(|| malformed_point(index, format!("{slot} is not a number")))
}

/// Reinterpret a float slot as a point-table index. Tick references arrive
/// as integral-valued floats; anything else is malformed.
fn integral_slot(value: f64, index: usize, slot: &str) -> Result<Index> {
    if !value.is_finite() || value.fract() != 0.0 || value < 0.0 || value > Index::MAX as f64 {
        return Err(malformed_point(
            index,
            format!("{slot} must be a non-negative integer, got {value}"),
        ));
    }
    Ok(value as Index)
}

/// `[n0, n1, n2, kind]`: for `vertex` the numbers are coordinates, for
/// `tick` they are the parameter and two point indices.
fn decode_point(index: usize, value: &Value) -> Result<Point> {
    let slots = value
        .as_array()
        .ok_or_else(|| malformed_point(index, "element is not an array"))?;
    if slots.len() != 4 {
        return Err(malformed_point(
            index,
            format!("expected 4 slots, found {}", slots.len()),
        ));
    }
    let n0 = number_slot(&slots[0], index, "slot 0")?;
    let n1 = number_slot(&slots[1], index, "slot 1")?;
    let n2 = number_slot(&slots[2], index, "slot 2")?;
    let kind = slots[3]
        .as_str()
        .ok_or_else(|| malformed_point(index, "kind slot is not a string"))?;

    match kind {
        "vertex" => Ok(Point::Vertex {
            x: n0 as f32,
            y: n1 as f32,
            z: n2 as f32,
        }),
        "tick" => Ok(Point::Tick {
            t: n0 as f32,
            ref_a: integral_slot(n1, index, "ref_a")?,
            ref_b: integral_slot(n2, index, "ref_b")?,
        }),
        other => Err(malformed_point(
            index,
            format!("unknown point kind {other:?}"),
        )),
    }
}

/// `[start, end, role]` with integer endpoints and a role token.
fn decode_line(index: usize, value: &Value) -> Result<Line> {
    let malformed = |reason: String| SketchError::MalformedInput(format!("line {index}: {reason}"));
    let slots = value
        .as_array()
        .ok_or_else(|| malformed("element is not an array".into()))?;
    if slots.len() < 3 {
        return Err(malformed(format!("expected 3 slots, found {}", slots.len())));
    }
    let start = slots[0]
        .as_u64()
        .ok_or_else(|| malformed("start is not an integer".into()))?;
    let end = slots[1]
        .as_u64()
        .ok_or_else(|| malformed("end is not an integer".into()))?;
    let role_token = slots[2]
        .as_str()
        .ok_or_else(|| malformed("role slot is not a string".into()))?;
    let role = LineRole::from_token(role_token)
        .ok_or_else(|| malformed(format!("unknown line role {role_token:?}")))?;
    if start > Index::MAX as u64 || end > Index::MAX as u64 {
        return Err(malformed("endpoint index outside index range".into()));
    }
    Ok(Line {
        start: start as Index,
        end: end as Index,
        role,
    })
}

fn decode_curve(index: usize, raw: &RawCurve) -> Result<Curve> {
    if raw.points.len() < 2 {
        return Err(SketchError::MalformedInput(format!(
            "curve {index} has {} key points, need at least 2",
            raw.points.len()
        )));
    }

    let kind = if raw.kind == CurveKind::StraightLine.token() {
        CurveKind::StraightLine
    } else {
        // The authority only distinguishes straight lines; every other
        // token is a spline.
        if raw.kind != CurveKind::BezierSpline.token() {
            warn!("curve {index}: treating kind {:?} as bezier_spline", raw.kind);
        }
        CurveKind::BezierSpline
    };

    let tangent_spec = raw
        .tangents
        .iter()
        .enumerate()
        .map(|(point, value)| decode_tangent_entry(index, point, value))
        .collect::<Result<Vec<_>>>()?;

    if kind == CurveKind::BezierSpline {
        if tangent_spec.len() != raw.points.len() {
            return Err(SketchError::MalformedInput(format!(
                "curve {index} has {} key points but {} tangent entries",
                raw.points.len(),
                tangent_spec.len()
            )));
        }
        let expected = 2 * (raw.points.len() - 1);
        if raw.magnitudes.len() != expected {
            return Err(SketchError::MalformedInput(format!(
                "curve {index} needs {expected} magnitudes, got {}",
                raw.magnitudes.len()
            )));
        }
    }

    Ok(Curve {
        point_indices: raw.points.clone(),
        tangent_spec,
        magnitudes: raw.magnitudes.clone(),
        kind,
    })
}

/// One key point's tangent terms: either nested `[[line, weight], ...]`
/// pairs or the flat even-length `[line, weight, line, weight, ...]` form
/// the original producer emitted.
fn decode_tangent_entry(curve: usize, point: usize, value: &Value) -> Result<Vec<TangentTerm>> {
    let malformed = |reason: String| {
        SketchError::MalformedInput(format!("curve {curve}, tangent {point}: {reason}"))
    };
    let items = value
        .as_array()
        .ok_or_else(|| malformed("entry is not an array".into()))?;

    let term = |line: &Value, weight: &Value| -> Result<TangentTerm> {
        let line = line
            .as_u64()
            .filter(|&v| v <= Index::MAX as u64)
            .ok_or_else(|| malformed("line index is not an integer".into()))?;
        let weight = weight
            .as_f64()
            .ok_or_else(|| malformed("weight is not a number".into()))?;
        Ok(TangentTerm {
            line: line as Index,
            weight: weight as f32,
        })
    };

    if items.iter().all(Value::is_array) {
        items
            .iter()
            .map(|pair| {
                let pair = pair
                    .as_array()
                    .ok_or_else(|| malformed("pair is not an array".into()))?;
                if pair.len() != 2 {
                    return Err(malformed(format!("pair has {} slots", pair.len())));
                }
                term(&pair[0], &pair[1])
            })
            .collect()
    } else {
        if items.len() % 2 != 0 {
            return Err(malformed(format!(
                "flat tangent list has odd length {}",
                items.len()
            )));
        }
        items.chunks(2).map(|pair| term(&pair[0], &pair[1])).collect()
    }
}

fn decode_stroke(index: usize, raw: &RawStroke) -> Result<Stroke> {
    let cols = raw.weights.first().map_or(0, |row| row.len());
    for (i, row) in raw.weights.iter().enumerate() {
        if row.len() != cols {
            return Err(SketchError::MalformedInput(format!(
                "stroke {index}, weight row {i}: {} columns, expected {cols}",
                row.len()
            )));
        }
    }
    if raw.knots.len() != cols + raw.degree + 1 {
        return Err(SketchError::MalformedInput(format!(
            "stroke {index}: knot vector has {} entries, expected {} control points + degree {} + 1",
            raw.knots.len(),
            cols,
            raw.degree
        )));
    }
    Ok(Stroke {
        weights: raw.weights.clone(),
        knots: raw.knots.clone(),
        degree: raw.degree,
        sample_count: raw.sample_count,
    })
}

/// Every cross-table reference must land on an existing row before the
/// state is handed out.
fn validate_references(points: &[Point], lines: &[Line], curves: &[Curve]) -> Result<()> {
    let point_range = |index: Index| -> Result<()> {
        if (index as usize) < points.len() {
            Ok(())
        } else {
            Err(SketchError::IndexOutOfRange {
                kind: "point",
                index,
                len: points.len(),
            })
        }
    };

    for point in points {
        if let Point::Tick { ref_a, ref_b, .. } = *point {
            point_range(ref_a)?;
            point_range(ref_b)?;
        }
    }
    for line in lines {
        point_range(line.start)?;
        point_range(line.end)?;
    }
    for curve in curves {
        for &index in &curve.point_indices {
            point_range(index)?;
        }
        for terms in &curve.tangent_spec {
            for term in terms {
                if term.line as usize >= lines.len() {
                    return Err(SketchError::IndexOutOfRange {
                        kind: "line",
                        index: term.line,
                        len: lines.len(),
                    });
                }
            }
        }
    }
    Ok(())
}

/// Re-encode a state in the wire shapes: points and lines as heterogeneous
/// arrays, curves and strokes as objects.
pub fn state_to_json(state: &State) -> Value {
    let points: Vec<Value> = state
        .points()
        .iter()
        .map(|p| match *p {
            Point::Vertex { x, y, z } => json!([x, y, z, "vertex"]),
            Point::Tick { t, ref_a, ref_b } => json!([t, ref_a, ref_b, "tick"]),
        })
        .collect();
    let lines: Vec<Value> = state
        .lines()
        .iter()
        .map(|l| json!([l.start, l.end, l.role.token()]))
        .collect();
    let curves: Vec<Value> = state
        .curves()
        .iter()
        .map(|c| {
            let tangents: Vec<Value> = c
                .tangent_spec
                .iter()
                .map(|terms| {
                    Value::Array(
                        terms
                            .iter()
                            .map(|term| json!([term.line, term.weight]))
                            .collect(),
                    )
                })
                .collect();
            json!({
                "points": c.point_indices,
                "tangents": tangents,
                "magnitudes": c.magnitudes,
                "type": c.kind.token(),
            })
        })
        .collect();
    let strokes: Vec<Value> = state
        .strokes()
        .iter()
        .map(|s| {
            json!({
                "knots": s.knots,
                "weights": s.weights,
                "degree": s.degree,
                "n": s.sample_count,
            })
        })
        .collect();

    json!({
        "points": points,
        "lines": lines,
        "curves": curves,
        "strokes": strokes,
    })
}

pub fn encode_message(command: WireCommand, state: &State) -> String {
    format!("{} {}", command.token(), state_to_json(state))
}
