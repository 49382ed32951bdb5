pub mod edit;
pub mod error;
pub mod model;
pub mod wire;
pub mod geometry {
    pub mod bezier;
    pub mod bspline;
    pub mod tolerance;
}
pub mod eval {
    pub mod curve;
    pub mod stroke;
}

use glam::Vec3;

use crate::error::{Result, SketchError};
use crate::geometry::tolerance::clamp01;
use crate::model::{Curve, Index, Line, Point, Stroke};

/// The sketch model: four dense, append-only tables addressed by index.
///
/// A state is constructed wholesale by the wire parser and replaced
/// wholesale on every authoritative update; `move_point` and `move_line`
/// are the only in-place coordinate edits. Evaluation never mutates and
/// never caches across edits, so edits are visible on the next evaluation.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct State {
    points: Vec<Point>,
    lines: Vec<Line>,
    curves: Vec<Curve>,
    strokes: Vec<Stroke>,
}

impl State {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(
        points: Vec<Point>,
        lines: Vec<Line>,
        curves: Vec<Curve>,
        strokes: Vec<Stroke>,
    ) -> Self {
        State {
            points,
            lines,
            curves,
            strokes,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn curves(&self) -> &[Curve] {
        &self.curves
    }

    pub fn strokes(&self) -> &[Stroke] {
        &self.strokes
    }

    pub fn point(&self, index: Index) -> Result<&Point> {
        self.points
            .get(index as usize)
            .ok_or(SketchError::IndexOutOfRange {
                kind: "point",
                index,
                len: self.points.len(),
            })
    }

    pub fn line(&self, index: Index) -> Result<&Line> {
        self.lines
            .get(index as usize)
            .ok_or(SketchError::IndexOutOfRange {
                kind: "line",
                index,
                len: self.lines.len(),
            })
    }

    pub fn curve(&self, index: Index) -> Result<&Curve> {
        self.curves
            .get(index as usize)
            .ok_or(SketchError::IndexOutOfRange {
                kind: "curve",
                index,
                len: self.curves.len(),
            })
    }

    pub fn stroke(&self, index: Index) -> Result<&Stroke> {
        self.strokes
            .get(index as usize)
            .ok_or(SketchError::IndexOutOfRange {
                kind: "stroke",
                index,
                len: self.strokes.len(),
            })
    }

    /// Resolve any point index to a 3D position. Vertices return their
    /// stored coordinates; ticks lerp between their two resolved
    /// references. The model promises acyclicity, but corrupt input must
    /// not hang us, so a revisited index on the current call stack is an
    /// error.
    pub fn resolve(&self, index: Index) -> Result<Vec3> {
        let mut visiting = Vec::new();
        self.resolve_inner(index, &mut visiting)
    }

    fn resolve_inner(&self, index: Index, visiting: &mut Vec<Index>) -> Result<Vec3> {
        if visiting.contains(&index) {
            return Err(SketchError::Cycle(index));
        }
        match *self.point(index)? {
            Point::Vertex { x, y, z } => Ok(Vec3::new(x, y, z)),
            Point::Tick { t, ref_a, ref_b } => {
                visiting.push(index);
                let a = self.resolve_inner(ref_a, visiting)?;
                let b = self.resolve_inner(ref_b, visiting)?;
                visiting.pop();
                Ok(a.lerp(b, t))
            }
        }
    }

    pub fn line_endpoints(&self, index: Index) -> Result<[Vec3; 2]> {
        let line = *self.line(index)?;
        Ok([self.resolve(line.start)?, self.resolve(line.end)?])
    }

    /// Derived, never stored: the normalized direction from the line's
    /// resolved start to its resolved end. Zero for a degenerate line.
    pub fn line_direction(&self, index: Index) -> Result<Vec3> {
        let [start, end] = self.line_endpoints(index)?;
        Ok((end - start).normalize_or_zero())
    }

    /// Stored coordinates of all vertex-kind points, in ascending point
    /// index order. Tick points do not participate.
    pub fn vertex_positions(&self) -> Vec<Vec3> {
        self.points
            .iter()
            .filter_map(|p| match *p {
                Point::Vertex { x, y, z } => Some(Vec3::new(x, y, z)),
                Point::Tick { .. } => None,
            })
            .collect()
    }

    pub fn vertex_count(&self) -> usize {
        self.points.iter().filter(|p| p.is_vertex()).count()
    }

    /// Overwrite a vertex's coordinates with `pos`, or a tick's parameter
    /// with `t` clamped to [0, 1]. A tick's position is never set directly;
    /// the unused argument is ignored in either case.
    pub fn move_point(&mut self, index: Index, pos: Vec3, t: f32) -> Result<()> {
        self.point(index)?;
        match &mut self.points[index as usize] {
            Point::Vertex { x, y, z } => {
                *x = pos.x;
                *y = pos.y;
                *z = pos.z;
            }
            Point::Tick { t: tick_t, .. } => {
                *tick_t = clamp01(t);
            }
        }
        Ok(())
    }

    /// Set both endpoint positions of a line. Only defined when both
    /// endpoints are vertices; a tick endpoint rejects the whole edit
    /// before either point is touched.
    pub fn move_line(&mut self, index: Index, start: Vec3, end: Vec3) -> Result<()> {
        let line = *self.line(index)?;
        let both_vertices = self.point(line.start)?.is_vertex() && self.point(line.end)?.is_vertex();
        if !both_vertices {
            return Err(SketchError::UnsupportedOperation(
                "move_line requires vertex endpoints on both ends",
            ));
        }
        self.move_point(line.start, start, 0.0)?;
        self.move_point(line.end, end, 0.0)?;
        Ok(())
    }
}
