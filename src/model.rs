/// Index into one of the model's dense tables. Indices are never reused
/// within a session and are the sole cross-reference mechanism.
pub type Index = u32;

/// A point in the sketch. `Vertex` stores its position directly; `Tick`
/// derives its position by interpolating two other points, which may
/// themselves be ticks as long as the reference chain bottoms out at
/// vertices.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Point {
    Vertex { x: f32, y: f32, z: f32 },
    Tick { t: f32, ref_a: Index, ref_b: Index },
}

impl Point {
    pub fn is_vertex(&self) -> bool {
        matches!(self, Point::Vertex { .. })
    }
}

/// Constraint metadata attached to a line by the authority. Grouping and
/// selection policy live outside this engine; geometry ignores the role.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineRole {
    Free,
    HalfConstrained,
    Constrained,
}

impl LineRole {
    pub fn token(self) -> &'static str {
        match self {
            LineRole::Free => "free",
            LineRole::HalfConstrained => "half_constrained",
            LineRole::Constrained => "constrained",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "free" => Some(LineRole::Free),
            "half_constrained" => Some(LineRole::HalfConstrained),
            "constrained" => Some(LineRole::Constrained),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub start: Index,
    pub end: Index,
    pub role: LineRole,
}

/// One term of a key point's tangent: the direction of `line`, scaled by
/// `weight`. A key point's tangent is the unnormalized sum of its terms.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TangentTerm {
    pub line: Index,
    pub weight: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurveKind {
    StraightLine,
    BezierSpline,
}

impl CurveKind {
    pub fn token(self) -> &'static str {
        match self {
            CurveKind::StraightLine => "straight_line",
            CurveKind::BezierSpline => "bezier_spline",
        }
    }
}

/// An ordered run of key points, rendered either as straight segments or as
/// a piecewise cubic Bézier with per-point tangents. For `StraightLine` the
/// tangent spec and magnitudes are ignored.
#[derive(Clone, Debug, PartialEq)]
pub struct Curve {
    pub point_indices: Vec<Index>,
    pub tangent_spec: Vec<Vec<TangentTerm>>,
    /// `magnitudes[2k]` scales the outgoing tangent of key point `k`,
    /// `magnitudes[2k + 1]` the incoming tangent of key point `k + 1`.
    pub magnitudes: Vec<f32>,
    pub kind: CurveKind,
}

impl Curve {
    pub fn segment_count(&self) -> usize {
        self.point_indices.len().saturating_sub(1)
    }
}

/// A freehand stroke. It stores no coordinates of its own: `weights` is a
/// fixed linear combination, computed once by the authority at fit time,
/// that reconstructs M control points from the live vertex positions. Rows
/// correspond to vertex-kind points in ascending index order, columns to
/// control points.
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    pub weights: Vec<Vec<f32>>,
    pub knots: Vec<f32>,
    pub degree: usize,
    pub sample_count: usize,
}

impl Stroke {
    /// Number of control points (M). `knots.len()` must equal
    /// `M + degree + 1`.
    pub fn control_point_count(&self) -> usize {
        self.weights.first().map_or(0, |row| row.len())
    }
}
