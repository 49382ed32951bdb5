//! Cubic Bézier segment evaluation.

use glam::Vec3;

/// Control points of a cubic Bézier segment.
#[derive(Clone, Copy, Debug)]
pub struct CubicBezier {
    pub c0: Vec3,
    pub c1: Vec3,
    pub c2: Vec3,
    pub c3: Vec3,
}

impl CubicBezier {
    pub fn new(c0: Vec3, c1: Vec3, c2: Vec3, c3: Vec3) -> Self {
        Self { c0, c1, c2, c3 }
    }

    /// Evaluate at parameter t ∈ [0, 1] in the Bernstein form
    /// `(1-t)³c0 + 3(1-t)²t c1 + 3(1-t)t² c2 + t³c3`.
    pub fn eval(&self, t: f32) -> Vec3 {
        let u = 1.0 - t;
        let uu = u * u;
        let tt = t * t;
        uu * u * self.c0 + 3.0 * uu * t * self.c1 + 3.0 * u * tt * self.c2 + tt * t * self.c3
    }
}
