//! Clamped B-spline evaluation via De Boor's algorithm.
//!
//! Variable names follow the usual statement of the recurrence: query
//! parameter `x`, knot vector `knots`, control points `control`, degree
//! `degree`, working coefficients `d`.

use glam::Vec3;

use super::tolerance::KNOT_END_EPS;

/// Evaluate the B-spline at `x`.
///
/// Callers must guarantee `knots.len() == control.len() + degree + 1` and
/// `control.len() > degree`; the wire parser and the stroke evaluator check
/// both before getting here. Out-of-domain `x` clamps to the nearest span.
pub fn de_boor(x: f32, knots: &[f32], control: &[Vec3], degree: usize) -> Vec3 {
    // Knot span k with knots[k] <= x < knots[k + 1]. At or past the last
    // knot no span matches; fall back to the last one, where the recurrence
    // extrapolates to the clamped endpoint.
    let mut k = control.len() - 1;
    for m in 0..knots.len() - 1 {
        if knots[m] <= x && x < knots[m + 1] {
            k = m;
            break;
        }
    }
    let k = k.min(control.len() - 1).max(degree);

    let mut d: Vec<Vec3> = (0..=degree).map(|j| control[j + k - degree]).collect();
    for r in 1..=degree {
        for j in (r..=degree).rev() {
            let denom = knots[j + 1 + k - r] - knots[j + k - degree];
            let alpha = if denom.abs() > f32::EPSILON {
                (x - knots[j + k - degree]) / denom
            } else {
                0.0
            };
            d[j] = (1.0 - alpha) * d[j - 1] + alpha * d[j];
        }
    }
    d[degree]
}

/// Sample the spline at `steps` uniform parameters over [0, 1) plus one
/// sample just below 1.0, for `steps + 1` points total.
pub fn sample(control: &[Vec3], knots: &[f32], degree: usize, steps: usize) -> Vec<Vec3> {
    let mut out = Vec::with_capacity(steps + 1);
    for i in 0..steps {
        let x = i as f32 / steps as f32;
        out.push(de_boor(x, knots, control, degree));
    }
    out.push(de_boor(1.0 - KNOT_END_EPS, knots, control, degree));
    out
}
