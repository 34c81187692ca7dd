use crate::geometry::Point;
use crate::problem::{Constraint, LpProblem};

/// Produces the candidate corner points of a two-variable LP.
///
/// Candidates are the origin, the axis intercepts of every constraint line
/// and the pairwise intersections of constraint lines, returned raw and in
/// that order. Feasibility, rounding and dedup are the solver's job.
#[derive(Debug, Clone, Copy, Default)]
pub struct VertexEnumerator;

impl VertexEnumerator {
    pub fn new() -> Self {
        Self
    }

    pub fn candidates(&self, problem: &LpProblem) -> Vec<Point> {
        let constraints = &problem.constraints;
        let n = constraints.len();
        let mut points = Vec::with_capacity(1 + 2 * n + n * n.saturating_sub(1) / 2);

        points.push(Point::ORIGIN);

        for c in constraints {
            points.extend(axis_intercepts(c));
        }

        for i in 0..n {
            for j in (i + 1)..n {
                match intersect(&constraints[i], &constraints[j]) {
                    Some(p) => points.push(p),
                    None => tracing::trace!(
                        first = %constraints[i].name,
                        second = %constraints[j].name,
                        "parallel constraint lines, no intersection"
                    ),
                }
            }
        }

        points
    }
}

/// Where the boundary of `c` meets the x axis and the y axis, skipping an
/// axis whose coefficient is zero.
pub fn axis_intercepts(c: &Constraint) -> impl Iterator<Item = Point> {
    let [a1, a2] = c.coefficients;
    let on_x = (a1 != 0.0).then(|| Point::new(c.rhs / a1, 0.0));
    let on_y = (a2 != 0.0).then(|| Point::new(0.0, c.rhs / a2));
    on_x.into_iter().chain(on_y)
}

/// Solve the 2x2 system of both boundaries by Cramer's rule.
/// Returns `None` for parallel (or identical) lines.
pub fn intersect(a: &Constraint, b: &Constraint) -> Option<Point> {
    let [a11, a12] = a.coefficients;
    let [a21, a22] = b.coefficients;
    let det = a11 * a22 - a12 * a21;
    if det == 0.0 {
        return None;
    }
    let x = (a.rhs * a22 - b.rhs * a12) / det;
    let y = (a11 * b.rhs - a21 * a.rhs) / det;
    Some(Point::new(x, y))
}
