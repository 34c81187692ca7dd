use std::cmp::Ordering;

use crate::error::SolveError;
use crate::geometry::{dedupe, is_feasible_eps, is_feasible_within, Point, DEFAULT_PRECISION, POINT_EPSILON};
use crate::problem::{ConstraintOp, LpProblem};
use crate::solution::{ConstraintViolation, Solution};
use crate::vertices::VertexEnumerator;

/// Vertex-enumeration solver for two-variable linear programs
#[derive(Debug, Clone, Copy)]
pub struct Solver {
    /// Relative slack for float noise when testing raw candidates
    tolerance: f64,
    /// Absolute distance to a bound under which a constraint counts as active
    active_tolerance: f64,
    /// Decimal places reported vertices are rounded to (`None` keeps them raw)
    precision: Option<u32>,
}

impl Default for Solver {
    fn default() -> Self {
        Self {
            tolerance: 1e-9,
            active_tolerance: 1e-3,
            precision: Some(DEFAULT_PRECISION),
        }
    }
}

impl Solver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_active_tolerance(mut self, tol: f64) -> Self {
        self.active_tolerance = tol;
        self
    }

    pub fn with_precision(mut self, decimals: Option<u32>) -> Self {
        self.precision = decimals;
        self
    }

    pub fn active_tolerance(&self) -> f64 {
        self.active_tolerance
    }

    /// Solve the LP from the generic candidate set
    pub fn solve(&self, problem: &LpProblem) -> Result<Solution, SolveError> {
        problem.validate_finite()?;
        let candidates = VertexEnumerator::new().candidates(problem);
        self.select_optimal(problem, &candidates)
    }

    /// Keep the feasible candidates, round and dedupe them, and pick the one
    /// with the greatest objective value. Candidates are visited in the given
    /// order and only a strictly greater value replaces the current best, so
    /// the first maximal vertex wins a tie.
    pub fn select_optimal(&self, problem: &LpProblem, candidates: &[Point]) -> Result<Solution, SolveError> {
        // (reported, exact) pairs
        let feasible: Vec<(Point, Point)> = candidates
            .iter()
            .filter(|raw| raw.is_finite() && is_feasible_eps(**raw, &problem.constraints, self.tolerance))
            .map(|&raw| (self.normalize(problem, raw), raw))
            .collect();
        let reported: Vec<Point> = feasible.iter().map(|&(p, _)| p).collect();
        // dedupe keeps first occurrences, so the first pair with that point is the one kept
        let vertices: Vec<(Point, Point)> = dedupe(&reported, POINT_EPSILON)
            .into_iter()
            .filter_map(|p| feasible.iter().find(|(q, _)| *q == p).copied())
            .collect();

        let Some(&(first, first_exact)) = vertices.first() else {
            let violations = self.diagnose(problem, candidates);
            tracing::debug!(
                candidates = candidates.len(),
                violated = violations.len(),
                "no feasible vertex"
            );
            return Err(SolveError::Infeasible { violations });
        };

        let objective = &problem.objective;
        let mut best = (first, first_exact);
        let mut best_value = objective.value_at(first);
        for &(p, exact) in &vertices[1..] {
            let value = objective.value_at(p);
            if value > best_value {
                best_value = value;
                best = (p, exact);
            }
        }

        let (optimal_point, exact_point) = best;
        let active_constraints = problem
            .constraints
            .iter()
            .map(|c| (c.lhs(exact_point) - c.rhs).abs() < self.active_tolerance)
            .collect();

        tracing::debug!(
            candidates = candidates.len(),
            feasible = vertices.len(),
            x = optimal_point.x,
            y = optimal_point.y,
            objective = best_value,
            "selected optimal vertex"
        );

        Ok(Solution {
            optimal_point,
            exact_point,
            objective_value: best_value,
            active_constraints,
            feasible_vertices: vertices.into_iter().map(|(p, _)| p).collect(),
        })
    }

    fn round(&self, p: Point) -> Point {
        match self.precision {
            Some(decimals) => p.rounded(decimals),
            None => p,
        }
    }

    /// Rounded vertex, or the raw one when rounding pushes it more than
    /// `POINT_EPSILON` outside a constraint
    fn normalize(&self, problem: &LpProblem, raw: Point) -> Point {
        let rounded = self.round(raw);
        if is_feasible_within(rounded, &problem.constraints, POINT_EPSILON) {
            rounded
        } else {
            tracing::trace!(x = raw.x, y = raw.y, "rounded vertex leaves the region, reported unrounded");
            raw
        }
    }

    /// Explain an infeasible problem through the candidate that comes
    /// closest to satisfying everything
    fn diagnose(&self, problem: &LpProblem, candidates: &[Point]) -> Vec<ConstraintViolation> {
        let total_violation = |p: &Point| -> f64 {
            let axes = (-p.x).max(0.0) + (-p.y).max(0.0);
            axes + problem.constraints.iter().map(|c| c.violation(*p)).sum::<f64>()
        };

        let closest = candidates
            .iter()
            .filter(|p| p.is_finite())
            .min_by(|a, b| {
                total_violation(a)
                    .partial_cmp(&total_violation(b))
                    .unwrap_or(Ordering::Equal)
            });
        let Some(&closest) = closest else {
            return Vec::new();
        };
        let closest = self.round(closest);

        let mut violations: Vec<ConstraintViolation> = problem
            .constraints
            .iter()
            .filter_map(|c| {
                let amount = c.violation(closest);
                if amount <= self.tolerance * (1.0 + c.rhs.abs()) {
                    return None;
                }
                let description = match c.op {
                    ConstraintOp::Le => format!("{} exceeds maximum of {:.2} by {:.2}", c.name, c.rhs, amount),
                    ConstraintOp::Ge => format!("{} is below minimum of {:.2} by {:.2}", c.name, c.rhs, amount),
                };
                Some(ConstraintViolation {
                    constraint: c.name.clone(),
                    required: c.rhs,
                    actual: c.lhs(closest),
                    violation_amount: amount,
                    description,
                })
            })
            .collect();

        // Sort by violation amount (worst first)
        violations.sort_by(|a, b| {
            b.violation_amount
                .partial_cmp(&a.violation_amount)
                .unwrap_or(Ordering::Equal)
        });
        violations
    }
}
