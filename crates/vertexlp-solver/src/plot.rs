use crate::geometry::{is_feasible, sort_clockwise, Point};
use crate::problem::LpProblem;
use crate::solution::Solution;
use crate::vertices::axis_intercepts;

/// Sampled boundary line of one constraint
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintLine {
    pub name: String,
    pub points: Vec<Point>,
}

/// The feasible vertices in boundary order, ready for a filled polygon
pub fn feasible_polygon(solution: &Solution) -> Vec<Point> {
    sort_clockwise(&solution.feasible_vertices)
}

/// Horizontal plot extent: 20% past the farthest x-axis intercept
pub fn default_plot_extent(problem: &LpProblem) -> f64 {
    let farthest = problem
        .constraints
        .iter()
        .flat_map(axis_intercepts)
        .filter(|p| p.y == 0.0 && p.x.is_finite())
        .map(|p| p.x)
        .fold(0.0, f64::max);
    farthest * 1.2
}

/// `samples + 1` evenly spaced points along each constraint boundary for
/// `x` in `0..=x_max`. Constraints with no `y` term are drawn vertically.
pub fn constraint_lines(problem: &LpProblem, x_max: f64, samples: usize) -> Vec<ConstraintLine> {
    let samples = samples.max(1);
    problem
        .constraints
        .iter()
        .map(|c| {
            let [a1, a2] = c.coefficients;
            let points = (0..=samples)
                .map(|i| {
                    let t = i as f64 / samples as f64;
                    if a2 != 0.0 {
                        let x = t * x_max;
                        Point::new(x, (c.rhs - a1 * x) / a2)
                    } else {
                        let x = if a1 != 0.0 { c.rhs / a1 } else { 0.0 };
                        Point::new(x, t * x_max)
                    }
                })
                .collect();
            ConstraintLine {
                name: c.name.clone(),
                points,
            }
        })
        .collect()
}

/// Feasible points of a `resolution x resolution` grid over `[0, extent]²`
pub fn sample_feasible_region(problem: &LpProblem, extent: f64, resolution: usize) -> Vec<Point> {
    let resolution = resolution.max(1);
    let step = extent / resolution as f64;
    let mut points = Vec::new();
    for i in 0..=resolution {
        for j in 0..=resolution {
            let p = Point::new(i as f64 * step, j as f64 * step);
            if is_feasible(p, &problem.constraints) {
                points.push(p);
            }
        }
    }
    points
}
