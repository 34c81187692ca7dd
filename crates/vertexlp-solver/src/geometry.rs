use std::cmp::Ordering;

use crate::problem::Constraint;

/// Two points closer than this on both axes are the same vertex
pub const POINT_EPSILON: f64 = 0.01;

/// Decimal places kept by [`Point::normalized`]
pub const DEFAULT_PRECISION: u32 = 2;

/// A candidate assignment `(x, y)` of the two decision variables
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Round both coordinates to two decimals
    pub fn normalized(self) -> Self {
        self.rounded(DEFAULT_PRECISION)
    }

    pub fn rounded(self, decimals: u32) -> Self {
        let scale = 10f64.powi(decimals as i32);
        Self {
            x: round_half_up(self.x * scale) / scale,
            y: round_half_up(self.y * scale) / scale,
        }
    }

    #[inline]
    pub fn approx_eq(&self, other: &Point, eps: f64) -> bool {
        (self.x - other.x).abs() < eps && (self.y - other.y).abs() < eps
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    #[inline]
    pub fn is_non_negative(&self) -> bool {
        self.x >= 0.0 && self.y >= 0.0
    }
}

// Ties go towards +inf so -0.005 rounds to -0.0 instead of -0.01.
#[inline]
fn round_half_up(v: f64) -> f64 {
    let r = (v + 0.5).floor();
    if r == 0.0 { 0.0 } else { r }
}

pub fn points_equal(a: Point, b: Point, eps: f64) -> bool {
    a.approx_eq(&b, eps)
}

/// Non-negative and inside every constraint, with no slack
pub fn is_feasible(point: Point, constraints: &[Constraint]) -> bool {
    point.is_non_negative() && constraints.iter().all(|c| c.is_satisfied(point))
}

/// Like [`is_feasible`] but tolerates float noise of `eps` relative to each bound
pub fn is_feasible_eps(point: Point, constraints: &[Constraint], eps: f64) -> bool {
    point.x >= -eps
        && point.y >= -eps
        && constraints.iter().all(|c| c.is_satisfied_eps(point, eps))
}

/// Inside every constraint and both axes, each by at most a flat `tol`
pub fn is_feasible_within(point: Point, constraints: &[Constraint], tol: f64) -> bool {
    point.x >= -tol && point.y >= -tol && constraints.iter().all(|c| c.violation(point) <= tol)
}

/// Drop every point within `eps` (on both axes) of an earlier one
pub fn dedupe(points: &[Point], eps: f64) -> Vec<Point> {
    let mut unique: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        if !unique.iter().any(|q| points_equal(*q, *p, eps)) {
            unique.push(*p);
        }
    }
    unique
}

/// Arithmetic mean of the points, `None` when empty
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let sx: f64 = points.iter().map(|p| p.x).sum();
    let sy: f64 = points.iter().map(|p| p.y).sum();
    Some(Point::new(sx / n, sy / n))
}

/// Order points by angle around their centroid so a filled polygon renderer
/// walks a simple boundary. Fewer than three points are returned as given.
///
/// Angles come from `atan2`, so the walk starts at the negative x direction
/// and increases counter-clockwise in a y-up frame (clockwise on a y-down
/// screen).
pub fn sort_clockwise(points: &[Point]) -> Vec<Point> {
    let mut sorted = points.to_vec();
    let Some(c) = centroid(points).filter(|_| points.len() >= 3) else {
        return sorted;
    };
    sorted.sort_by(|a, b| {
        let angle_a = (a.y - c.y).atan2(a.x - c.x);
        let angle_b = (b.y - c.y).atan2(b.x - c.x);
        angle_a.partial_cmp(&angle_b).unwrap_or(Ordering::Equal)
    });
    sorted
}
