use crate::geometry::Point;
use crate::problem::LpProblem;

/// The optimal corner of a two-variable LP
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// Optimal vertex, rounded to the solver precision unless rounding
    /// would put it more than 0.01 outside a constraint
    pub optimal_point: Point,
    /// The unrounded vertex `optimal_point` was taken from
    pub exact_point: Point,
    /// Objective value at `optimal_point`
    pub objective_value: f64,
    /// Whether the optimum lies on each constraint's boundary, in constraint order
    pub active_constraints: Vec<bool>,
    /// Feasible corner points, rounded and deduplicated, in enumeration order
    pub feasible_vertices: Vec<Point>,
}

impl Solution {
    /// Names of the constraints the optimum is pinned against
    pub fn binding_constraints(&self, problem: &LpProblem) -> Vec<String> {
        problem
            .constraints
            .iter()
            .zip(&self.active_constraints)
            .filter(|&(_, &active)| active)
            .map(|(c, _)| c.name.clone())
            .collect()
    }
}

/// How a sensitivity figure was obtained
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Estimate {
    /// Fixed fractions and percentage spreads; for display, not economics
    #[default]
    Heuristic,
    /// Derived from the basis of the optimal vertex
    Exact,
}

/// Detailed analysis of the optimal solution
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// Which method produced the shadow prices and ranges
    pub estimate: Estimate,

    /// Shadow prices (dual values) for each constraint
    /// Indicates how much the objective would change per unit of extra bound
    pub shadow_prices: Vec<ShadowPrice>,

    /// Reduced costs for each variable (exact analysis only)
    pub reduced_costs: Vec<ReducedCost>,

    /// Which constraints are binding (tight) at optimum
    pub binding_constraints: Vec<String>,

    /// Sensitivity ranges for objective coefficients
    pub objective_sensitivity: Vec<SensitivityRange>,

    /// Usage, utilization and slack of each constraint's resource
    pub resources: Vec<ResourceUsage>,

    /// Dual formulation, for display
    pub dual: DualProblem,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ShadowPrice {
    /// Constraint name
    pub constraint: String,
    /// Shadow price value
    pub value: f64,
    /// Interpretation
    pub interpretation: String,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ReducedCost {
    /// Variable name
    pub variable: String,
    /// Current value in solution
    pub value: f64,
    /// Reduced cost
    pub reduced_cost: f64,
    /// Is this variable in the basis?
    pub is_basic: bool,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SensitivityRange {
    /// Variable whose objective coefficient is ranged
    pub name: String,
    /// Current objective coefficient
    pub current: f64,
    /// Lower end of the coefficient range
    pub lower_bound: f64,
    /// Upper end of the coefficient range
    pub upper_bound: f64,
}

impl SensitivityRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower_bound && value <= self.upper_bound
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceUsage {
    /// Constraint name
    pub name: String,
    /// `a1*x + a2*y` at the evaluated point
    pub usage: f64,
    /// Available amount (the constraint bound)
    pub available: f64,
    /// `100 * usage / available`
    pub percentage: f64,
    /// `available - usage`
    pub remaining: f64,
}

/// Minimization view of the primal, one dual variable per primal constraint
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct DualProblem {
    /// Dual objective coefficients (the primal bounds)
    pub coefficients: Vec<f64>,
    /// One row per primal variable: the primal coefficient column followed
    /// by that variable's objective coefficient as right-hand side
    pub constraint_rows: Vec<Vec<f64>>,
}

/// Information about a violated constraint
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintViolation {
    /// Constraint name
    pub constraint: String,
    /// Required value (from constraint RHS)
    pub required: f64,
    /// Actual value achieved
    pub actual: f64,
    /// How much the constraint is violated by
    pub violation_amount: f64,
    /// Human-readable description of what's wrong
    pub description: String,
}
