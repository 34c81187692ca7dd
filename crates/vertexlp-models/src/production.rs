use std::fmt;
use std::str::FromStr;

use vertexlp_solver::sensitivity::{exact_shadow_prices, resource_analysis, shadow_prices, ShadowPriceRule};
use vertexlp_solver::{ConstraintOp, Estimate, LpProblem, Point, ResourceUsage, ShadowPrice, Solver};

use crate::error::ModelError;

/// Tolerance for calling a resource fully used
const TIGHT_TOLERANCE: f64 = 1e-3;

/// One figure per workshop resource
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceAmounts {
    /// Board feet of wood
    pub wood: f64,
    /// Carpentry hours
    pub carpentry: f64,
    /// Finishing hours
    pub finishing: f64,
    /// Hardware units
    pub hardware: f64,
}

impl ResourceAmounts {
    pub const NAMES: [&'static str; 4] = ["wood", "carpentry", "finishing", "hardware"];

    pub const fn new(wood: f64, carpentry: f64, finishing: f64, hardware: f64) -> Self {
        Self {
            wood,
            carpentry,
            finishing,
            hardware,
        }
    }

    pub fn to_array(self) -> [f64; 4] {
        [self.wood, self.carpentry, self.finishing, self.hardware]
    }
}

/// Availabilities the baseline plan was drawn up for
pub const BASELINE_AVAILABLE: ResourceAmounts = ResourceAmounts::new(400.0, 480.0, 160.0, 720.0);

/// Chairs and tables of the baseline plan
pub const BASELINE_PLAN: [f64; 2] = [120.0, 40.0];

/// Estimated value of one more unit of each resource, as a fraction of the
/// chair (0) or table (1) profit. Only used by [`PlanningStrategy::BaselineScaling`].
pub const PRODUCTION_SHADOW_RULES: [ShadowPriceRule; 4] = [
    ShadowPriceRule::new(0, 0.2),
    ShadowPriceRule::new(1, 0.1),
    ShadowPriceRule::new(0, 0.25),
    ShadowPriceRule::new(1, 0.1),
];

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionParams {
    pub available: ResourceAmounts,
    /// Resources consumed by one chair
    pub chair: ResourceAmounts,
    /// Resources consumed by one table
    pub table: ResourceAmounts,
    pub chair_profit: f64,
    pub table_profit: f64,
}

impl Default for ProductionParams {
    fn default() -> Self {
        Self {
            available: BASELINE_AVAILABLE,
            chair: ResourceAmounts::new(2.0, 3.0, 1.0, 6.0),
            table: ResourceAmounts::new(5.0, 4.0, 2.0, 8.0),
            chair_profit: 75.0,
            table_profit: 120.0,
        }
    }
}

/// How to pick the production plan
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlanningStrategy {
    /// Best vertex of the feasible region
    #[default]
    VertexEnumeration,
    /// Shrink the baseline plan until the scarcest resource fits, then
    /// round down. Not an optimization; the result may overuse resources.
    BaselineScaling,
}

impl FromStr for PlanningStrategy {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vertex" | "vertex_enumeration" => Ok(PlanningStrategy::VertexEnumeration),
            "baseline" | "baseline_scaling" => Ok(PlanningStrategy::BaselineScaling),
            other => Err(ModelError::UnknownStrategy(other.to_string())),
        }
    }
}

impl fmt::Display for PlanningStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanningStrategy::VertexEnumeration => write!(f, "vertex"),
            PlanningStrategy::BaselineScaling => write!(f, "baseline"),
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ProductionPlan {
    pub strategy: PlanningStrategy,
    pub chairs: f64,
    pub tables: f64,
    pub total_profit: f64,
    /// Utilization per resource, percentages capped at 100
    pub utilization: Vec<ResourceUsage>,
    pub shadow_prices: Vec<ShadowPrice>,
    /// Whether `shadow_prices` are estimated or read off the optimal basis
    pub estimate: Estimate,
    /// Resources used up exactly
    pub bottlenecks: Vec<String>,
    /// Resources the plan needs more of than is available
    pub overused: Vec<String>,
}

impl ProductionParams {
    pub fn problem(&self) -> LpProblem {
        let mut problem =
            LpProblem::new(["chairs", "tables"]).with_objective([self.chair_profit, self.table_profit]);
        let available = self.available.to_array();
        let chair = self.chair.to_array();
        let table = self.table.to_array();
        for (i, name) in ResourceAmounts::NAMES.iter().enumerate() {
            problem.add_constraint(*name, [chair[i], table[i]], ConstraintOp::Le, available[i]);
        }
        problem
    }

    /// Every availability, usage and profit must be positive
    pub fn validate(&self) -> Result<(), ModelError> {
        self.problem().validate_positive()?;
        Ok(())
    }

    /// Scale factor applied to [`BASELINE_PLAN`]: the tightest
    /// availability ratio against [`BASELINE_AVAILABLE`]
    pub fn baseline_scale(&self) -> f64 {
        self.available
            .to_array()
            .iter()
            .zip(BASELINE_AVAILABLE.to_array())
            .map(|(available, baseline)| available / baseline)
            .fold(f64::INFINITY, f64::min)
    }

    pub fn plan(&self, strategy: PlanningStrategy) -> Result<ProductionPlan, ModelError> {
        self.validate()?;
        let problem = self.problem();

        // the plan reports `point`; resources are judged at `judged_at`
        let (point, judged_at, tight, shadow_prices, estimate) = match strategy {
            PlanningStrategy::VertexEnumeration => {
                let solution = Solver::new().solve(&problem)?;
                let prices = exact_shadow_prices(&problem, &solution);
                (
                    solution.optimal_point,
                    solution.exact_point,
                    solution.active_constraints,
                    prices,
                    Estimate::Exact,
                )
            }
            PlanningStrategy::BaselineScaling => {
                let scale = self.baseline_scale();
                let point = Point::new(
                    (BASELINE_PLAN[0] * scale).floor(),
                    (BASELINE_PLAN[1] * scale).floor(),
                );
                let tight: Vec<bool> = problem
                    .constraints
                    .iter()
                    .map(|c| (c.lhs(point) - c.rhs).abs() <= TIGHT_TOLERANCE)
                    .collect();
                let prices = shadow_prices(&problem, &tight, &PRODUCTION_SHADOW_RULES);
                (point, point, tight, prices, Estimate::Heuristic)
            }
        };

        let mut bottlenecks = Vec::new();
        let mut overused = Vec::new();
        for (c, &is_tight) in problem.constraints.iter().zip(&tight) {
            let usage = c.lhs(judged_at);
            if usage > c.rhs + TIGHT_TOLERANCE {
                tracing::warn!(resource = %c.name, usage, available = c.rhs, "plan uses more than is available");
                overused.push(c.name.clone());
            } else if is_tight {
                bottlenecks.push(c.name.clone());
            }
        }

        let total_profit = problem.objective.value_at(point);
        tracing::debug!(%strategy, chairs = point.x, tables = point.y, total_profit, "production planned");

        Ok(ProductionPlan {
            strategy,
            chairs: point.x,
            tables: point.y,
            total_profit,
            utilization: resource_analysis(&problem, judged_at, true),
            shadow_prices,
            estimate,
            bottlenecks,
            overused,
        })
    }
}
