use vertexlp_solver::{ConstraintOp, LpProblem, Solution, Solver};

use crate::error::ModelError;

/// Per-panel consumption and profit
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelSpec {
    /// Material units
    pub material: f64,
    /// Labor hours
    pub labor: f64,
    /// CO2 units
    pub emissions: f64,
    pub profit: f64,
}

/// Panel counts are solved as continuous quantities
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct SolarParams {
    pub material_limit: f64,
    pub labor_hours: f64,
    pub max_emissions: f64,
    pub standard: PanelSpec,
    pub premium: PanelSpec,
}

impl Default for SolarParams {
    fn default() -> Self {
        Self {
            material_limit: 1000.0,
            labor_hours: 160.0,
            max_emissions: 500.0,
            standard: PanelSpec {
                material: 2.0,
                labor: 1.0,
                emissions: 1.5,
                profit: 300.0,
            },
            premium: PanelSpec {
                material: 3.0,
                labor: 2.0,
                emissions: 2.0,
                profit: 500.0,
            },
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SolarPlan {
    pub solution: Solution,
    pub standard_panels: f64,
    pub premium_panels: f64,
    pub profit: f64,
    pub material_used: f64,
    pub labor_used: f64,
    pub emissions: f64,
}

impl SolarParams {
    pub fn problem(&self) -> LpProblem {
        let (s, p) = (&self.standard, &self.premium);
        let mut problem = LpProblem::new(["standard", "premium"]).with_objective([s.profit, p.profit]);
        problem.add_constraint("material", [s.material, p.material], ConstraintOp::Le, self.material_limit);
        problem.add_constraint("labor", [s.labor, p.labor], ConstraintOp::Le, self.labor_hours);
        problem.add_constraint("emissions", [s.emissions, p.emissions], ConstraintOp::Le, self.max_emissions);
        problem
    }

    pub fn solve(&self) -> Result<SolarPlan, ModelError> {
        let problem = self.problem();
        problem.validate_positive()?;
        let solution = Solver::new().solve(&problem)?;

        let usage: Vec<f64> = problem
            .constraints
            .iter()
            .map(|c| c.lhs(solution.optimal_point))
            .collect();
        tracing::debug!(
            standard = solution.optimal_point.x,
            premium = solution.optimal_point.y,
            profit = solution.objective_value,
            "solar mix solved"
        );

        Ok(SolarPlan {
            standard_panels: solution.optimal_point.x,
            premium_panels: solution.optimal_point.y,
            profit: solution.objective_value,
            material_used: usage[0],
            labor_used: usage[1],
            emissions: usage[2],
            solution,
        })
    }
}
