use vertexlp_solver::plot::{constraint_lines, default_plot_extent, feasible_polygon, sample_feasible_region, ConstraintLine};
use vertexlp_solver::sensitivity::ShadowPriceRule;
use vertexlp_solver::{
    analyze, sensitivity_sweep, AnalysisConfig, Analysis, ConstraintOp, Estimate, LpProblem, Point, SimulationDelta,
    SimulationOutcome, Simulator, Solution, Solver, SweepPoint,
};

use crate::error::{non_negative, positive, ModelError};

/// Estimated shadow prices for assembly, quality control and packaging
pub const PRODUCT_MIX_SHADOW_RULES: [ShadowPriceRule; 3] = [
    ShadowPriceRule::new(0, 0.2),
    ShadowPriceRule::new(1, 0.1),
    ShadowPriceRule::new(0, 0.25),
];

/// Each profit is swept over +-50% of its value
pub const SWEEP_SPREAD: f64 = 0.5;
/// Points on each side of the current profit
pub const SWEEP_STEPS: u32 = 10;

/// Per-unit usage of one department and its capacity
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Department {
    pub usage: [f64; 2],
    pub available: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct ProductMixParams {
    /// Profit per tablet and per laptop
    pub profits: [f64; 2],
    pub assembly: Department,
    pub quality_control: Department,
    pub packaging: Department,
}

impl Default for ProductMixParams {
    fn default() -> Self {
        Self {
            profits: [120.0, 180.0],
            assembly: Department {
                usage: [3.0, 5.0],
                available: 150.0,
            },
            quality_control: Department {
                usage: [1.0, 2.0],
                available: 60.0,
            },
            packaging: Department {
                usage: [2.0, 1.0],
                available: 80.0,
            },
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ProductMixReport {
    pub solution: Solution,
    pub analysis: Analysis,
}

/// Everything needed to draw the feasible region
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PlotData {
    pub extent: f64,
    pub polygon: Vec<Point>,
    pub lines: Vec<ConstraintLine>,
    pub region: Vec<Point>,
    pub optimum: Point,
}

impl ProductMixParams {
    pub fn problem(&self) -> LpProblem {
        let mut problem = LpProblem::new(["tablets", "laptops"]).with_objective(self.profits);
        for (name, dept) in [
            ("assembly", &self.assembly),
            ("quality_control", &self.quality_control),
            ("packaging", &self.packaging),
        ] {
            problem.add_constraint(name, dept.usage, ConstraintOp::Le, dept.available);
        }
        problem
    }

    /// Usages may be zero, capacities must be positive
    pub fn validate(&self) -> Result<(), ModelError> {
        non_negative("profits[0]", self.profits[0])?;
        non_negative("profits[1]", self.profits[1])?;
        for (field, dept) in [
            ("assembly", &self.assembly),
            ("quality_control", &self.quality_control),
            ("packaging", &self.packaging),
        ] {
            non_negative(field, dept.usage[0])?;
            non_negative(field, dept.usage[1])?;
            positive(field, dept.available)?;
        }
        Ok(())
    }

    pub fn config(&self, estimate: Estimate) -> AnalysisConfig {
        match estimate {
            Estimate::Heuristic => AnalysisConfig {
                shadow_rules: PRODUCT_MIX_SHADOW_RULES.to_vec(),
                ..AnalysisConfig::default()
            },
            Estimate::Exact => AnalysisConfig::exact(),
        }
    }

    pub fn solve(&self) -> Result<Solution, ModelError> {
        self.validate()?;
        Ok(Solver::new().solve(&self.problem())?)
    }

    pub fn analyze(&self, estimate: Estimate) -> Result<ProductMixReport, ModelError> {
        let solution = self.solve()?;
        let analysis = analyze(&self.problem(), &solution, &self.config(estimate));
        Ok(ProductMixReport { solution, analysis })
    }

    /// Solve and open a what-if session at the optimum
    pub fn simulator(&self) -> Result<Simulator, ModelError> {
        let solution = self.solve()?;
        Ok(Simulator::new(&self.problem(), &solution))
    }

    pub fn simulate(&self, delta: &SimulationDelta) -> Result<SimulationOutcome, ModelError> {
        Ok(self.simulator()?.evaluate(delta))
    }

    /// Objective value at the fixed optimum as each profit moves through
    /// [`SWEEP_SPREAD`]; `2 * SWEEP_STEPS + 1` points per product
    pub fn sweep(&self, solution: &Solution) -> Vec<SweepPoint> {
        sensitivity_sweep(&self.problem().objective, solution.optimal_point, SWEEP_SPREAD, SWEEP_STEPS)
    }

    pub fn plot_data(&self, solution: &Solution) -> PlotData {
        let problem = self.problem();
        let extent = default_plot_extent(&problem);
        PlotData {
            extent,
            polygon: feasible_polygon(solution),
            lines: constraint_lines(&problem, extent, 50),
            region: sample_feasible_region(&problem, extent, 50),
            optimum: solution.optimal_point,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vertexlp_solver::sensitivity::resource_analysis;

    #[test]
    fn test_heuristic_report() {
        let report = ProductMixParams::default().analyze(Estimate::Heuristic).unwrap();
        assert_eq!(report.solution.optimal_point, Point::new(35.71, 8.57));
        assert_eq!(report.solution.active_constraints, vec![true, false, true]);

        let prices: Vec<f64> = report.analysis.shadow_prices.iter().map(|p| p.value).collect();
        assert_eq!(prices, vec![24.0, 0.0, 30.0]);
        assert_eq!(report.analysis.binding_constraints, vec!["assembly", "packaging"]);

        let ranges = &report.analysis.objective_sensitivity;
        assert_eq!((ranges[0].lower_bound, ranges[0].upper_bound), (90.0, 150.0));
        assert!((ranges[1].lower_bound - 144.0).abs() < 1e-9);
        assert!((ranges[1].upper_bound - 216.0).abs() < 1e-9);

        assert_eq!(report.analysis.dual.coefficients, vec![150.0, 60.0, 80.0]);
    }

    #[test]
    fn test_utilization_is_not_capped() {
        let params = ProductMixParams::default();
        let config = params.config(Estimate::Heuristic);
        // 50 tablets need 100 packaging hours of 80
        let usage = resource_analysis(&params.problem(), Point::new(50.0, 0.0), config.cap_percentage);
        assert_eq!(usage[0].percentage, 100.0);
        assert_eq!(usage[2].percentage, 125.0);
        assert_eq!(usage[2].remaining, -20.0);
    }

    #[test]
    fn test_profit_sweep_around_the_optimum() {
        let params = ProductMixParams::default();
        let solution = params.solve().unwrap();
        let sweep = params.sweep(&solution);
        assert_eq!(sweep.len(), 42);

        let tablets = &sweep[..21];
        assert!(tablets.iter().all(|p| p.variable == 0));
        assert_eq!(tablets[0].coefficient, 60.0);
        assert_eq!(tablets[20].coefficient, 180.0);
        assert!((tablets[10].objective_value - solution.objective_value).abs() < 1e-9);
        // value grows with the tablet profit since 35.71 tablets are made
        assert!(tablets.windows(2).all(|w| w[1].objective_value > w[0].objective_value));

        let laptops = &sweep[21..];
        assert_eq!(laptops[0].coefficient, 90.0);
        assert!((laptops[0].objective_value - (120.0 * 35.71 + 90.0 * 8.57)).abs() < 1e-9);
    }

    #[test]
    fn test_exact_report_satisfies_strong_duality() {
        let report = ProductMixParams::default().analyze(Estimate::Exact).unwrap();
        let prices: Vec<f64> = report.analysis.shadow_prices.iter().map(|p| p.value).collect();
        let dual_value = 150.0 * prices[0] + 60.0 * prices[1] + 80.0 * prices[2];
        let primal = 120.0 * report.solution.exact_point.x + 180.0 * report.solution.exact_point.y;
        assert!((dual_value - primal).abs() < 1e-6);
        assert_eq!(prices[1], 0.0);
    }

    #[test]
    fn test_simulation_keeps_the_point() {
        let params = ProductMixParams::default();
        let mut sim = params.simulator().unwrap();
        let outcome = sim.evaluate(&SimulationDelta::objective(10.0, 0.0));
        assert!((outcome.difference - 357.1).abs() < 1e-9);

        sim.save(SimulationDelta::objective(0.0, -20.0));
        assert_eq!(sim.history().len(), 2);
        assert!(sim.history()[1].difference < 0.0);
    }

    #[test]
    fn test_plot_data() {
        let params = ProductMixParams::default();
        let solution = params.solve().unwrap();
        let plot = params.plot_data(&solution);
        // quality control crosses the x axis farthest out, at 60
        assert!((plot.extent - 72.0).abs() < 1e-9);
        assert_eq!(plot.lines.len(), 3);
        assert_eq!(plot.lines[0].points.len(), 51);
        assert_eq!(plot.polygon.len(), 4);
        assert!(plot.region.contains(&Point::ORIGIN));
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let mut params = ProductMixParams::default();
        params.packaging.available = 0.0;
        assert!(matches!(
            params.solve(),
            Err(ModelError::InvalidField { field: "packaging", .. })
        ));
    }
}
