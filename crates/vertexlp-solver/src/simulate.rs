use crate::geometry::Point;
use crate::problem::{LpProblem, Objective};
use crate::solution::Solution;

/// Proposed changes to the objective coefficients and constraint bounds
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimulationDelta {
    pub objective: [f64; 2],
    pub bounds: Vec<f64>,
}

impl SimulationDelta {
    pub fn objective(dc1: f64, dc2: f64) -> Self {
        Self {
            objective: [dc1, dc2],
            bounds: Vec::new(),
        }
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationOutcome {
    pub new_objective_value: f64,
    /// `new_objective_value - current value`
    pub difference: f64,
}

/// `(c1 + dc1) * x + (c2 + dc2) * y` against the current objective value.
/// The point never moves, so bound deltas leave the value unchanged.
pub fn simulate_delta(objective: &Objective, point: Point, current_value: f64, delta: &SimulationDelta) -> SimulationOutcome {
    let [c1, c2] = objective.coefficients;
    let [dc1, dc2] = delta.objective;
    let new_objective_value = (c1 + dc1) * point.x + (c2 + dc2) * point.y;
    SimulationOutcome {
        new_objective_value,
        difference: new_objective_value - current_value,
    }
}

/// One saved what-if run
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRun {
    pub id: usize,
    pub delta: SimulationDelta,
    pub objective_value: f64,
    pub difference: f64,
    pub percentage_change: f64,
}

/// What-if session over one solved problem, with a history of saved runs.
/// The history starts with the unchanged baseline as run 0.
#[derive(Debug, Clone)]
pub struct Simulator {
    objective: Objective,
    point: Point,
    base_value: f64,
    history: Vec<SimulationRun>,
}

impl Simulator {
    pub fn new(problem: &LpProblem, solution: &Solution) -> Self {
        let baseline = SimulationRun {
            id: 0,
            delta: SimulationDelta::default(),
            objective_value: solution.objective_value,
            difference: 0.0,
            percentage_change: 0.0,
        };
        Self {
            objective: problem.objective,
            point: solution.optimal_point,
            base_value: solution.objective_value,
            history: vec![baseline],
        }
    }

    pub fn evaluate(&self, delta: &SimulationDelta) -> SimulationOutcome {
        simulate_delta(&self.objective, self.point, self.base_value, delta)
    }

    /// Change relative to the baseline, in percent; 0 when the baseline is not positive
    pub fn percentage_change(&self, outcome: &SimulationOutcome) -> f64 {
        if self.base_value > 0.0 {
            outcome.difference / self.base_value * 100.0
        } else {
            0.0
        }
    }

    /// Evaluate `delta` and append it to the history
    pub fn save(&mut self, delta: SimulationDelta) -> &SimulationRun {
        let outcome = self.evaluate(&delta);
        let run = SimulationRun {
            id: self.history.len(),
            delta,
            objective_value: outcome.new_objective_value,
            difference: outcome.difference,
            percentage_change: self.percentage_change(&outcome),
        };
        self.history.push(run);
        &self.history[self.history.len() - 1]
    }

    pub fn history(&self) -> &[SimulationRun] {
        &self.history
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepPoint {
    /// Index of the coefficient being varied
    pub variable: usize,
    pub coefficient: f64,
    pub objective_value: f64,
}

/// Objective value at `point` as each coefficient in turn moves across
/// `c * (1 ± spread)` in `steps` increments per side, the other held fixed.
pub fn sensitivity_sweep(objective: &Objective, point: Point, spread: f64, steps: u32) -> Vec<SweepPoint> {
    let steps = steps.max(1) as i64;
    let mut sweep = Vec::with_capacity(2 * (2 * steps as usize + 1));
    for variable in 0..2 {
        let base = objective.coefficients[variable];
        for k in -steps..=steps {
            let mut coefficients = objective.coefficients;
            coefficients[variable] = base + base * spread * (k as f64) / (steps as f64);
            sweep.push(SweepPoint {
                variable,
                coefficient: coefficients[variable],
                objective_value: coefficients[0] * point.x + coefficients[1] * point.y,
            });
        }
    }
    sweep
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::Solver;

    fn product_mix() -> LpProblem {
        LpProblem::new(["tablets", "laptops"])
            .with_objective([120.0, 180.0])
            .with_le("assembly", [3.0, 5.0], 150.0)
            .with_le("quality_control", [1.0, 2.0], 60.0)
            .with_le("packaging", [2.0, 1.0], 80.0)
    }

    #[test]
    fn test_simulate_delta() {
        let objective = Objective {
            coefficients: [75.0, 120.0],
        };
        let point = Point::new(40.0, 60.0);
        let outcome = simulate_delta(&objective, point, 10200.0, &SimulationDelta::objective(5.0, -10.0));
        assert_eq!(outcome.new_objective_value, 80.0 * 40.0 + 110.0 * 60.0);
        assert_eq!(outcome.difference, 9800.0 - 10200.0);
    }

    #[test]
    fn test_bound_deltas_do_not_move_the_point() {
        let objective = Objective {
            coefficients: [75.0, 120.0],
        };
        let delta = SimulationDelta {
            objective: [0.0, 0.0],
            bounds: vec![100.0, -20.0],
        };
        let outcome = simulate_delta(&objective, Point::new(40.0, 60.0), 10200.0, &delta);
        assert_eq!(outcome.difference, 0.0);
    }

    #[test]
    fn test_simulator_history() {
        let problem = product_mix();
        let solution = Solver::new().solve(&problem).unwrap();
        let mut sim = Simulator::new(&problem, &solution);
        assert_eq!(sim.history().len(), 1);

        let run = sim.save(SimulationDelta::objective(10.0, 0.0)).clone();
        assert_eq!(run.id, 1);
        assert!((run.difference - 10.0 * solution.optimal_point.x).abs() < 1e-9);
        let expected_pct = run.difference / solution.objective_value * 100.0;
        assert!((run.percentage_change - expected_pct).abs() < 1e-9);
        assert_eq!(sim.history().len(), 2);
    }

    #[test]
    fn test_sensitivity_sweep() {
        let objective = Objective {
            coefficients: [100.0, 200.0],
        };
        let sweep = sensitivity_sweep(&objective, Point::new(1.0, 2.0), 0.5, 10);
        assert_eq!(sweep.len(), 42);
        assert_eq!(sweep[0].coefficient, 50.0);
        assert_eq!(sweep[0].objective_value, 50.0 + 400.0);
        assert_eq!(sweep[10].coefficient, 100.0);
        assert_eq!(sweep[20].coefficient, 150.0);
        assert_eq!(sweep[21].variable, 1);
        assert_eq!(sweep[41].objective_value, 100.0 + 600.0);
    }
}
