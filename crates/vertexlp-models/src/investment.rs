use vertexlp_solver::{ConstraintOp, LpProblem, Point, Solution, Solver};

use crate::error::{non_negative, ModelError};

/// Split a capital between a low-risk and a high-risk investment, maximizing
/// `r1*x1 + r2*x2` under the capital, the weighted risk cap
/// (`(risk1 - max_risk)*x1 + (risk2 - max_risk)*x2 <= 0`) and the minimum
/// return. Rates and risks are decimals (`0.05` for 5%).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct InvestmentParams {
    pub total_capital: f64,
    /// Expected return rate of each investment
    pub return_rates: [f64; 2],
    /// Risk level of each investment
    pub risk_levels: [f64; 2],
    /// Highest acceptable weighted risk of the portfolio
    pub max_risk: f64,
    /// Lowest acceptable total return, in currency
    pub min_return: f64,
}

impl Default for InvestmentParams {
    fn default() -> Self {
        Self {
            total_capital: 100_000.0,
            return_rates: [0.05, 0.10],
            risk_levels: [0.02, 0.08],
            max_risk: 0.05,
            min_return: 800.0,
        }
    }
}

/// Which constraint holds the portfolio back
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitingConstraint {
    Capital,
    Risk,
    MinReturn,
}

/// `y = slope * x + intercept`
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub slope: f64,
    pub intercept: f64,
}

/// Boundary lines for plotting
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintLines {
    /// Endpoints of the capital line on the two axes
    pub capital: [Point; 2],
    /// `None` when the high-risk return rate is zero (vertical line)
    pub min_return: Option<Line>,
    /// Through the origin; `None` when the high-risk level equals the cap
    pub risk: Option<Line>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct InvestmentPlan {
    pub solution: Solution,
    /// Amount placed in each investment
    pub allocation: [f64; 2],
    pub total_return: f64,
    /// Amount-weighted risk level of the portfolio
    pub portfolio_risk: f64,
    /// Total return as a percentage of the capital
    pub return_percentage: f64,
    /// Share of the invested amount in each investment, in percent
    pub shares: [f64; 2],
    pub limiting: LimitingConstraint,
    pub lines: ConstraintLines,
}

impl InvestmentParams {
    /// Build from the percentages a form would collect
    pub fn from_percentages(
        total_capital: f64,
        return_pct: [f64; 2],
        risk_pct: [f64; 2],
        max_risk_pct: f64,
        min_return: f64,
    ) -> Self {
        Self {
            total_capital,
            return_rates: return_pct.map(|p| p / 100.0),
            risk_levels: risk_pct.map(|p| p / 100.0),
            max_risk: max_risk_pct / 100.0,
            min_return,
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        non_negative("total_capital", self.total_capital)?;
        non_negative("return_rates[0]", self.return_rates[0])?;
        non_negative("return_rates[1]", self.return_rates[1])?;
        non_negative("risk_levels[0]", self.risk_levels[0])?;
        non_negative("risk_levels[1]", self.risk_levels[1])?;
        non_negative("max_risk", self.max_risk)?;
        non_negative("min_return", self.min_return)
    }

    pub fn problem(&self) -> LpProblem {
        let [r1, r2] = self.return_rates;
        let [risk1, risk2] = self.risk_levels;
        let mut problem = LpProblem::new(["low_risk", "high_risk"]).with_objective([r1, r2]);
        problem.add_constraint("capital", [1.0, 1.0], ConstraintOp::Le, self.total_capital);
        problem.add_constraint("risk", [risk1 - self.max_risk, risk2 - self.max_risk], ConstraintOp::Le, 0.0);
        problem.add_constraint("min_return", [r1, r2], ConstraintOp::Ge, self.min_return);
        problem
    }

    /// Corner candidates computed directly from the domain lines rather
    /// than from every constraint pair.
    pub fn candidates(&self) -> Vec<Point> {
        let capital = self.total_capital;
        let [r1, r2] = self.return_rates;
        let [risk1, risk2] = self.risk_levels;
        let within_capital = |v: f64| v >= 0.0 && v <= capital;

        let mut points = vec![Point::ORIGIN, Point::new(capital, 0.0), Point::new(0.0, capital)];

        // minimum-return line on each axis
        if r2 > 0.0 {
            let y = self.min_return / r2;
            if within_capital(y) {
                points.push(Point::new(0.0, y));
            }
        }
        if r1 > 0.0 {
            let x = self.min_return / r1;
            if within_capital(x) {
                points.push(Point::new(x, 0.0));
            }
        }

        // the risk line runs through the origin and only enters the
        // quadrant when the cap sits between the two risk levels
        if (risk1 - self.max_risk) * (risk2 - self.max_risk) < 0.0 {
            let slope = (self.max_risk - risk1) / (risk2 - self.max_risk);
            let x = capital / (1.0 + slope);
            let y = capital - x;
            if x >= 0.0 && y >= 0.0 {
                points.push(Point::new(x, y));
            }
        }

        // capital line against minimum-return line
        if r1 != r2 {
            let x = (capital * r2 - self.min_return) / (r2 - r1);
            let y = capital - x;
            if within_capital(x) && within_capital(y) {
                points.push(Point::new(x, y));
            }
        }

        points
    }

    pub fn constraint_lines(&self) -> ConstraintLines {
        let [r1, r2] = self.return_rates;
        let [risk1, risk2] = self.risk_levels;
        ConstraintLines {
            capital: [Point::new(0.0, self.total_capital), Point::new(self.total_capital, 0.0)],
            min_return: (r2 != 0.0).then(|| Line {
                slope: -r1 / r2,
                intercept: self.min_return / r2,
            }),
            risk: (risk2 != self.max_risk).then(|| Line {
                slope: (self.max_risk - risk1) / (risk2 - self.max_risk),
                intercept: 0.0,
            }),
        }
    }

    pub fn solve(&self) -> Result<InvestmentPlan, ModelError> {
        self.validate()?;
        let problem = self.problem();
        let solution = Solver::new()
            .with_active_tolerance(0.01)
            .select_optimal(&problem, &self.candidates())?;

        let [x1, x2] = [solution.optimal_point.x, solution.optimal_point.y];
        let invested = x1 + x2;
        let portfolio_risk = portfolio_risk(self.risk_levels, [x1, x2]);
        let total_return = solution.objective_value;
        let return_percentage = if self.total_capital > 0.0 {
            total_return / self.total_capital * 100.0
        } else {
            0.0
        };
        let shares = if invested > 0.0 {
            [x1 / invested * 100.0, x2 / invested * 100.0]
        } else {
            [0.0, 0.0]
        };

        let limiting = if (invested - self.total_capital).abs() < 0.01 {
            LimitingConstraint::Capital
        } else if (portfolio_risk - self.max_risk).abs() * 100.0 < 0.1 {
            LimitingConstraint::Risk
        } else {
            LimitingConstraint::MinReturn
        };

        tracing::debug!(x1, x2, total_return, ?limiting, "investment mix solved");

        Ok(InvestmentPlan {
            allocation: [x1, x2],
            total_return,
            portfolio_risk,
            return_percentage,
            shares,
            limiting,
            lines: self.constraint_lines(),
            solution,
        })
    }
}

/// Amount-weighted average risk; 0 for an empty portfolio
pub fn portfolio_risk(risk_levels: [f64; 2], amounts: [f64; 2]) -> f64 {
    let total = amounts[0] + amounts[1];
    if total <= 0.0 {
        return 0.0;
    }
    (risk_levels[0] * amounts[0] + risk_levels[1] * amounts[1]) / total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_case_hits_capital_and_risk() {
        let plan = InvestmentParams::default().solve().unwrap();

        assert_eq!(plan.solution.optimal_point, Point::new(50_000.0, 50_000.0));
        assert!((plan.total_return - 7_500.0).abs() < 1e-6);
        assert_eq!(plan.solution.active_constraints, vec![true, true, false]);
        assert!((plan.portfolio_risk - 0.05).abs() < 1e-9);
        assert!((plan.return_percentage - 7.5).abs() < 1e-9);
        assert!((plan.shares[0] - 50.0).abs() < 1e-9);
        assert_eq!(plan.limiting, LimitingConstraint::Capital);
    }

    #[test]
    fn test_optimum_beats_every_feasible_vertex() {
        let params = InvestmentParams::default();
        let plan = params.solve().unwrap();
        for v in &plan.solution.feasible_vertices {
            assert!(0.05 * v.x + 0.10 * v.y <= plan.total_return + 1e-9);
        }
        // pure low-risk and the minimum-return intercept are feasible too
        assert!(plan.solution.feasible_vertices.contains(&Point::new(100_000.0, 0.0)));
        assert!(plan.solution.feasible_vertices.contains(&Point::new(16_000.0, 0.0)));
    }

    #[test]
    fn test_zero_capital_leaves_the_origin() {
        let params = InvestmentParams {
            total_capital: 0.0,
            min_return: 0.0,
            ..InvestmentParams::default()
        };
        let plan = params.solve().unwrap();
        assert_eq!(plan.solution.optimal_point, Point::ORIGIN);
        assert_eq!(plan.solution.feasible_vertices, vec![Point::ORIGIN]);
        assert_eq!(plan.total_return, 0.0);
        assert_eq!(plan.return_percentage, 0.0);
        assert_eq!(plan.shares, [0.0, 0.0]);
    }

    #[test]
    fn test_unreachable_min_return_is_infeasible() {
        // at most 10% of 100k can come back
        let params = InvestmentParams {
            min_return: 20_000.0,
            ..InvestmentParams::default()
        };
        let err = params.solve().unwrap_err();
        assert!(err.is_infeasible());
    }

    #[test]
    fn test_risk_cap_below_both_levels() {
        // neither investment alone respects the cap, so only the origin is
        // risk-feasible and the minimum return cannot be met
        let params = InvestmentParams {
            max_risk: 0.01,
            ..InvestmentParams::default()
        };
        assert!(params.solve().unwrap_err().is_infeasible());
    }

    #[test]
    fn test_from_percentages() {
        let params = InvestmentParams::from_percentages(100_000.0, [5.0, 10.0], [2.0, 8.0], 5.0, 800.0);
        assert!((params.return_rates[1] - 0.10).abs() < 1e-12);
        assert!((params.max_risk - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_validation() {
        let params = InvestmentParams {
            total_capital: -1.0,
            ..InvestmentParams::default()
        };
        let err = params.solve().unwrap_err();
        assert!(matches!(err, ModelError::InvalidField { field: "total_capital", .. }));
    }

    #[test]
    fn test_constraint_lines() {
        let lines = InvestmentParams::default().constraint_lines();
        assert_eq!(lines.capital[1], Point::new(100_000.0, 0.0));
        let min_return = lines.min_return.unwrap();
        assert!((min_return.slope + 0.5).abs() < 1e-12);
        assert!((min_return.intercept - 8_000.0).abs() < 1e-9);
        assert!((lines.risk.unwrap().slope - 1.0).abs() < 1e-9);
    }
}
