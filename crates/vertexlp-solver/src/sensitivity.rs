use crate::geometry::Point;
use crate::problem::{ConstraintOp, LpProblem};
use crate::solution::{
    Analysis, DualProblem, Estimate, ReducedCost, ResourceUsage, SensitivityRange, ShadowPrice, Solution,
};

const BASIS_TOLERANCE: f64 = 1e-6;

/// Heuristic shadow price of one constraint: `fraction * c[variable]`
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowPriceRule {
    pub variable: usize,
    pub fraction: f64,
}

impl ShadowPriceRule {
    pub const fn new(variable: usize, fraction: f64) -> Self {
        Self { variable, fraction }
    }
}

/// Settings for [`analyze`]
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub estimate: Estimate,
    /// One rule per constraint; missing rules price the constraint at zero
    pub shadow_rules: Vec<ShadowPriceRule>,
    /// Relative spread per objective coefficient for heuristic ranges
    pub spreads: [f64; 2],
    /// Cap utilization percentages at 100
    pub cap_percentage: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            estimate: Estimate::Heuristic,
            shadow_rules: Vec::new(),
            spreads: [0.25, 0.20],
            cap_percentage: false,
        }
    }
}

impl AnalysisConfig {
    pub fn exact() -> Self {
        Self {
            estimate: Estimate::Exact,
            ..Self::default()
        }
    }
}

/// Estimated shadow prices: an active constraint is worth its rule's
/// fraction of an objective coefficient, an inactive one nothing.
pub fn shadow_prices(problem: &LpProblem, active: &[bool], rules: &[ShadowPriceRule]) -> Vec<ShadowPrice> {
    problem
        .constraints
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let is_active = active.get(i).copied().unwrap_or(false);
            let value = match rules.get(i) {
                Some(rule) if is_active => {
                    rule.fraction * problem.objective.coefficients.get(rule.variable).copied().unwrap_or(0.0)
                }
                _ => 0.0,
            };
            ShadowPrice {
                constraint: c.name.clone(),
                value,
                interpretation: interpret(value, Estimate::Heuristic),
            }
        })
        .collect()
}

/// Estimated ranges: each coefficient `c` spans `c*(1 - spread)..c*(1 + spread)`
pub fn sensitivity_ranges(problem: &LpProblem, spreads: [f64; 2]) -> Vec<SensitivityRange> {
    problem
        .variables
        .iter()
        .zip(problem.objective.coefficients)
        .zip(spreads)
        .map(|((name, c), spread)| {
            let (a, b) = (c * (1.0 - spread), c * (1.0 + spread));
            SensitivityRange {
                name: name.clone(),
                current: c,
                lower_bound: a.min(b),
                upper_bound: a.max(b),
            }
        })
        .collect()
}

/// Usage, utilization and leftover of every constraint at `point`
pub fn resource_analysis(problem: &LpProblem, point: Point, cap_percentage: bool) -> Vec<ResourceUsage> {
    problem
        .constraints
        .iter()
        .map(|c| {
            let usage = c.lhs(point);
            let mut percentage = if c.rhs != 0.0 { 100.0 * usage / c.rhs } else { 0.0 };
            if cap_percentage {
                percentage = percentage.min(100.0);
            }
            ResourceUsage {
                name: c.name.clone(),
                usage,
                available: c.rhs,
                percentage,
                remaining: c.rhs - usage,
            }
        })
        .collect()
}

/// Dual of the primal: minimize `b·u` subject to `Aᵀu >= c`
pub fn build_dual(problem: &LpProblem) -> DualProblem {
    let constraint_rows = (0..2)
        .map(|j| {
            let mut row: Vec<f64> = problem.constraints.iter().map(|c| c.coefficients[j]).collect();
            row.push(problem.objective.coefficients[j]);
            row
        })
        .collect();
    DualProblem {
        coefficients: problem.bounds(),
        constraint_rows,
    }
}

/// A row of the optimal basis in `n·p <= r` form
#[derive(Debug, Clone, Copy)]
enum BasisRow {
    Constraint(usize),
    Axis(usize),
}

#[derive(Debug, Clone, Copy)]
struct Basis {
    rows: [BasisRow; 2],
    /// `N⁻¹` where the columns of `N` are the two row normals
    inverse: [[f64; 2]; 2],
    multipliers: [f64; 2],
}

fn normal(problem: &LpProblem, row: BasisRow) -> [f64; 2] {
    match row {
        BasisRow::Constraint(i) => {
            let c = &problem.constraints[i];
            match c.op {
                ConstraintOp::Le => c.coefficients,
                ConstraintOp::Ge => [-c.coefficients[0], -c.coefficients[1]],
            }
        }
        BasisRow::Axis(0) => [-1.0, 0.0],
        BasisRow::Axis(_) => [0.0, -1.0],
    }
}

/// First pair of tight rows whose normals span the objective with
/// non-negative multipliers.
fn optimal_basis(problem: &LpProblem, solution: &Solution) -> Option<Basis> {
    let p = solution.exact_point;
    let mut tight: Vec<BasisRow> = solution
        .active_constraints
        .iter()
        .enumerate()
        .filter(|&(_, &a)| a)
        .map(|(i, _)| BasisRow::Constraint(i))
        .collect();
    if p.x.abs() < BASIS_TOLERANCE {
        tight.push(BasisRow::Axis(0));
    }
    if p.y.abs() < BASIS_TOLERANCE {
        tight.push(BasisRow::Axis(1));
    }

    let [c1, c2] = problem.objective.coefficients;
    for i in 0..tight.len() {
        for j in (i + 1)..tight.len() {
            let [a, b] = normal(problem, tight[i]);
            let [d, e] = normal(problem, tight[j]);
            let det = a * e - d * b;
            if det.abs() < BASIS_TOLERANCE {
                continue;
            }
            let inverse = [[e / det, -d / det], [-b / det, a / det]];
            let multipliers = [
                inverse[0][0] * c1 + inverse[0][1] * c2,
                inverse[1][0] * c1 + inverse[1][1] * c2,
            ];
            if multipliers.iter().all(|&m| m >= -BASIS_TOLERANCE) {
                return Some(Basis {
                    rows: [tight[i], tight[j]],
                    inverse,
                    multipliers,
                });
            }
        }
    }
    None
}

/// Dual values read off the optimal basis. A binding `<=` row gains the
/// objective per unit of extra bound; a binding `>=` row costs it.
pub fn exact_shadow_prices(problem: &LpProblem, solution: &Solution) -> Vec<ShadowPrice> {
    let mut values = vec![0.0; problem.num_constraints()];
    if let Some(basis) = optimal_basis(problem, solution) {
        for (row, &m) in basis.rows.iter().zip(&basis.multipliers) {
            if let BasisRow::Constraint(i) = *row {
                values[i] = match problem.constraints[i].op {
                    ConstraintOp::Le => m.max(0.0),
                    ConstraintOp::Ge => -m.max(0.0),
                };
            }
        }
    } else {
        tracing::debug!("no basis spans the objective at the optimum, shadow prices left at zero");
    }

    problem
        .constraints
        .iter()
        .zip(values)
        .map(|(c, value)| ShadowPrice {
            constraint: c.name.clone(),
            value,
            interpretation: interpret(value, Estimate::Exact),
        })
        .collect()
}

/// For each objective coefficient (the other held fixed), the interval over
/// which the current vertex stays optimal. Sides that never change the
/// vertex are infinite; without a usable basis the range collapses to the
/// current value.
pub fn exact_objective_ranges(problem: &LpProblem, solution: &Solution) -> Vec<SensitivityRange> {
    let c = problem.objective.coefficients;
    let basis = optimal_basis(problem, solution);

    (0..2)
        .map(|j| {
            let name = problem.variables[j].clone();
            let Some(basis) = basis else {
                return SensitivityRange {
                    name,
                    current: c[j],
                    lower_bound: c[j],
                    upper_bound: c[j],
                };
            };
            let other = 1 - j;
            let mut lower = f64::NEG_INFINITY;
            let mut upper = f64::INFINITY;
            // multiplier k as a function of t = c[j]: alpha * t + beta >= 0
            for k in 0..2 {
                let alpha = basis.inverse[k][j];
                let beta = basis.inverse[k][other] * c[other];
                if alpha > BASIS_TOLERANCE {
                    lower = lower.max(-beta / alpha);
                } else if alpha < -BASIS_TOLERANCE {
                    upper = upper.min(-beta / alpha);
                }
            }
            SensitivityRange {
                name,
                current: c[j],
                lower_bound: lower,
                upper_bound: upper,
            }
        })
        .collect()
}

fn reduced_costs(problem: &LpProblem, solution: &Solution, prices: &[ShadowPrice]) -> Vec<ReducedCost> {
    let exact = [solution.exact_point.x, solution.exact_point.y];
    let reported = [solution.optimal_point.x, solution.optimal_point.y];
    (0..2)
        .map(|j| {
            let priced: f64 = problem
                .constraints
                .iter()
                .zip(prices)
                .map(|(c, sp)| sp.value * c.coefficients[j])
                .sum();
            let is_basic = exact[j].abs() > BASIS_TOLERANCE;
            ReducedCost {
                variable: problem.variables[j].clone(),
                value: reported[j],
                reduced_cost: if is_basic { 0.0 } else { problem.objective.coefficients[j] - priced },
                is_basic,
            }
        })
        .collect()
}

fn interpret(value: f64, estimate: Estimate) -> String {
    let qualifier = match estimate {
        Estimate::Heuristic => "about ",
        Estimate::Exact => "",
    };
    if value.abs() < 1e-9 {
        "Non-binding constraint".to_string()
    } else if value > 0.0 {
        format!("Increasing RHS by 1 unit would increase the objective by {}{:.4}", qualifier, value)
    } else {
        format!("Increasing RHS by 1 unit would decrease the objective by {}{:.4}", qualifier, -value)
    }
}

/// Assemble the full analysis of a solved problem
pub fn analyze(problem: &LpProblem, solution: &Solution, config: &AnalysisConfig) -> Analysis {
    let (shadow_prices, objective_sensitivity, reduced_costs) = match config.estimate {
        Estimate::Heuristic => (
            shadow_prices(problem, &solution.active_constraints, &config.shadow_rules),
            sensitivity_ranges(problem, config.spreads),
            Vec::new(),
        ),
        Estimate::Exact => {
            let prices = exact_shadow_prices(problem, solution);
            let rc = reduced_costs(problem, solution, &prices);
            (prices, exact_objective_ranges(problem, solution), rc)
        }
    };

    Analysis {
        estimate: config.estimate,
        shadow_prices,
        reduced_costs,
        binding_constraints: solution.binding_constraints(problem),
        objective_sensitivity,
        resources: resource_analysis(problem, solution.optimal_point, config.cap_percentage),
        dual: build_dual(problem),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::Solver;

    const PRODUCT_MIX_RULES: [ShadowPriceRule; 3] = [
        ShadowPriceRule::new(0, 0.2),
        ShadowPriceRule::new(1, 0.1),
        ShadowPriceRule::new(0, 0.25),
    ];

    fn product_mix() -> LpProblem {
        LpProblem::new(["tablets", "laptops"])
            .with_objective([120.0, 180.0])
            .with_le("assembly", [3.0, 5.0], 150.0)
            .with_le("quality_control", [1.0, 2.0], 60.0)
            .with_le("packaging", [2.0, 1.0], 80.0)
    }

    #[test]
    fn test_heuristic_shadow_prices() {
        let problem = product_mix();
        let prices = shadow_prices(&problem, &[true, false, true], &PRODUCT_MIX_RULES);
        let values: Vec<f64> = prices.iter().map(|sp| sp.value).collect();
        assert_eq!(values, vec![24.0, 0.0, 30.0]);
        assert_eq!(prices[1].interpretation, "Non-binding constraint");
        assert!(prices[0].interpretation.contains("about 24.0000"));
    }

    #[test]
    fn test_heuristic_ranges() {
        let ranges = sensitivity_ranges(&product_mix(), [0.25, 0.20]);
        assert_eq!((ranges[0].lower_bound, ranges[0].upper_bound), (90.0, 150.0));
        assert!((ranges[1].lower_bound - 144.0).abs() < 1e-9);
        assert!((ranges[1].upper_bound - 216.0).abs() < 1e-9);
        assert!(ranges[1].contains(180.0));
    }

    #[test]
    fn test_resource_analysis() {
        let problem = product_mix();
        let usage = resource_analysis(&problem, Point::new(40.0, 0.0), false);
        assert_eq!(usage[0].usage, 120.0);
        assert_eq!(usage[0].percentage, 80.0);
        assert_eq!(usage[0].remaining, 30.0);
        assert_eq!(usage[2].percentage, 100.0);
        assert_eq!(usage[2].remaining, 0.0);

        let over = resource_analysis(&problem, Point::new(50.0, 0.0), true);
        assert_eq!(over[2].percentage, 100.0);
        assert_eq!(over[2].remaining, -20.0);
    }

    #[test]
    fn test_build_dual() {
        let dual = build_dual(&product_mix());
        assert_eq!(dual.coefficients, vec![150.0, 60.0, 80.0]);
        assert_eq!(
            dual.constraint_rows,
            vec![vec![3.0, 1.0, 2.0, 120.0], vec![5.0, 2.0, 1.0, 180.0]]
        );
    }

    #[test]
    fn test_exact_shadow_prices_satisfy_strong_duality() {
        let problem = product_mix();
        let solution = Solver::new().solve(&problem).unwrap();
        let prices = exact_shadow_prices(&problem, &solution);

        // assembly: 240/7, packaging: 60/7
        assert!((prices[0].value - 240.0 / 7.0).abs() < 1e-9);
        assert_eq!(prices[1].value, 0.0);
        assert!((prices[2].value - 60.0 / 7.0).abs() < 1e-9);

        let dual_value: f64 = problem.bounds().iter().zip(&prices).map(|(b, sp)| b * sp.value).sum();
        let primal_value = problem.objective.value_at(solution.exact_point);
        assert!((dual_value - primal_value).abs() < 1e-6);
    }

    #[test]
    fn test_exact_objective_ranges() {
        let problem = product_mix();
        let solution = Solver::new().solve(&problem).unwrap();
        let ranges = exact_objective_ranges(&problem, &solution);

        // slopes of assembly (3/5) and packaging (2/1) bound the ratio c1/c2
        assert!((ranges[0].lower_bound - 108.0).abs() < 1e-9);
        assert!((ranges[0].upper_bound - 360.0).abs() < 1e-9);
        assert!((ranges[1].lower_bound - 60.0).abs() < 1e-9);
        assert!((ranges[1].upper_bound - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_exact_analysis_at_axis_vertex() {
        // Maximize 1x + 5y, x + y <= 4, x <= 3: optimum (0, 4) on the y axis
        let problem = LpProblem::new(["x", "y"])
            .with_objective([1.0, 5.0])
            .with_le("sum", [1.0, 1.0], 4.0)
            .with_le("x_max", [1.0, 0.0], 3.0);
        let solution = Solver::new().solve(&problem).unwrap();
        assert_eq!(solution.optimal_point, Point::new(0.0, 4.0));

        let analysis = analyze(&problem, &solution, &AnalysisConfig::exact());
        assert_eq!(analysis.estimate, Estimate::Exact);
        assert!((analysis.shadow_prices[0].value - 5.0).abs() < 1e-9);
        assert_eq!(analysis.shadow_prices[1].value, 0.0);

        // x is out of the basis and would cost 4 per unit to bring in
        assert!(!analysis.reduced_costs[0].is_basic);
        assert!((analysis.reduced_costs[0].reduced_cost + 4.0).abs() < 1e-9);
        assert!(analysis.reduced_costs[1].is_basic);

        // c1 may grow up to 5 before (3,1) takes over, and fall without limit
        assert_eq!(analysis.objective_sensitivity[0].lower_bound, f64::NEG_INFINITY);
        assert!((analysis.objective_sensitivity[0].upper_bound - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_heuristic_analysis() {
        let problem = product_mix();
        let solution = Solver::new().solve(&problem).unwrap();
        let config = AnalysisConfig {
            shadow_rules: PRODUCT_MIX_RULES.to_vec(),
            ..AnalysisConfig::default()
        };
        let analysis = analyze(&problem, &solution, &config);
        assert_eq!(analysis.binding_constraints, vec!["assembly", "packaging"]);
        assert_eq!(analysis.shadow_prices[2].value, 30.0);
        assert!(analysis.reduced_costs.is_empty());
        assert_eq!(analysis.resources.len(), 3);
        assert_eq!(analysis.dual.coefficients.len(), 3);
    }
}
