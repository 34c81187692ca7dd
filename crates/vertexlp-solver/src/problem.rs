use crate::error::SolveError;
use crate::geometry::Point;

/// A two-variable linear program, always maximized
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct LpProblem {
    /// Names of the two decision variables
    pub variables: [String; 2],
    /// Objective function coefficients
    pub objective: Objective,
    /// Constraints
    pub constraints: Vec<Constraint>,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Objective {
    /// Coefficient for each variable
    pub coefficients: [f64; 2],
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    /// Name/label for the constraint (for diagnostics)
    pub name: String,
    /// Usage coefficient for each variable
    pub coefficients: [f64; 2],
    /// Comparison operator
    pub op: ConstraintOp,
    /// Right-hand side bound
    pub rhs: f64,
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintOp {
    /// Less than or equal (<=)
    Le,
    /// Greater than or equal (>=)
    Ge,
}

impl Constraint {
    /// Left-hand side `a1*x + a2*y` at `p`
    pub fn lhs(&self, p: Point) -> f64 {
        self.coefficients[0] * p.x + self.coefficients[1] * p.y
    }

    pub fn is_satisfied(&self, p: Point) -> bool {
        self.is_satisfied_eps(p, 0.0)
    }

    /// Satisfaction test with slack `eps * (1 + |rhs|)`
    pub fn is_satisfied_eps(&self, p: Point, eps: f64) -> bool {
        let slack = eps * (1.0 + self.rhs.abs());
        let lhs = self.lhs(p);
        match self.op {
            ConstraintOp::Le => lhs <= self.rhs + slack,
            ConstraintOp::Ge => lhs >= self.rhs - slack,
        }
    }

    /// How far `p` is outside this constraint (0 when satisfied)
    pub fn violation(&self, p: Point) -> f64 {
        let lhs = self.lhs(p);
        match self.op {
            ConstraintOp::Le => (lhs - self.rhs).max(0.0),
            ConstraintOp::Ge => (self.rhs - lhs).max(0.0),
        }
    }
}

impl Objective {
    pub fn value_at(&self, p: Point) -> f64 {
        self.coefficients[0] * p.x + self.coefficients[1] * p.y
    }
}

impl LpProblem {
    pub fn new(variables: [&str; 2]) -> Self {
        Self {
            variables: variables.map(String::from),
            objective: Objective {
                coefficients: [0.0; 2],
            },
            constraints: Vec::new(),
        }
    }

    pub fn set_objective(&mut self, coefficients: [f64; 2]) {
        self.objective = Objective { coefficients };
    }

    pub fn add_constraint(&mut self, name: impl Into<String>, coefficients: [f64; 2], op: ConstraintOp, rhs: f64) {
        self.constraints.push(Constraint {
            name: name.into(),
            coefficients,
            op,
            rhs,
        });
    }

    /// Builder form of [`LpProblem::add_constraint`] for `<=` rows
    pub fn with_le(mut self, name: impl Into<String>, coefficients: [f64; 2], rhs: f64) -> Self {
        self.add_constraint(name, coefficients, ConstraintOp::Le, rhs);
        self
    }

    pub fn with_objective(mut self, coefficients: [f64; 2]) -> Self {
        self.set_objective(coefficients);
        self
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Right-hand sides in constraint order
    pub fn bounds(&self) -> Vec<f64> {
        self.constraints.iter().map(|c| c.rhs).collect()
    }

    /// Reject any non-finite value, and any objective coefficient, usage
    /// coefficient or bound that is not strictly positive.
    pub fn validate_positive(&self) -> Result<(), SolveError> {
        for (name, &c) in self.variables.iter().zip(&self.objective.coefficients) {
            if !(c.is_finite() && c > 0.0) {
                return Err(SolveError::InvalidParameters(format!(
                    "objective coefficient of {} must be positive, got {}",
                    name, c
                )));
            }
        }
        for c in &self.constraints {
            for (name, &a) in self.variables.iter().zip(&c.coefficients) {
                if !(a.is_finite() && a > 0.0) {
                    return Err(SolveError::InvalidParameters(format!(
                        "{} usage of {} must be positive, got {}",
                        c.name, name, a
                    )));
                }
            }
            if !(c.rhs.is_finite() && c.rhs > 0.0) {
                return Err(SolveError::InvalidParameters(format!(
                    "{} bound must be positive, got {}",
                    c.name, c.rhs
                )));
            }
        }
        Ok(())
    }

    /// Reject non-finite values anywhere in the problem
    pub fn validate_finite(&self) -> Result<(), SolveError> {
        let objective_ok = self.objective.coefficients.iter().all(|c| c.is_finite());
        if !objective_ok {
            return Err(SolveError::InvalidParameters(
                "objective coefficients must be finite".to_string(),
            ));
        }
        for c in &self.constraints {
            if !(c.coefficients.iter().all(|a| a.is_finite()) && c.rhs.is_finite()) {
                return Err(SolveError::InvalidParameters(format!(
                    "{} has a non-finite coefficient or bound",
                    c.name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_satisfaction() {
        let le = Constraint {
            name: "capacity".to_string(),
            coefficients: [2.0, 1.0],
            op: ConstraintOp::Le,
            rhs: 10.0,
        };
        assert!(le.is_satisfied(Point::new(5.0, 0.0)));
        assert!(!le.is_satisfied(Point::new(5.0, 0.5)));
        assert!((le.violation(Point::new(5.0, 0.5)) - 0.5).abs() < 1e-12);

        let ge = Constraint {
            op: ConstraintOp::Ge,
            ..le
        };
        assert!(ge.is_satisfied(Point::new(5.0, 0.0)));
        assert!(!ge.is_satisfied(Point::new(1.0, 1.0)));
        assert!((ge.violation(Point::new(1.0, 1.0)) - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_validate_positive() {
        let problem = LpProblem::new(["x", "y"])
            .with_objective([3.0, 2.0])
            .with_le("a", [1.0, 1.0], 4.0);
        assert!(problem.validate_positive().is_ok());

        let zero_bound = problem.clone().with_le("b", [1.0, 2.0], 0.0);
        let err = zero_bound.validate_positive().unwrap_err();
        assert!(matches!(err, SolveError::InvalidParameters(_)));
        assert!(err.to_string().contains("b bound"));

        let mut negative_profit = problem.clone();
        negative_profit.set_objective([-1.0, 2.0]);
        assert!(negative_profit.validate_positive().is_err());
    }

    #[test]
    fn test_validate_finite() {
        let problem = LpProblem::new(["x", "y"])
            .with_objective([3.0, 2.0])
            .with_le("a", [f64::NAN, 1.0], 4.0);
        assert!(problem.validate_finite().is_err());
    }
}
