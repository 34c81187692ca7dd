use thiserror::Error;

use crate::solution::ConstraintViolation;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("Infeasible: no corner point satisfies every constraint{}", describe_first(.violations))]
    Infeasible { violations: Vec<ConstraintViolation> },
}

fn describe_first(violations: &[ConstraintViolation]) -> String {
    match violations.first() {
        Some(v) => format!(" ({})", v.description),
        None => String::new(),
    }
}

impl SolveError {
    pub fn is_infeasible(&self) -> bool {
        matches!(self, SolveError::Infeasible { .. })
    }
}
