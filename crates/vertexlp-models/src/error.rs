use thiserror::Error;
use vertexlp_solver::SolveError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ModelError {
    #[error("{field} must be {requirement}, got {value}")]
    InvalidField {
        field: &'static str,
        requirement: &'static str,
        value: f64,
    },
    #[error("Unknown planning strategy: {0} (expected `vertex` or `baseline`)")]
    UnknownStrategy(String),
    #[error(transparent)]
    Solve(#[from] SolveError),
}

impl ModelError {
    pub fn is_infeasible(&self) -> bool {
        matches!(self, ModelError::Solve(e) if e.is_infeasible())
    }
}

pub(crate) fn non_negative(field: &'static str, value: f64) -> Result<(), ModelError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ModelError::InvalidField {
            field,
            requirement: "a non-negative number",
            value,
        })
    }
}

pub(crate) fn positive(field: &'static str, value: f64) -> Result<(), ModelError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ModelError::InvalidField {
            field,
            requirement: "a positive number",
            value,
        })
    }
}
