mod error;
pub mod geometry;
pub mod plot;
mod problem;
pub mod sensitivity;
pub mod simulate;
mod solution;
mod solver;
pub mod vertices;

pub use error::SolveError;
pub use geometry::Point;
pub use problem::{Constraint, ConstraintOp, LpProblem, Objective};
pub use sensitivity::{analyze, AnalysisConfig, ShadowPriceRule};
pub use simulate::{sensitivity_sweep, simulate_delta, SimulationDelta, SimulationOutcome, Simulator, SweepPoint};
pub use solution::{
    Analysis, ConstraintViolation, DualProblem, Estimate, ReducedCost, ResourceUsage, SensitivityRange,
    ShadowPrice, Solution,
};
pub use solver::Solver;
pub use vertices::VertexEnumerator;
