//! Targeted outcome solver: the inverse of projection.

mod error;
mod solver;

pub use error::SolverError;
pub use solver::{SolveMode, SolverConfig, SolverResult, TargetedSolver, allocate};
