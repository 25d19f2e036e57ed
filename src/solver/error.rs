use thiserror::Error;

/// Caller misuse of the targeted solver.
///
/// Sparse data is not an error: a single unit with no turnout, or an empty
/// aggregate, resolves to neutral values. These variants cover only requests
/// that cannot be answered.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    /// The scope has no units, or none of them has any turnout.
    #[error("cannot solve for a target over a scope with no turnout ({units} units in scope)")]
    EmptyScope { units: usize },

    /// The target margin is NaN or infinite.
    #[error("target margin must be a finite number of percentage points, got {0}")]
    InvalidTarget(f64),
}
