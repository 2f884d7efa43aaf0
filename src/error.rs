//! Error types for illumopt.

use thiserror::Error;

/// Error type for illumopt operations.
#[derive(Debug, Error)]
pub enum DesignError {
    /// Matrix and vector shapes do not agree.
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: String, got: String },

    /// No lambda in the regularization sequence keeps the design inside the box.
    #[error(
        "No feasible regularization: largest lambda {largest_lambda:e} still deviates by {deviation:.4}"
    )]
    NoFeasibleRegularization { largest_lambda: f64, deviation: f64 },

    /// The convex backend returned a non-optimal status.
    #[error("Solver failure: {0}")]
    SolverFailure(String),

    /// Invalid problem data or settings.
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    /// Numerical error in a dense linear-algebra routine.
    #[error("Numerical error: {0}")]
    NumericalError(String),

    /// Malformed matrix file.
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// I/O error while reading a matrix file.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl DesignError {
    pub(crate) fn dimension(what: &str, expected: usize, got: usize) -> Self {
        DesignError::DimensionMismatch {
            expected: format!("{what} of length {expected}"),
            got: got.to_string(),
        }
    }
}

/// Result type for illumopt operations.
pub type Result<T> = std::result::Result<T, DesignError>;
