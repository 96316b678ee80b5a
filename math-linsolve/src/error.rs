//! Error types for the traced linear solvers.
//!
//! Every solver reports failures through [`SolverError`]. Running out of
//! iterations is deliberately *not* an error: iterative results carry a
//! `converged` flag instead.

use thiserror::Error;

/// Errors that can occur while setting up or running a solver.
#[derive(Debug, Error)]
pub enum SolverError {
    /// Matrix is not square, or a vector does not match its dimension.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Expected dimension
        expected: usize,
        /// Actual dimension provided
        got: usize,
    },

    /// The system has no unknowns.
    #[error("matrix must have at least one row")]
    EmptyMatrix,

    /// A pivot fell below the pivot tolerance.
    #[error("matrix is singular or nearly singular: pivot {pivot:e} in column {column}")]
    SingularMatrix {
        /// Column of the offending pivot
        column: usize,
        /// Pivot value that was rejected
        pivot: f64,
    },

    /// A stationary method met a zero diagonal entry.
    #[error("zero diagonal entry in row {row}")]
    ZeroDiagonal {
        /// Row with the zero diagonal
        row: usize,
    },

    /// The relaxation sweep was given no candidates.
    #[error("omega grid is empty")]
    EmptyOmegaGrid,

    /// Method name not recognized.
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    /// A row of a nested matrix literal has the wrong length.
    #[error("ragged matrix: row {row} has {got} entries, expected {expected}")]
    RaggedMatrix {
        /// Index of the ragged row
        row: usize,
        /// Expected row length
        expected: usize,
        /// Actual row length
        got: usize,
    },

    /// Invalid configuration value.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Failed to read a configuration file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse a configuration file.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized `Result` type for solver operations.
pub type Result<T> = std::result::Result<T, SolverError>;

impl SolverError {
    /// Returns `true` if the input shapes were inconsistent.
    pub fn is_dimension_error(&self) -> bool {
        matches!(
            self,
            SolverError::DimensionMismatch { .. }
                | SolverError::EmptyMatrix
                | SolverError::RaggedMatrix { .. }
        )
    }

    /// Returns `true` if the numbers themselves defeated the method.
    ///
    /// This includes `SingularMatrix` and `ZeroDiagonal`.
    pub fn is_numerical_error(&self) -> bool {
        matches!(
            self,
            SolverError::SingularMatrix { .. } | SolverError::ZeroDiagonal { .. }
        )
    }

    /// Returns `true` if this came from loading or interpreting a configuration.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SolverError::UnknownMethod(_)
                | SolverError::Config(_)
                | SolverError::EmptyOmegaGrid
                | SolverError::Io(_)
                | SolverError::Json(_)
        )
    }
}
