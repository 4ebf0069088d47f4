//! Error types for the ALWABP solver.

use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by instance validation, configuration validation and
/// the solver.
///
/// Normal search outcomes (a kick with no legal move, a neighborhood with
/// no improving move) are never reported through this type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlwabpError {
    /// No capability- and precedence-respecting assignment could be built.
    #[error("infeasible instance: {0}")]
    InfeasibleInstance(String),

    /// Malformed problem data (shape, index range, cyclic precedence).
    #[error("invalid instance: {0}")]
    InvalidInstance(String),

    /// An explicit assignment does not describe a valid solution.
    #[error("invalid solution: {0}")]
    InvalidSolution(String),

    /// A configuration value is out of range.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The deadline passed before construction produced any solution.
    #[error("time budget exceeded during construction after {elapsed:?}")]
    TimeBudgetExceededDuringConstruction {
        /// Time spent when construction gave up.
        elapsed: Duration,
    },
}

/// Result type alias for ALWABP operations.
pub type Result<T> = std::result::Result<T, AlwabpError>;
