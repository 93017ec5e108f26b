//! Errors raised by the core vocabulary types.
//!
//! Domain-specific errors (`GraphError`, `MonitorError`, `DatabaseError`)
//! live in their own crates and converge in `lode-cli`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// A relationship label outside the allowed predicate vocabulary.
    #[error("Predicate '{0}' is not in the allowed vocabulary")]
    InvalidPredicate(String),

    /// A value failed validation (unknown entity type, malformed field).
    #[error("Validation error: {0}")]
    Validation(String),
}
