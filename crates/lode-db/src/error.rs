//! Database error types for lode-db.

use lode_schema::SchemaError;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or returned malformed data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Expected a result row but none was returned.
    #[error("No result returned")]
    NoResult,

    /// Invalid state encountered (e.g., a forbidden status transition).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A snapshot for this scan was already stored.
    #[error("Snapshot for scan {0} already exists")]
    DuplicateScan(String),

    /// A record failed JSON Schema validation at the persistence boundary.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
