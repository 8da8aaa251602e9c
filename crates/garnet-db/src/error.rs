//! Error types for the database layer.

use garnet_sql_core::QueryError;
use thiserror::Error;

/// Errors surfaced by query execution.
#[derive(Debug, Error)]
pub enum DbError {
    /// Database error from sqlx (connectivity, constraint violations,
    /// statement failures). Propagated unmodified.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Statement construction error from the builder.
    #[error(transparent)]
    Query(#[from] QueryError),
}

/// Result type alias for database operations.
pub type Result<T> = std::result::Result<T, DbError>;
