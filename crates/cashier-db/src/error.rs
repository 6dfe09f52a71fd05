//! # Storage Errors
//!
//! ```text
//!  sqlx::Error ─────┐
//!  MigrateError ────┼──► DbError ──► ApiError { code: DATABASE_ERROR }
//!  serde_json ──────┘       │          (message kept generic)
//!                           └──► logged by the write queue / hydration
//! ```
//!
//! A failed read during hydration is not fatal: the session keeps its
//! default for that collection. A failed queued write is logged and counted.

use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// The file could not be opened or created, or the pool is closed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// A stored record could not be encoded or decoded.
    #[error("Serialization failed: {0}")]
    Serialization(String),

    /// The write queue task is no longer running.
    #[error("Write queue closed")]
    WriterClosed,

    /// No connection became free within the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("Internal database error: {0}")]
    Internal(String),
}

/// Only pool and SQLite-level failures get their own variant.
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => DbError::QueryFailed(db_err.message().to_string()),
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("Pool is closed".to_string()),
            _ => DbError::Internal(err.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        DbError::Serialization(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;
