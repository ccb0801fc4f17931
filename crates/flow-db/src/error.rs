//! # Storage Errors
//!
//! ```text
//!   sqlx::Error ──────┐
//!   MigrateError ─────┼──► DbError ──► ApiError (terminal)
//!   serde_json::Error ┘
//! ```
//!
//! Callers mostly care whether storage is reachable at all
//! ([`DbError::Unavailable`]) or whether a stored document is unusable
//! ([`DbError::Serialization`]); everything SQLite reports beyond that
//! lands in [`DbError::Sqlite`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// A lookup by id found nothing.
    #[error("No {entity} with id '{id}'")]
    NotFound { entity: &'static str, id: String },

    /// The database could not be opened, or the pool is closed or busy.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Schema migration failed: {0}")]
    Migration(String),

    #[error("SQLite error: {0}")]
    Sqlite(String),

    /// A stored JSON document does not match the record type it should hold,
    /// usually because someone edited `pos_orders` or `pos_products` by hand.
    #[error("Stored document is invalid: {0}")]
    Serialization(String),

    /// A record was refused before anything was written.
    #[error("Refused to store record: {0}")]
    InvalidRecord(String),
}

impl DbError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolClosed => DbError::Unavailable("storage is closed".to_string()),
            sqlx::Error::PoolTimedOut => {
                DbError::Unavailable("timed out waiting for a connection".to_string())
            }
            sqlx::Error::Io(e) => DbError::Unavailable(e.to_string()),
            sqlx::Error::Database(e) => DbError::Sqlite(e.message().to_string()),
            other => DbError::Sqlite(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::Migration(err.to_string())
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        DbError::Serialization(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;
