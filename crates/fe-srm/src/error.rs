//! Storage error taxonomy
//!
//! Constraint violations are classified from the driver's typed error
//! kind, never by matching error message text.

use thiserror::Error;

/// Errors surfaced by the mapping engine
#[derive(Error, Debug)]
pub enum SrmError {
    /// A query expected to return a row returned none.
    #[error("no rows returned")]
    NotFound,

    #[error("unique constraint violation: {0}")]
    UniqueViolation(String),

    #[error("foreign key violation: {0}")]
    ForeignKeyViolation(String),

    #[error("storage error: {0}")]
    Storage(sqlx::Error),

    #[error("unsupported database backend: {0}")]
    UnsupportedBackend(String),
}

/// Map a driver error onto the taxonomy above.
pub(crate) fn classify(err: sqlx::Error) -> SrmError {
    match err {
        sqlx::Error::RowNotFound => SrmError::NotFound,
        sqlx::Error::Database(db) => match db.kind() {
            sqlx::error::ErrorKind::UniqueViolation => {
                SrmError::UniqueViolation(db.message().to_string())
            },
            sqlx::error::ErrorKind::ForeignKeyViolation => {
                SrmError::ForeignKeyViolation(db.message().to_string())
            },
            _ => SrmError::Storage(sqlx::Error::Database(db)),
        },
        other => SrmError::Storage(other),
    }
}
