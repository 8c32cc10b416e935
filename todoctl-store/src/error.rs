//! Error types for todoctl-store

use std::time::Duration;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    /// No row for the requested id, or the id can never exist (< 1)
    #[error("record not found")]
    RecordNotFound,

    /// The row exists but not at the version the caller read
    #[error("unable to update the record due to an edit conflict, please try again")]
    EditConflict,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// The per-call deadline expired before the database answered
    #[error("query did not complete within {0:?}")]
    Timeout(Duration),
}

/// Outcome categories callers branch on.
///
/// Not-found and conflict are business outcomes; everything else is an
/// internal failure and carries no further meaning for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    EditConflict,
    Unexpected,
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::RecordNotFound => ErrorKind::NotFound,
            Self::EditConflict => ErrorKind::EditConflict,
            Self::Database(_) | Self::Migrate(_) | Self::Timeout(_) => ErrorKind::Unexpected,
        }
    }
}
