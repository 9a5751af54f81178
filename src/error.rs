//! Error taxonomy for the store: precondition, authentication, validation,
//! I/O, and internal invariant failures.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CellarError>;

#[derive(Debug, Error)]
pub enum CellarError {
    /// Key missing, key already exists, already-locked/not-locked, etc.
    #[error("{0}")]
    Precondition(String),

    /// Wrong password during `get`/`unlock`.
    #[error("wrong password")]
    Authentication,

    /// Unknown output format, invalid duration, non-database file, etc.
    #[error("{0}")]
    Validation(String),

    /// File create/open/copy errors during backup/restore/export/import.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Transient storage busy, surfaced only after the retry budget is spent.
    #[error("database is busy")]
    Busy,

    /// Programming error: an invariant that must always hold did not.
    #[error("internal invariant violated: {0}")]
    Internal(String),
}

impl CellarError {
    /// Maps the error to a stable process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            CellarError::Precondition(_) => 3,
            CellarError::Authentication => 4,
            CellarError::Validation(_) => 2,
            CellarError::Io(_) => 5,
            CellarError::Sqlite(_) => 5,
            CellarError::Busy => 5,
            CellarError::Internal(_) => 1,
        }
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        CellarError::Precondition(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        CellarError::Validation(msg.into())
    }
}
