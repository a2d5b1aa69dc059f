use thiserror::Error;

/// Errors that can occur within the scheduling subsystem.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Caller input rejected by `schedule`. Nothing is persisted.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Underlying SQLite / rusqlite error. Fatal for the current tick.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A non-SQLite post store failed. Fatal for the current tick.
    #[error("Storage failure: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, SchedulerError>;
