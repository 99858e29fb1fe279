//! Error types for habitrail-core

use thiserror::Error;

/// Main error type for the habitrail-core library
#[derive(Error, Debug)]
pub enum Error {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// A stored date string was not a valid `YYYY-MM-DD` calendar date
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// Habit not found
    #[error("habit not found: {0}")]
    HabitNotFound(String),

    /// Share code not found
    #[error("share not found: {0}")]
    ShareNotFound(String),

    /// Share code has expired
    #[error("share expired: {0}")]
    ShareExpired(String),
}

/// Result type alias for habitrail-core
pub type Result<T> = std::result::Result<T, Error>;
