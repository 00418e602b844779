//! Error types for calwatch.

use thiserror::Error;

/// Errors that can occur during a calwatch run.
#[derive(Error, Debug)]
pub enum CalWatchError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Feed fetch failed: {0}")]
    Fetch(String),

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Notification delivery failed: {0}")]
    Delivery(String),

    #[error("State serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for calwatch operations.
pub type CalWatchResult<T> = Result<T, CalWatchError>;
