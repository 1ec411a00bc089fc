//! Error types for daygrid.

use thiserror::Error;

/// Errors that can occur in daygrid operations.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid anchor date '{0}'. Expected YYYY-MM-DD")]
    InvalidAnchor(String),

    #[error("Invalid grid config: {0}")]
    InvalidGridConfig(String),

    #[error("Invalid timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("Unknown window kind '{0}'. Expected day, week or month")]
    UnknownWindowKind(String),

    #[error("Unknown timezone '{0}'")]
    UnknownTimezone(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for daygrid operations.
pub type CoreResult<T> = Result<T, CoreError>;
