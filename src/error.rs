use std::io;
use thiserror::Error;

/// Custom error type for levelcheck
#[derive(Error, Debug)]
pub enum LevelcheckError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid levels: {0}")]
    InvalidLevels(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Value store error: {0}")]
    ValueStore(String),
}

/// Result type alias for levelcheck
pub type Result<T> = std::result::Result<T, LevelcheckError>;

impl LevelcheckError {
    /// Create a config error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        LevelcheckError::Config(msg.into())
    }

    /// Create an invalid levels error
    pub fn invalid_levels<S: Into<String>>(msg: S) -> Self {
        LevelcheckError::InvalidLevels(msg.into())
    }

    pub fn invalid_parameter<S: Into<String>>(msg: S) -> Self {
        LevelcheckError::InvalidParameter(msg.into())
    }

    pub fn value_store<S: Into<String>>(msg: S) -> Self {
        LevelcheckError::ValueStore(msg.into())
    }
}
