//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid question source URL format")]
    InvalidSourceUrl,

    #[error("Question source timeout must be between 1 and 120 seconds")]
    InvalidTimeout,

    #[error("Fetch attempts must be at least 1")]
    InvalidFetchAttempts,

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),
}
