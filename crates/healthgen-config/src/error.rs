//! Configuration error types

use thiserror::Error;

/// Configuration result type
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the settings file failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings could not be serialized or parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Settings were loaded but are not usable
    #[error("Validation error: {0}")]
    Validation(String),

    /// A required settings file does not exist
    #[error("Config file not found: {0}")]
    NotFound(String),

    /// The layered sources could not be merged or deserialized
    #[error("Config source error: {0}")]
    Source(#[from] config::ConfigError),
}
