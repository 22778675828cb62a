//! Core error types for focusgrid-core.
//!
//! The timer itself never fails; errors come from caller mistakes
//! (bad arguments, unknown modes) and from the persistence boundary.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for focusgrid-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Caller passed a value outside the accepted domain.
    #[error("Invalid value for '{field}': {message}")]
    InvalidArgument { field: String, message: String },

    /// The session document could not be read or written.
    #[error("Session data unavailable at {path}: {message}")]
    PersistenceUnavailable { path: PathBuf, message: String },

    /// No mode is registered under the requested key.
    #[error("Unknown mode: '{0}'")]
    InvalidModeSelection(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    pub(crate) fn invalid_argument(field: &str, message: impl Into<String>) -> Self {
        CoreError::InvalidArgument {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn persistence(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        CoreError::PersistenceUnavailable {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Data directory could not be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
