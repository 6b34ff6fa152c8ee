//! Core error types for pomodori-core.
//!
//! Most failures in the engine are recovered locally (storage falls back to
//! defaults, notifications degrade to toasts). These types describe what went
//! wrong at the collaborator boundary so it can be logged before it is
//! swallowed, and so the CLI can report the few errors it does surface.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pomodori-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Key-value store errors
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Notification errors
    #[error("Notification error: {0}")]
    Notify(#[from] NotifyError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by a key-value backend.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the backing database
    #[error("Failed to open store at {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query or write against the backend failed
    #[error("Backend failure: {0}")]
    Backend(#[from] rusqlite::Error),

    /// Backend refused the write (quota, read-only, private mode)
    #[error("Write rejected for key '{key}'")]
    WriteRejected { key: String },

    /// Value could not be encoded
    #[error("Encoding failed: {0}")]
    Encode(#[from] serde_json::Error),

    /// Filesystem failure while preparing the store
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
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

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Notification delivery errors.
#[derive(Error, Debug)]
pub enum NotifyError {
    /// Host has no notification facility
    #[error("notifications are not supported on this host")]
    Unsupported,

    /// Asking the user for permission failed
    #[error("permission request failed: {0}")]
    PermissionRequest(String),

    /// Notification could not be shown
    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
