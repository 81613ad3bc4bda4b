//! Core error types for ergon-core.
//!
//! The timer engine itself never fails. Errors only come from the
//! boundaries: the key/value storage, the TOML configuration file and
//! user-supplied values such as the daily summary time.

use std::path::PathBuf;
use thiserror::Error;

/// Key/value storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the backing database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// In-process store lock was poisoned by a panicking writer
    #[error("Storage lock poisoned")]
    Poisoned,

    /// Data directory could not be resolved or created
    #[error("Failed to access data directory: {0}")]
    DataDir(#[from] std::io::Error),

    /// Snapshot could not be encoded
    #[error("Failed to encode snapshot for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
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

    /// Unknown dot-path key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Time of day not in 24h `HH:mm` form
    #[error("Invalid time of day '{0}': expected HH:mm")]
    InvalidTimeOfDay(String),

    /// Unknown enum-like value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, _msg)
                if code.code == rusqlite::ErrorCode::DatabaseLocked =>
            {
                StorageError::Locked
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locked_sqlite_maps_to_locked() {
        let err = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
            None,
        );
        let err: StorageError = err.into();
        assert!(matches!(err, StorageError::Locked));
        assert_eq!(err.to_string(), "Database is locked");
    }

    #[test]
    fn validation_error_message_names_input() {
        let err = ValidationError::InvalidTimeOfDay("25:99".into());
        assert!(err.to_string().contains("25:99"));
    }
}
