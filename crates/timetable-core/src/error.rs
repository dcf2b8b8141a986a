//! Core error types for timetable-core.
//!
//! User-facing rejections (duplicate, same subject, time conflict, unknown
//! offering) are not errors: they are returned as [`crate::AddOutcome`]
//! values. The types here cover storage, configuration, catalog transport
//! and ingestion validation.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for timetable-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog source errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// SQLite storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
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

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
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
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Failures while fetching the offering catalog from its remote owner.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Transport failure (DNS, connect, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The catalog server answered with a non-success status
    #[error("Catalog server returned HTTP {status}: {body}")]
    Server { status: u16, body: String },

    /// The response body was not a catalog payload
    #[error("Malformed catalog payload: {0}")]
    Decode(String),

    /// The configured base URL cannot be used
    #[error("Invalid catalog URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
}

/// Validation errors raised when records enter the system.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Slot label does not follow `<startHour>-<endHour>`
    #[error("Malformed slot label '{0}': expected \"<startHour>-<endHour>\"")]
    MalformedSlot(String),

    /// Slot label parses but does not describe a forward interval
    #[error("Slot label '{label}' normalizes to {start}:00-{end}:00, which is not a forward interval")]
    EmptySlot { label: String, start: u8, end: u8 },

    /// Unknown weekday name
    #[error("Unknown weekday '{0}' (expected Monday..Saturday)")]
    UnknownWeekday(String),

    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Two catalog records share an id
    #[error("Duplicate uniqueId '{0}' in catalog")]
    DuplicateId(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Storage(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
