//! Core error types for vocabflow-core.
//!
//! This module defines the error hierarchy using thiserror. Session errors are
//! kept separate from storage errors because they are raised by the pure
//! scheduling engine and never involve I/O.

use std::path::PathBuf;
use thiserror::Error;

use crate::session::{CardState, LearningMode};

/// Core error type for vocabflow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Learning session errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// A list id that is not present in the store
    #[error("List '{0}' not found")]
    ListNotFound(String),

    /// A word id that is not present in the given list
    #[error("Word '{word_id}' not found in list '{list_id}'")]
    WordNotFound { list_id: String, word_id: String },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
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

    /// Stored payload could not be decoded
    #[error("Corrupt row in '{table}': {message}")]
    CorruptRow { table: String, message: String },

    /// Database is locked
    #[error("Database is locked")]
    Locked,
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

    /// Data directory could not be resolved or created
    #[error("Failed to access data directory: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },

    /// Word with the same text already exists in the target list
    #[error("'{english}' is already in list '{list_id}'")]
    DuplicateWord { list_id: String, english: String },

    /// Backup bundle format version is not supported
    #[error("Unsupported backup version {found} (expected {expected})")]
    UnsupportedVersion { found: String, expected: String },
}

/// Errors raised by the learning session state machine.
///
/// None of these variants mutate the session: a rejected call leaves the
/// cursor, the card state, and the daily counter untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The requested action is not permitted in the current card state.
    #[error("'{action}' is not allowed while the card is in state {state:?}")]
    InvalidTransition {
        action: &'static str,
        state: CardState,
    },

    /// Every card of the queue has already been processed.
    #[error("The {mode} session is finished")]
    Finished { mode: LearningMode },

    /// The cursor no longer resolves to a card. The session must be abandoned.
    #[error("Corrupt session: cursor {cursor} does not resolve to a card (queue length {queue_len})")]
    CorruptSession { cursor: usize, queue_len: usize },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked
                    || err.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    DatabaseError::Locked
                } else {
                    DatabaseError::QueryFailed(err.to_string())
                }
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
