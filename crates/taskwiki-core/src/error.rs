//! Core error types for taskwiki-core.
//!
//! Every fallible operation in the engine returns an explicit error
//! instead of panicking: I/O failures are surfaced to the caller as-is,
//! and mutation preconditions (stale parse, out-of-range line index) are
//! checked before any line is touched.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for taskwiki-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Failed to read or write a node document.
    #[error("IO error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The document changed since the task was parsed; the caller must
    /// re-parse before mutating.
    #[error("task at line {line} no longer matches the parsed snapshot")]
    StaleTask { line: usize },

    /// A line edit referenced an index past the end of the document.
    #[error("line {index} out of bounds (document has {len} lines)")]
    LineOutOfBounds { index: usize, len: usize },

    /// Two nodes in the wiki tree resolved to the same ID.
    #[error("colliding node id '{id}': {first} and {second}")]
    NodeCollision {
        id: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// A node lookup by ID or path found nothing.
    #[error("node not found: {0}")]
    NodeNotFound(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration.
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration.
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration.
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Missing required configuration key.
    #[error("Missing required configuration key: {0}")]
    MissingKey(String),
}

impl CoreError {
    /// Wrap an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoreError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type alias for CoreError.
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
