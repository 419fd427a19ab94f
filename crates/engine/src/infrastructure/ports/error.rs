//! Error types for port operations.

use std::path::PathBuf;

use tavernkeep_domain::DecodeError;

/// Record store errors with enough context to act on.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A stored document exists but could not be decoded into a record.
    #[error("Cannot decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    /// The file is not valid JSON.
    #[error("Invalid JSON in {path}: {message}")]
    Json { path: PathBuf, message: String },

    /// Filesystem operation failed - includes operation name for tracing.
    #[error("IO error in {operation}: {source}")]
    Io {
        operation: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// Encoding a record failed.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    pub fn io(operation: &'static str, source: std::io::Error) -> Self {
        Self::Io { operation, source }
    }

    pub fn decode(path: impl Into<PathBuf>, source: DecodeError) -> Self {
        Self::Decode {
            path: path.into(),
            source,
        }
    }

    pub fn json(path: impl Into<PathBuf>, err: &serde_json::Error) -> Self {
        Self::Json {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

/// One document that `list` could not load. Listing carries on past it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Records that loaded plus the documents that did not.
#[derive(Debug, Clone, PartialEq)]
pub struct Listing<T> {
    pub records: Vec<T>,
    pub failures: Vec<LoadFailure>,
}

impl<T> Default for Listing<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            failures: Vec::new(),
        }
    }
}
