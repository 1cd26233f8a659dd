//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Reasons a single log line is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected at least {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },

    #[error("invalid thread id: {0}")]
    InvalidThreadId(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("malformed event marker: {0}")]
    MalformedMarker(String),
}

/// Errors that stop a single file from being analyzed
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("could not open file {}: {source}", .path.display())]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed reading {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur during output rendering and file writes
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors that stop a single file from being converted
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("could not open file {}: {source}", .path.display())]
    InputOpenFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write {}: {source}", .path.display())]
    OutputFailed {
        path: PathBuf,
        #[source]
        source: OutputError,
    },

    #[error("I/O error converting {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
