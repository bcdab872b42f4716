//! Error types for storygraph-jsonl operations.

use std::io;
use thiserror::Error;

/// The error type for storygraph-jsonl operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred while reading or writing.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A line could not be parsed as JSON.
    ///
    /// Carries the 1-based line number so callers can report or skip the
    /// offending line and keep reading.
    #[error("line {line}: {source}")]
    Parse {
        /// The 1-based line number where parsing failed.
        line: usize,
        /// The underlying JSON parse error.
        source: serde_json::Error,
    },
}

impl Error {
    /// Returns the 1-based line number for parse errors, `None` otherwise.
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Parse { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// A specialized Result type for storygraph-jsonl operations.
pub type Result<T> = std::result::Result<T, Error>;
