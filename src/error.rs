//! Error handling utilities shared across the crate.

use std::path::PathBuf;

use thiserror::Error;

/// Convenient result type used throughout the crate.
pub type Result<T, E = SlicesError> = std::result::Result<T, E>;

/// Domain-specific error describing failures during configuration, IO, or persistence.
///
/// Unknown tokens, unknown ids and unrecognised characters are never errors; they are
/// absorbed by the unknown-token fallback and the segmenter's skip policy.
#[derive(Debug, Error)]
pub enum SlicesError {
    /// Training or ingest configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Filesystem IO error with optional context path.
    #[error("io error while processing {path:?}: {source}")]
    Io {
        /// Underlying IO error returned by the standard library.
        source: std::io::Error,
        /// Target path associated with the IO failure if available.
        path: Option<PathBuf>,
    },
    /// Failure while producing a persisted record.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// A persisted record was malformed, incomplete, or violated vocabulary invariants.
    #[error("invalid tokenizer record: {0}")]
    InvalidRecord(String),
    /// Catch-all variant for invariants that should not occur.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for SlicesError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl SlicesError {
    /// Helper constructor that attaches an optional path when wrapping IO errors.
    pub fn io(source: std::io::Error, path: Option<PathBuf>) -> Self {
        Self::Io { source, path }
    }

    /// Wraps a JSON decoding failure as an [`SlicesError::InvalidRecord`].
    pub fn record(err: &serde_json::Error) -> Self {
        Self::InvalidRecord(err.to_string())
    }
}
