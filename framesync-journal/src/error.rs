//! Error types for framesync-journal.

use std::path::PathBuf;

use thiserror::Error;

/// All errors that can arise from log and breaker-state operations.
#[derive(Debug, Error)]
pub enum JournalError {
    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization/deserialization error (breaker state file).
    #[error("breaker state JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience constructor for [`JournalError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> JournalError {
    JournalError::Io {
        path: path.into(),
        source,
    }
}
