//! Error types for framesync-host.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// All errors that can arise from subprocess and lock operations.
#[derive(Debug, Error)]
pub enum HostError {
    /// The tool binary could not be found on $PATH.
    #[error("required tool '{tool}' not found on PATH")]
    ToolMissing { tool: String },

    /// Failed to spawn or communicate with a child process.
    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// The child exceeded its wall-clock bound and was killed.
    #[error("{tool} timed out after {timeout:?}")]
    Timeout { tool: String, timeout: Duration },

    /// The child exited non-zero; stderr tail carried along for the transcript.
    #[error("{tool} failed (status {status}): {stderr}")]
    NonZeroExit {
        tool: String,
        status: i32,
        stderr: String,
    },

    /// Another invocation holds the run lock.
    #[error("another sync run holds the lock at {path}")]
    LockBusy { path: PathBuf },

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience constructor for [`HostError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> HostError {
    HostError::Io {
        path: path.into(),
        source,
    }
}
