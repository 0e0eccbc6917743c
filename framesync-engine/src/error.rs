//! Error types for framesync-engine.
//!
//! The variants mirror the run's failure taxonomy: configuration problems
//! abort before any state mutation; everything else is caught by the
//! pipeline and resolved into a single `ERROR` outcome record.

use thiserror::Error;

use framesync_core::CoreError;
use framesync_journal::JournalError;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Missing tool, unreadable config, no usable source. Fatal before the
    /// run starts; never recorded in the outcome log.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Another invocation holds the run lock; this one exits early.
    #[error("another sync run is already in progress")]
    LockBusy,

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Journal(#[from] JournalError),

    /// The remote listing/check could not be obtained.
    #[error("remote unavailable: {0}")]
    RemoteUnavailable(String),

    /// Remote lists fewer files than the configured floor; syncing would
    /// risk emptying the local mirror.
    #[error("remote lists {remote} files, below the safety floor of {floor}")]
    BelowFloor { remote: usize, floor: usize },

    /// A single transfer attempt failed (internal to the retry loop).
    #[error("transfer attempt failed: {0}")]
    Transfer(String),

    /// All transfer attempts exhausted.
    #[error("sync failed after {attempts} attempts: {last_error}")]
    Sync { attempts: u32, last_error: String },

    /// Post-sync verification still disagrees after a transfer.
    #[error("verification mismatch after transfer: {0}")]
    VerificationMismatch(String),

    /// The viewer service did not restart cleanly.
    #[error("viewer restart failed: {0}")]
    RestartFailed(String),

    /// Local mirror I/O failure (directory scan/creation).
    #[error("local mirror error at {path}: {source}")]
    LocalIo {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}
