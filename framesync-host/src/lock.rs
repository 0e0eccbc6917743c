//! Exclusive run lock backed by `run/sync.lock`.
//!
//! A whole run holds the lock; release happens on drop even when the run
//! errors out. A second invocation (scheduled run racing a manual one) waits
//! through a short grace window and then gives up instead of interleaving
//! transfers and log writes.

use std::fs::{File, OpenOptions};
use std::path::Path;
use std::time::{Duration, Instant};

use fs2::FileExt;

use framesync_core::paths;

use crate::error::{io_err, HostError};

const RETRY_INTERVAL: Duration = Duration::from_millis(250);

/// Held for the duration of a run; automatically released when dropped.
#[derive(Debug)]
pub struct RunLock {
    _file: File,
}

impl RunLock {
    /// Try once, non-blocking.
    pub fn try_acquire_at(root: &Path) -> Result<Self, HostError> {
        let dir = paths::run_dir(root);
        if !dir.exists() {
            std::fs::create_dir_all(&dir).map_err(|e| io_err(&dir, e))?;
        }
        let path = paths::lock_path(root);
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|e| io_err(&path, e))?;

        file.try_lock_exclusive()
            .map_err(|_| HostError::LockBusy { path })?;

        Ok(Self { _file: file })
    }

    /// Keep trying for `grace` before reporting the lock busy.
    pub fn acquire_at(root: &Path, grace: Duration) -> Result<Self, HostError> {
        let deadline = Instant::now() + grace;
        loop {
            match Self::try_acquire_at(root) {
                Ok(lock) => return Ok(lock),
                Err(HostError::LockBusy { path }) => {
                    if Instant::now() >= deadline {
                        return Err(HostError::LockBusy { path });
                    }
                    tracing::debug!("run lock busy, retrying");
                    std::thread::sleep(RETRY_INTERVAL);
                }
                Err(err) => return Err(err),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
