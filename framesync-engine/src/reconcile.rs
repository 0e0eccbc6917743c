//! Count reconciliation — the cheap pre-check before any transfer.

use std::path::Path;

use framesync_core::types::{Counts, SourceDescriptor};

use crate::error::EngineError;
use crate::traits::RemoteStore;

/// Result of comparing remote and local counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reconciliation {
    pub counts: Counts,
    pub needs_sync: bool,
}

/// Compare remote and local counts, enforcing the safety floor.
///
/// `remote_count < floor` refuses to proceed regardless of the local count:
/// an empty or misconfigured remote must not silently empty the local
/// mirror. The local directory is created if absent.
pub fn reconcile(
    remote: &impl RemoteStore,
    source: &SourceDescriptor,
    floor: usize,
) -> Result<Reconciliation, EngineError> {
    let remote_count = remote.count_files(source)?;
    if remote_count < floor {
        return Err(EngineError::BelowFloor {
            remote: remote_count,
            floor,
        });
    }

    let local_count = local_count(&source.local_path)?;
    let counts = Counts {
        remote: remote_count,
        local: local_count,
    };
    Ok(Reconciliation {
        counts,
        needs_sync: !counts.matched(),
    })
}

/// Count regular files under `dir` recursively, creating it first if absent.
pub fn local_count(dir: &Path) -> Result<usize, EngineError> {
    let local_io = |path: &Path, source| EngineError::LocalIo {
        path: path.to_path_buf(),
        source,
    };

    if !dir.exists() {
        std::fs::create_dir_all(dir).map_err(|e| local_io(dir, e))?;
        return Ok(0);
    }

    // Iterative walk; no recursion depth to worry about on big libraries.
    let mut pending = vec![dir.to_path_buf()];
    let mut count = 0usize;
    while let Some(current) = pending.pop() {
        let entries = std::fs::read_dir(&current).map_err(|e| local_io(&current, e))?;
        for entry in entries {
            let entry = entry.map_err(|e| local_io(&current, e))?;
            let ty = entry.file_type().map_err(|e| local_io(&entry.path(), e))?;
            if ty.is_dir() {
                pending.push(entry.path());
            } else if ty.is_file() {
                count += 1;
            }
            // Symlinks are not mirrored content; skip them.
        }
    }
    Ok(count)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
