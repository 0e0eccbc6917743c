//! Active-source pointer.
//!
//! The pointer is a one-line state file (`state/active_source`) holding the
//! id of the source currently in use. The `state/current` symlink to the
//! active local path is a derived view regenerated on every switch — external
//! consumers may follow it, but resolution here never reads it.

use std::path::{Path, PathBuf};

use crate::error::CoreError;
use crate::paths;
use crate::types::{SourceDescriptor, SourceId, SourceRegistry};

/// Read the pointer file. `Ok(None)` when the file is absent or empty.
pub fn read_at(root: &Path) -> Result<Option<SourceId>, CoreError> {
    let path = paths::pointer_path(root);
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(&path)?;
    let id = raw.trim();
    if id.is_empty() {
        return Ok(None);
    }
    Ok(Some(SourceId::from(id)))
}

/// Point at `source` and regenerate the `current` symlink.
///
/// The id must already be in the registry; callers go through
/// [`crate::registry::require`] first. Write flow mirrors the registry:
/// `.tmp` sibling → rename.
pub fn write_at(root: &Path, source: &SourceDescriptor) -> Result<(), CoreError> {
    let dir = paths::state_dir(root);
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
    }
    let path = paths::pointer_path(root);
    let tmp = path.with_file_name(format!("{}.tmp", paths::ACTIVE_POINTER));
    std::fs::write(&tmp, format!("{}\n", source.id))?;
    std::fs::rename(&tmp, &path)?;
    regenerate_link(root, &source.local_path)?;
    Ok(())
}

/// Resolve the pointer against the registry.
///
/// `Ok(None)` means Unknown: pointer missing, unreadable as an id, or naming
/// a source the registry does not contain. Callers fall back to a default
/// source on Unknown rather than abort.
pub fn resolve_at<'a>(
    root: &Path,
    registry: &'a SourceRegistry,
) -> Result<Option<&'a SourceDescriptor>, CoreError> {
    match read_at(root)? {
        Some(id) => Ok(registry.get(&id)),
        None => Ok(None),
    }
}

/// Recreate `state/current` → `local_path`. Best-effort derived view: an
/// existing link (or stale file) at the path is replaced.
#[cfg(unix)]
fn regenerate_link(root: &Path, local_path: &Path) -> Result<(), CoreError> {
    let link = paths::current_link_path(root);
    match std::fs::symlink_metadata(&link) {
        Ok(_) => std::fs::remove_file(&link)?,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => return Err(err.into()),
    }
    std::os::unix::fs::symlink(local_path, &link)?;
    Ok(())
}

#[cfg(not(unix))]
fn regenerate_link(_root: &Path, _local_path: &Path) -> Result<(), CoreError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
