//! Source registry persistence.
//!
//! # Storage layout
//!
//! ```text
//! ~/.framesync/
//!   config/
//!     sources.yaml    (ordered source list — mode 0600)
//! ```
//!
//! # API pattern
//!
//! Every function has two forms:
//! - `fn_at(root: &Path, …)` — explicit root; used in tests with `TempDir`
//! - `fn(…)` — derives root from `dirs::home_dir()`, delegates to `_at`
//!
//! Tests must NEVER call the no-arg wrappers; always use `_at`.

use std::path::{Path, PathBuf};

use crate::error::CoreError;
use crate::paths;
use crate::types::{SourceDescriptor, SourceId, SourceRegistry};

/// Load the source registry from `<root>/config/sources.yaml`.
///
/// Returns `CoreError::RegistryNotFound` if absent,
/// `CoreError::Parse` (with path + line context) if malformed YAML.
pub fn load_at(root: &Path) -> Result<SourceRegistry, CoreError> {
    let path = paths::sources_path(root);
    if !path.exists() {
        return Err(CoreError::RegistryNotFound { path });
    }
    let contents = std::fs::read_to_string(&path)?;
    serde_yaml::from_str(&contents).map_err(|e| CoreError::Parse { path, source: e })
}

/// `load_at` convenience wrapper.
pub fn load() -> Result<SourceRegistry, CoreError> {
    load_at(&root()?)
}

/// Atomically save the registry to `<root>/config/sources.yaml`.
///
/// Write flow: serialize → `.yaml.tmp` sibling → `chmod 0600` → `rename`.
/// `.tmp` is always in the same directory as the target (same filesystem).
pub fn save_at(root: &Path, registry: &SourceRegistry) -> Result<(), CoreError> {
    let path = paths::sources_path(root);
    let dir = paths::config_dir(root);
    if !dir.exists() {
        std::fs::create_dir_all(&dir)?;
        set_dir_permissions(&dir)?;
    }
    let tmp = path.with_file_name("sources.yaml.tmp");
    let yaml = serde_yaml::to_string(registry)?;
    std::fs::write(&tmp, yaml)?;
    set_file_permissions(&tmp)?;
    std::fs::rename(&tmp, &path)?;
    Ok(())
}

/// `save_at` convenience wrapper.
pub fn save(registry: &SourceRegistry) -> Result<(), CoreError> {
    save_at(&root()?, registry)
}

/// Look up `id` in the registry, erroring with `UnknownSource` when absent.
pub fn require<'a>(
    registry: &'a SourceRegistry,
    id: &SourceId,
) -> Result<&'a SourceDescriptor, CoreError> {
    registry
        .get(id)
        .ok_or_else(|| CoreError::UnknownSource { id: id.0.clone() })
}

fn root() -> Result<PathBuf, CoreError> {
    let home = dirs::home_dir().ok_or(CoreError::HomeNotFound)?;
    Ok(paths::framesync_root(&home))
}

#[cfg(unix)]
fn set_dir_permissions(path: &Path) -> Result<(), CoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o700))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_dir_permissions(_path: &Path) -> Result<(), CoreError> {
    Ok(())
}

#[cfg(unix)]
fn set_file_permissions(path: &Path) -> Result<(), CoreError> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    Ok(())
}
#[cfg(not(unix))]
fn set_file_permissions(_path: &Path) -> Result<(), CoreError> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
