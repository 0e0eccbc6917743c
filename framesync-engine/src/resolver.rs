//! Active-source resolution with documented fallback.
//!
//! A broken pointer must never permanently stop scheduled syncing: when the
//! pointer is missing or names a source outside the registry, the run falls
//! back to `settings.default_source` (if registered) or the first enabled
//! registry entry.

use std::path::Path;

use framesync_core::pointer;
use framesync_core::types::{SourceDescriptor, SourceRegistry};
use framesync_core::Settings;

use crate::error::EngineError;

/// How the run's source was chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The active pointer resolved against the registry.
    Active(SourceDescriptor),
    /// Pointer unknown; the documented fallback was used.
    Fallback(SourceDescriptor),
}

impl Resolution {
    pub fn source(&self) -> &SourceDescriptor {
        match self {
            Resolution::Active(s) | Resolution::Fallback(s) => s,
        }
    }
}

/// Resolve the source for this run.
///
/// Errors only when no source is usable at all (empty registry, nothing
/// enabled) — that is a configuration problem, not a run failure.
pub fn resolve_or_default(
    root: &Path,
    registry: &SourceRegistry,
    settings: &Settings,
) -> Result<Resolution, EngineError> {
    if let Some(source) = pointer::resolve_at(root, registry)? {
        return Ok(Resolution::Active(source.clone()));
    }

    let fallback = settings
        .default_source
        .as_ref()
        .and_then(|id| registry.get(id))
        .or_else(|| registry.first_enabled())
        .ok_or_else(|| {
            EngineError::Configuration("no enabled source in the registry".into())
        })?;

    tracing::warn!(
        "active pointer unresolvable; falling back to source '{}'",
        fallback.id
    );
    Ok(Resolution::Fallback(fallback.clone()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
