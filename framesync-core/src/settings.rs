//! Run tunables loaded from `config/settings.yaml`.
//!
//! The file is optional: a missing file yields the defaults, and every field
//! is individually defaulted so a partial file stays valid across upgrades.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::paths;
use crate::types::SourceId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Transfer tool binary, resolved on $PATH at preflight.
    pub remote_tool: String,
    /// Refuse to sync when the remote lists fewer files than this.
    pub min_remote_files: usize,
    /// Bounded retry: total transfer attempts per run.
    pub sync_attempts: u32,
    /// Seconds between transfer attempts.
    pub retry_delay_secs: u64,
    /// Wall-clock bound on any single subprocess invocation.
    pub transfer_timeout_secs: u64,
    /// Viewer service unit restarted after a verified sync.
    pub service: String,
    /// Run `systemctl --user` rather than the system manager.
    pub service_user_mode: bool,
    /// Fallback source when the active pointer cannot be resolved.
    /// `None` falls back to the first enabled registry entry.
    pub default_source: Option<SourceId>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            remote_tool: "rclone".into(),
            min_remote_files: 50,
            sync_attempts: 3,
            retry_delay_secs: 30,
            transfer_timeout_secs: 600,
            service: "frameview.service".into(),
            service_user_mode: true,
            default_source: None,
        }
    }
}

/// Load settings from `<root>/config/settings.yaml`; defaults when absent.
pub fn load_at(root: &Path) -> Result<Settings, CoreError> {
    let path = paths::settings_path(root);
    if !path.exists() {
        return Ok(Settings::default());
    }
    let contents = std::fs::read_to_string(&path)?;
    serde_yaml::from_str(&contents).map_err(|e| CoreError::Parse { path, source: e })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
