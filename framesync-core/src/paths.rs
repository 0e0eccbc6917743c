use std::path::{Path, PathBuf};

pub const OUTCOME_LOG: &str = "frame_sync.log";
pub const SAFE_MODE_MARKER: &str = "safe_mode";
pub const ACTIVE_POINTER: &str = "active_source";
pub const CURRENT_LINK: &str = "current";
pub const BREAKER_STATE: &str = "breaker.json";
pub const RUN_LOCK: &str = "sync.lock";

pub fn framesync_root(home: &Path) -> PathBuf {
    home.join(".framesync")
}

pub fn config_dir(root: &Path) -> PathBuf {
    root.join("config")
}

pub fn sources_path(root: &Path) -> PathBuf {
    config_dir(root).join("sources.yaml")
}

pub fn settings_path(root: &Path) -> PathBuf {
    config_dir(root).join("settings.yaml")
}

pub fn state_dir(root: &Path) -> PathBuf {
    root.join("state")
}

pub fn pointer_path(root: &Path) -> PathBuf {
    state_dir(root).join(ACTIVE_POINTER)
}

pub fn current_link_path(root: &Path) -> PathBuf {
    state_dir(root).join(CURRENT_LINK)
}

pub fn breaker_path(root: &Path) -> PathBuf {
    state_dir(root).join(BREAKER_STATE)
}

pub fn marker_path(root: &Path) -> PathBuf {
    state_dir(root).join(SAFE_MODE_MARKER)
}

pub fn run_dir(root: &Path) -> PathBuf {
    root.join("run")
}

pub fn lock_path(root: &Path) -> PathBuf {
    run_dir(root).join(RUN_LOCK)
}

pub fn logs_dir(root: &Path) -> PathBuf {
    root.join("logs")
}

pub fn outcome_log_path(root: &Path) -> PathBuf {
    logs_dir(root).join(OUTCOME_LOG)
}
