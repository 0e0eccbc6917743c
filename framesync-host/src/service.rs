//! Viewer service control via `systemctl`.
//!
//! The appliance runs the viewer as a (usually user-mode) systemd unit.
//! Restart is confirmed with `is-active` afterwards; a unit that restarts
//! but never comes back active counts as a failed restart.

use std::time::Duration;

use crate::command::{run_with_timeout, CommandOutput};
use crate::error::HostError;

const SERVICE_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct SystemdUnit {
    name: String,
    user_mode: bool,
}

impl SystemdUnit {
    pub fn new(name: impl Into<String>, user_mode: bool) -> Self {
        Self {
            name: name.into(),
            user_mode,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `systemctl [--user] restart <unit>` followed by an `is-active` probe.
    pub fn restart(&self) -> Result<CommandOutput, HostError> {
        let args = systemctl_args(self.user_mode, "restart", &self.name);
        let out = run_with_timeout("systemctl", &args, SERVICE_TIMEOUT)?;
        if !out.success() {
            return Err(HostError::NonZeroExit {
                tool: "systemctl".into(),
                status: out.status,
                stderr: out.stderr.trim().to_string(),
            });
        }
        if !self.is_active()? {
            return Err(HostError::NonZeroExit {
                tool: "systemctl".into(),
                status: out.status,
                stderr: format!("{} did not become active after restart", self.name),
            });
        }
        Ok(out)
    }

    /// `systemctl [--user] is-active <unit>` — exit status only.
    pub fn is_active(&self) -> Result<bool, HostError> {
        let args = systemctl_args(self.user_mode, "is-active", &self.name);
        let out = run_with_timeout("systemctl", &args, SERVICE_TIMEOUT)?;
        Ok(out.success())
    }

    /// Short status string for operator views ("active", "inactive", …).
    pub fn status_text(&self) -> String {
        let args = systemctl_args(self.user_mode, "is-active", &self.name);
        match run_with_timeout("systemctl", &args, SERVICE_TIMEOUT) {
            Ok(out) => {
                let text = out.stdout.trim();
                if text.is_empty() {
                    out.stderr.trim().to_string()
                } else {
                    text.to_string()
                }
            }
            Err(_) => "unknown".into(),
        }
    }
}

pub(crate) fn systemctl_args(user_mode: bool, verb: &str, unit: &str) -> Vec<String> {
    let mut args = Vec::with_capacity(3);
    if user_mode {
        args.push("--user".to_string());
    }
    args.push(verb.to_string());
    args.push(unit.to_string());
    args
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
