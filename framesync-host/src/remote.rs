//! Remote client — a thin wrapper over the system `rclone`.
//!
//! Implementing a transfer/diff protocol is out of scope; like the rest of
//! the appliance tooling this re-executes the system binary and works from
//! exit status plus captured output. Argument building and output parsing
//! are separate pure functions so they stay testable without the binary.

use std::path::Path;
use std::time::Duration;

use framesync_core::types::SourceDescriptor;

use crate::command::{run_with_timeout, CommandOutput};
use crate::error::HostError;

/// `rclone` with a fixed per-invocation wall-clock bound.
#[derive(Debug, Clone)]
pub struct RcloneRemote {
    binary: String,
    timeout: Duration,
}

impl RcloneRemote {
    pub fn new(binary: impl Into<String>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    /// Count files on the remote. Any client failure is `RemoteUnavailable`
    /// territory for the caller; here it surfaces as `NonZeroExit`.
    pub fn count_files(&self, source: &SourceDescriptor) -> Result<usize, HostError> {
        let args = list_args(&source.remote);
        let out = self.exec(&args)?;
        if !out.success() {
            return Err(non_zero(&self.binary, &out));
        }
        Ok(count_listing(&out.stdout))
    }

    /// One-way mirror transfer, remote → local. Returns the captured output
    /// for the run transcript; exit status is the only thing interpreted.
    pub fn mirror(
        &self,
        source: &SourceDescriptor,
        local: &Path,
    ) -> Result<CommandOutput, HostError> {
        let args = mirror_args(&source.remote, local);
        let out = self.exec(&args)?;
        if !out.success() {
            return Err(non_zero(&self.binary, &out));
        }
        Ok(out)
    }

    /// Content-equality check. `Ok(true)` means remote and local agree;
    /// a non-zero exit is reported as disagreement, not an error, because
    /// the tool uses it for "files differ".
    pub fn check(
        &self,
        source: &SourceDescriptor,
        local: &Path,
    ) -> Result<(bool, CommandOutput), HostError> {
        let args = check_args(&source.remote, local);
        let out = self.exec(&args)?;
        let in_agreement = out.success();
        Ok((in_agreement, out))
    }

    fn exec(&self, args: &[String]) -> Result<CommandOutput, HostError> {
        run_with_timeout(&self.binary, args, self.timeout)
    }
}

fn non_zero(tool: &str, out: &CommandOutput) -> HostError {
    HostError::NonZeroExit {
        tool: tool.to_string(),
        status: out.status,
        stderr: out.stderr.trim().to_string(),
    }
}

// ---------------------------------------------------------------------------
// Pure argument builders / parsers
// ---------------------------------------------------------------------------

pub(crate) fn list_args(remote: &str) -> Vec<String> {
    vec![
        "lsf".into(),
        remote.into(),
        "--files-only".into(),
        "--recursive".into(),
    ]
}

pub(crate) fn mirror_args(remote: &str, local: &Path) -> Vec<String> {
    vec![
        "sync".into(),
        remote.into(),
        local.display().to_string(),
        "--verbose".into(),
    ]
}

pub(crate) fn check_args(remote: &str, local: &Path) -> Vec<String> {
    vec!["check".into(), remote.into(), local.display().to_string()]
}

/// One file per non-empty line of `lsf` output.
pub(crate) fn count_listing(stdout: &str) -> usize {
    stdout.lines().filter(|line| !line.trim().is_empty()).count()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
