//! Seams to the host tools.
//!
//! The pipeline is generic over these so the policy tests run against fakes;
//! the real implementations delegate to framesync-host and map its errors
//! into the engine taxonomy.

use std::path::Path;

use framesync_core::types::SourceDescriptor;
use framesync_host::{HostError, RcloneRemote, SystemdUnit};

use crate::error::EngineError;

/// The cloud store, as far as the orchestrator is concerned: list, mirror,
/// content-check. Output strings feed the run transcript and are never
/// parsed for control flow.
pub trait RemoteStore {
    fn count_files(&self, source: &SourceDescriptor) -> Result<usize, EngineError>;

    /// One-way mirror remote → local. Returns captured tool output.
    fn mirror(&self, source: &SourceDescriptor, local: &Path) -> Result<String, EngineError>;

    /// Content-equality check; `true` means remote and local agree.
    fn check(&self, source: &SourceDescriptor, local: &Path)
        -> Result<(bool, String), EngineError>;
}

/// The downstream viewer process.
pub trait ViewerService {
    fn restart(&self) -> Result<(), EngineError>;
}

impl RemoteStore for RcloneRemote {
    fn count_files(&self, source: &SourceDescriptor) -> Result<usize, EngineError> {
        RcloneRemote::count_files(self, source).map_err(remote_unavailable)
    }

    fn mirror(&self, source: &SourceDescriptor, local: &Path) -> Result<String, EngineError> {
        let out = RcloneRemote::mirror(self, source, local)
            .map_err(|e| EngineError::Transfer(e.to_string()))?;
        Ok(combine_output(&out.stdout, &out.stderr))
    }

    fn check(
        &self,
        source: &SourceDescriptor,
        local: &Path,
    ) -> Result<(bool, String), EngineError> {
        let (in_agreement, out) =
            RcloneRemote::check(self, source, local).map_err(remote_unavailable)?;
        Ok((in_agreement, combine_output(&out.stdout, &out.stderr)))
    }
}

impl ViewerService for SystemdUnit {
    fn restart(&self) -> Result<(), EngineError> {
        SystemdUnit::restart(self)
            .map(|_| ())
            .map_err(|e| EngineError::RestartFailed(e.to_string()))
    }
}

fn remote_unavailable(err: HostError) -> EngineError {
    EngineError::RemoteUnavailable(err.to_string())
}

/// Stdout then stderr, the way the transcript shows a tool invocation.
fn combine_output(stdout: &str, stderr: &str) -> String {
    match (stdout.is_empty(), stderr.is_empty()) {
        (true, true) => String::new(),
        (false, true) => stdout.to_string(),
        (true, false) => stderr.to_string(),
        (false, false) => format!("{stdout}\n{stderr}"),
    }
}
