//! Timeout-bounded subprocess runner.
//!
//! Every external tool invocation goes through [`run_with_timeout`]: output
//! is captured on reader threads (so a chatty child cannot deadlock on a full
//! pipe), and the child is killed once the wall-clock deadline passes. Exit
//! status is reported, never interpreted — callers own that decision.

use std::io::Read;
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::HostError;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Captured result of a completed (non-timed-out) child.
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code; `-1` when terminated by a signal.
    pub status: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status == 0
    }
}

/// Resolve `tool` on $PATH, for preflight checks.
pub fn require_tool(tool: &str) -> Result<(), HostError> {
    which::which(tool)
        .map(|_| ())
        .map_err(|_| HostError::ToolMissing {
            tool: tool.to_string(),
        })
}

/// Run `program` with `args`, killing it after `timeout`.
///
/// A non-zero exit is NOT an error here; timeouts and spawn failures are.
pub fn run_with_timeout(
    program: &str,
    args: &[String],
    timeout: Duration,
) -> Result<CommandOutput, HostError> {
    let spawn_err = |source| HostError::Spawn {
        tool: program.to_string(),
        source,
    };

    tracing::debug!("exec: {} {}", program, args.join(" "));
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(spawn_err)?;

    let stdout_pipe = child.stdout.take();
    let stderr_pipe = child.stderr.take();
    let stdout_reader = thread::spawn(move || read_all(stdout_pipe));
    let stderr_reader = thread::spawn(move || read_all(stderr_pipe));

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait().map_err(spawn_err)? {
            Some(status) => break status,
            None if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                // Drain the readers so the threads do not leak.
                let _ = stdout_reader.join();
                let _ = stderr_reader.join();
                return Err(HostError::Timeout {
                    tool: program.to_string(),
                    timeout,
                });
            }
            None => thread::sleep(POLL_INTERVAL),
        }
    };

    let stdout = stdout_reader.join().unwrap_or_default();
    let stderr = stderr_reader.join().unwrap_or_default();

    Ok(CommandOutput {
        status: status.code().unwrap_or(-1),
        stdout,
        stderr,
    })
}

fn read_all(pipe: Option<impl Read>) -> String {
    let mut buf = String::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_string(&mut buf);
    }
    buf
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
