//! End-to-end policy tests for the run pipeline, driven through fake
//! host seams against a real journal/breaker/lock in a temp root.

use std::cell::{Cell, RefCell};
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use framesync_core::types::{
    RunMode, RunToken, SourceDescriptor, SourceId, SourceRegistry,
};
use framesync_core::{paths, Settings};
use framesync_engine::pipeline::{execute, RunRequest};
use framesync_engine::{EngineError, RemoteStore, RestartOutcome, ViewerService};
use framesync_journal::breaker::{
    self, marker_present_at, write_marker_at, Breaker, BreakerState, STREAK_LEN,
};

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

struct FakeRemote {
    remote_count: usize,
    /// Mirror attempt outcomes, consumed front-first; empty = always succeed.
    mirror_failures: RefCell<Vec<String>>,
    mirror_calls: Cell<u32>,
    count_calls: Cell<u32>,
}

impl FakeRemote {
    fn listing(remote_count: usize) -> Self {
        Self {
            remote_count,
            mirror_failures: RefCell::new(Vec::new()),
            mirror_calls: Cell::new(0),
            count_calls: Cell::new(0),
        }
    }

    fn failing_transfers(remote_count: usize, failures: &[&str]) -> Self {
        let fake = Self::listing(remote_count);
        *fake.mirror_failures.borrow_mut() =
            failures.iter().map(|s| s.to_string()).collect();
        fake
    }
}

impl RemoteStore for FakeRemote {
    fn count_files(&self, _: &SourceDescriptor) -> Result<usize, EngineError> {
        self.count_calls.set(self.count_calls.get() + 1);
        Ok(self.remote_count)
    }

    fn mirror(&self, _: &SourceDescriptor, local: &Path) -> Result<String, EngineError> {
        self.mirror_calls.set(self.mirror_calls.get() + 1);
        let mut failures = self.mirror_failures.borrow_mut();
        if !failures.is_empty() {
            return Err(EngineError::Transfer(failures.remove(0)));
        }
        std::fs::create_dir_all(local).unwrap();
        // Make local agree with the remote listing.
        for entry in std::fs::read_dir(local).unwrap() {
            let entry = entry.unwrap();
            std::fs::remove_file(entry.path()).unwrap();
        }
        for n in 0..self.remote_count {
            std::fs::write(local.join(format!("photo_{n:04}.jpg")), b"jpeg").unwrap();
        }
        Ok("transfer complete".into())
    }

    fn check(&self, _: &SourceDescriptor, local: &Path) -> Result<(bool, String), EngineError> {
        let local_files = if local.exists() {
            std::fs::read_dir(local).unwrap().count()
        } else {
            0
        };
        let agree = local_files == self.remote_count;
        Ok((agree, format!("check: {local_files} vs {}", self.remote_count)))
    }
}

struct FakeService {
    ok: bool,
    calls: Cell<u32>,
}

impl FakeService {
    fn healthy() -> Self {
        Self {
            ok: true,
            calls: Cell::new(0),
        }
    }

    fn broken() -> Self {
        Self {
            ok: false,
            calls: Cell::new(0),
        }
    }
}

impl ViewerService for FakeService {
    fn restart(&self) -> Result<(), EngineError> {
        self.calls.set(self.calls.get() + 1);
        if self.ok {
            Ok(())
        } else {
            Err(EngineError::RestartFailed("unit failed to start".into()))
        }
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

struct Harness {
    root: TempDir,
    registry: SourceRegistry,
    settings: Settings,
}

impl Harness {
    fn new() -> Self {
        let root = TempDir::new().expect("temp root");
        let mirror = root.path().join("mirror");
        let registry = SourceRegistry {
            version: 1,
            sources: vec![SourceDescriptor {
                id: SourceId::from("kfr"),
                label: "Koofr (kfr_frame)".into(),
                local_path: mirror,
                remote: "kfr_frame:frame".into(),
                enabled: true,
            }],
        };
        let settings = Settings {
            min_remote_files: 50,
            retry_delay_secs: 0,
            ..Settings::default()
        };
        Self {
            root,
            registry,
            settings,
        }
    }

    fn mirror_dir(&self) -> PathBuf {
        self.registry.sources[0].local_path.clone()
    }

    fn seed_local(&self, count: usize) {
        let dir = self.mirror_dir();
        std::fs::create_dir_all(&dir).unwrap();
        for n in 0..count {
            std::fs::write(dir.join(format!("photo_{n:04}.jpg")), b"jpeg").unwrap();
        }
    }

    fn seed_ring(&self, tokens: &[RunToken]) {
        let mut b = Breaker::default();
        for token in tokens {
            b.record(self.root.path(), *token).unwrap();
        }
    }

    fn run(&self, remote: &FakeRemote, service: &FakeService) -> framesync_engine::RunReport {
        self.run_mode(remote, service, RunMode::Quick, false, "unused")
    }

    fn run_mode(
        &self,
        remote: &FakeRemote,
        service: &FakeService,
        mode: RunMode,
        interactive: bool,
        answer: &str,
    ) -> framesync_engine::RunReport {
        let request = RunRequest {
            root: self.root.path(),
            settings: &self.settings,
            registry: &self.registry,
            mode,
            interactive,
        };
        let mut ask = |_prompt: &str| Ok(format!("{answer}\n"));
        execute(&request, remote, service, &mut ask).expect("pipeline")
    }

    fn log_lines(&self) -> Vec<String> {
        let path = paths::outcome_log_path(self.root.path());
        if !path.exists() {
            return Vec::new();
        }
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| l.to_string())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// §8 properties
// ---------------------------------------------------------------------------

#[test]
fn matching_counts_are_ok_with_no_transfer() {
    let h = Harness::new();
    h.seed_local(120);
    let remote = FakeRemote::listing(120);
    let service = FakeService::healthy();

    let report = h.run(&remote, &service);

    assert_eq!(report.token, RunToken::Ok);
    assert_eq!(report.exit_code(), 0);
    assert_eq!(remote.mirror_calls.get(), 0, "no transfer invoked");
    assert_eq!(service.calls.get(), 0);
}

#[test]
fn idempotence_second_run_never_restarts() {
    let h = Harness::new();
    h.seed_local(0);
    let remote = FakeRemote::listing(120);
    let service = FakeService::healthy();

    let first = h.run(&remote, &service);
    assert_eq!(first.token, RunToken::Restart);

    let second = h.run(&remote, &service);
    assert_eq!(second.token, RunToken::Ok);
    assert_eq!(service.calls.get(), 1, "only the first run restarts");
}

#[test]
fn changed_remote_syncs_verifies_and_restarts() {
    let h = Harness::new();
    h.seed_local(120);
    let remote = FakeRemote::listing(125);
    let service = FakeService::healthy();

    let report = h.run(&remote, &service);

    assert_eq!(report.token, RunToken::Restart);
    assert_eq!(report.exit_code(), 0);
    assert!(report.synced);
    assert_eq!(report.restart, RestartOutcome::Succeeded);
    let counts = report.counts.expect("counts");
    assert_eq!((counts.remote, counts.local), (125, 125));
    assert!(report.message.contains("restarted successfully"));
}

#[test]
fn below_floor_refuses_and_records_error() {
    let h = Harness::new();
    h.seed_local(120);
    let remote = FakeRemote::listing(0);
    let service = FakeService::healthy();

    let report = h.run(&remote, &service);

    assert_eq!(report.token, RunToken::Error);
    assert_eq!(report.exit_code(), 1);
    assert_eq!(remote.mirror_calls.get(), 0, "sync never attempted");
    // Local mirror untouched.
    assert_eq!(std::fs::read_dir(h.mirror_dir()).unwrap().count(), 120);
    assert!(h.log_lines()[0].contains("SYNC_RESULT: ERROR"));
}

#[test]
fn breaker_trip_suppresses_restart_after_three_restarts() {
    let h = Harness::new();
    h.seed_ring(&[RunToken::Restart; STREAK_LEN]);
    h.seed_local(120);
    let remote = FakeRemote::listing(125);
    let service = FakeService::healthy();

    let report = h.run(&remote, &service);

    assert_ne!(report.token, RunToken::Restart, "token must differ");
    assert_eq!(report.token, RunToken::Ok);
    assert!(report.synced, "the tripped run still syncs");
    assert_eq!(report.restart, RestartOutcome::Suppressed);
    assert_eq!(service.calls.get(), 0);
    assert!(marker_present_at(h.root.path()), "trip writes the marker");
}

#[test]
fn breaker_does_not_trip_on_broken_streak() {
    let h = Harness::new();
    h.seed_ring(&[RunToken::Ok, RunToken::Restart, RunToken::Restart]);
    h.seed_local(120);
    let remote = FakeRemote::listing(125);
    let service = FakeService::healthy();

    let report = h.run(&remote, &service);

    assert_eq!(report.token, RunToken::Restart);
    assert_eq!(service.calls.get(), 1);
    assert!(!marker_present_at(h.root.path()));
}

#[test]
fn tripped_run_breaks_its_own_streak() {
    let h = Harness::new();
    h.seed_ring(&[RunToken::Restart; STREAK_LEN]);
    h.seed_local(120);
    let remote = FakeRemote::listing(125);
    let service = FakeService::healthy();

    let _suppressed = h.run(&remote, &service);

    let loaded = Breaker::load_at(h.root.path()).unwrap();
    assert!(
        !loaded.restart_streak(),
        "recording OK must prevent perpetual re-trips"
    );
}

#[test]
fn non_interactive_skip_with_marker_present() {
    let h = Harness::new();
    write_marker_at(h.root.path(), "operator disabled").unwrap();
    let remote = FakeRemote::listing(125);
    let service = FakeService::healthy();

    let report = h.run_mode(&remote, &service, RunMode::Quick, false, "unused");

    assert_eq!(report.token, RunToken::Ok);
    assert_eq!(report.exit_code(), 0);
    assert_eq!(remote.count_calls.get(), 0, "no remote listing");
    assert_eq!(remote.mirror_calls.get(), 0, "no sync");
    assert_eq!(service.calls.get(), 0, "no restart");

    let lines = h.log_lines();
    assert_eq!(lines.len(), 1, "exactly one outcome recorded");
    assert!(lines[0].contains("SYNC_RESULT: OK"));
    assert!(marker_present_at(h.root.path()));
}

#[test]
fn interactive_override_clears_marker_and_proceeds() {
    let h = Harness::new();
    write_marker_at(h.root.path(), "operator disabled").unwrap();
    h.seed_local(120);
    let remote = FakeRemote::listing(120);
    let service = FakeService::healthy();

    let report = h.run_mode(&remote, &service, RunMode::Quick, true, "yes");

    assert!(!marker_present_at(h.root.path()), "override removes marker");
    assert_eq!(report.token, RunToken::Ok);
    assert!(report.message.contains("counts match"));

    let lines = h.log_lines();
    assert_eq!(lines.len(), 1, "the run itself records; no pre-record");
}

#[test]
fn interactive_decline_skips_and_keeps_marker() {
    let h = Harness::new();
    write_marker_at(h.root.path(), "operator disabled").unwrap();
    let remote = FakeRemote::listing(120);
    let service = FakeService::healthy();

    let report = h.run_mode(&remote, &service, RunMode::Quick, true, "n");

    assert_eq!(report.token, RunToken::Ok);
    assert!(marker_present_at(h.root.path()));
    assert_eq!(remote.count_calls.get(), 0);
}

#[test]
fn stale_pointer_falls_back_to_default_source() {
    let h = Harness::new();
    std::fs::create_dir_all(paths::state_dir(h.root.path())).unwrap();
    std::fs::write(paths::pointer_path(h.root.path()), "removed-source\n").unwrap();
    h.seed_local(120);
    let remote = FakeRemote::listing(120);
    let service = FakeService::healthy();

    let report = h.run(&remote, &service);

    assert_eq!(report.token, RunToken::Ok, "run completes on the fallback");
    assert_eq!(remote.count_calls.get(), 1);
}

#[test]
fn exhausted_retries_record_error_without_restart() {
    let h = Harness::new();
    h.seed_local(100);
    let remote =
        FakeRemote::failing_transfers(125, &["timeout", "timeout", "connection reset"]);
    let service = FakeService::healthy();

    let report = h.run(&remote, &service);

    assert_eq!(report.token, RunToken::Error);
    assert_eq!(remote.mirror_calls.get(), 3, "bounded retries");
    assert_eq!(service.calls.get(), 0, "no restart after failed sync");
    assert!(report.transcript.contains("connection reset"));
}

#[test]
fn failed_restart_records_error_not_restart() {
    let h = Harness::new();
    h.seed_local(120);
    let remote = FakeRemote::listing(125);
    let service = FakeService::broken();

    let report = h.run(&remote, &service);

    assert_eq!(report.token, RunToken::Error);
    assert_eq!(report.exit_code(), 1);
    assert!(report.synced, "the sync itself stands");
    assert!(matches!(report.restart, RestartOutcome::Failed(_)));
    assert!(report.message.contains("restart failed"));

    // The breaker ring must not see this as a RESTART.
    let loaded = Breaker::load_at(h.root.path()).unwrap();
    assert_eq!(loaded.recent.last(), Some(&RunToken::Error));
}

#[test]
fn detailed_mode_with_content_in_agreement_does_not_transfer() {
    let h = Harness::new();
    h.seed_local(120);
    let remote = FakeRemote::listing(120);
    let service = FakeService::healthy();

    let report = h.run_mode(&remote, &service, RunMode::Detailed, false, "unused");

    assert_eq!(report.token, RunToken::Ok);
    assert_eq!(remote.mirror_calls.get(), 0);
    assert!(report.message.contains("in agreement"));
}

#[test]
fn detailed_mode_transfers_on_mismatch_and_restarts() {
    let h = Harness::new();
    h.seed_local(110);
    let remote = FakeRemote::listing(120);
    let service = FakeService::healthy();

    let report = h.run_mode(&remote, &service, RunMode::Detailed, false, "unused");

    assert_eq!(report.token, RunToken::Restart);
    assert_eq!(remote.mirror_calls.get(), 1);
    assert_eq!(service.calls.get(), 1);
}

#[test]
fn every_run_appends_exactly_one_line() {
    let h = Harness::new();
    h.seed_local(120);
    let service = FakeService::healthy();

    h.run(&FakeRemote::listing(120), &service); // OK
    h.run(&FakeRemote::listing(125), &service); // RESTART
    h.run(&FakeRemote::listing(0), &service); // ERROR (floor)

    let lines = h.log_lines();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("SYNC_RESULT: OK"));
    assert!(lines[1].contains("SYNC_RESULT: RESTART"));
    assert!(lines[2].contains("SYNC_RESULT: ERROR"));
}

#[test]
fn external_marker_removal_resets_tripped_breaker() {
    let h = Harness::new();
    let mut b = Breaker {
        state: BreakerState::Tripped,
        recent: vec![RunToken::Restart; STREAK_LEN],
    };
    b.save_at(h.root.path()).unwrap();
    // No marker on disk: operator deleted it by hand.

    h.seed_local(120);
    let remote = FakeRemote::listing(125);
    let service = FakeService::healthy();
    let report = h.run(&remote, &service);

    assert_eq!(
        report.token,
        RunToken::Restart,
        "reset breaker allows the restart"
    );
    let loaded = Breaker::load_at(h.root.path()).unwrap();
    assert_eq!(loaded.state, BreakerState::Normal);
}

#[test]
fn lock_contention_exits_early_without_a_record() {
    let h = Harness::new();
    let _held = framesync_host::RunLock::try_acquire_at(h.root.path()).unwrap();

    let request = RunRequest {
        root: h.root.path(),
        settings: &h.settings,
        registry: &h.registry,
        mode: RunMode::Quick,
        interactive: false,
    };
    let remote = FakeRemote::listing(120);
    let service = FakeService::healthy();
    let mut ask = |_: &str| Ok(String::new());

    let err = execute(&request, &remote, &service, &mut ask).expect_err("lock is held");
    assert!(matches!(err, EngineError::LockBusy));
    assert!(h.log_lines().is_empty(), "no outcome for a blocked invocation");
}

#[test]
fn skip_outcome_feeds_the_breaker_ring() {
    let h = Harness::new();
    write_marker_at(h.root.path(), "disabled").unwrap();
    let remote = FakeRemote::listing(120);
    let service = FakeService::healthy();

    h.run_mode(&remote, &service, RunMode::Quick, false, "unused");

    let loaded = breaker::Breaker::load_at(h.root.path()).unwrap();
    assert_eq!(loaded.recent.last(), Some(&RunToken::Ok));
}
