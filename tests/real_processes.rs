// tests/real_processes.rs
//
// End-to-end runs with real `sh` children.
#![cfg(unix)]

mod common;
use crate::common::*;

use std::error::Error;
use std::fs;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use keepalive::config::SupervisorConfig;
use keepalive::errors::KeepaliveError;
use keepalive::supervisor::{
    ShutdownHandle, Supervisor, SupervisorEvent, SupervisorReport, shutdown,
};
use keepalive::types::RunOutcome;

type TestResult = Result<(), Box<dyn Error>>;

struct Running {
    stop: ShutdownHandle,
    events: mpsc::Receiver<SupervisorEvent>,
    handle: JoinHandle<Result<SupervisorReport, KeepaliveError>>,
}

fn start(cfg: SupervisorConfig) -> Running {
    let (stop, signal) = shutdown::channel();
    let (tx, events) = mpsc::channel(256);
    let handle = tokio::spawn(Supervisor::with_defaults(cfg).with_events(tx).run(signal));
    Running {
        stop,
        events,
        handle,
    }
}

/// Collect worker outcomes until `n` have been seen, then stop.
async fn stop_after_exits(running: &mut Running, n: usize) -> Vec<RunOutcome> {
    let mut outcomes = Vec::new();
    while outcomes.len() < n {
        match running.events.recv().await {
            Some(SupervisorEvent::WorkerExited { outcome, .. }) => outcomes.push(outcome),
            Some(_) => {}
            None => break,
        }
    }
    running.stop.stop();
    outcomes
}

fn dir_str(dir: &tempfile::TempDir) -> String {
    dir.path().to_str().expect("utf-8 temp path").to_string()
}

#[tokio::test]
async fn crashing_worker_is_relaunched() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let cfg = ConfigFileBuilder::new()
        .working_directory(&dir_str(&dir))
        .restart_delay("0s")
        .worker(&["sh", "-c", "exit 1"])
        .build();

    let mut running = start(cfg);
    let outcomes = with_timeout(stop_after_exits(&mut running, 3)).await;
    let report = with_timeout(running.handle).await??;

    assert_eq!(outcomes, vec![RunOutcome::Exited(1); 3]);
    // The stop may race an extra launch, never fewer than observed.
    assert!(report.attempts >= 3);

    Ok(())
}

#[tokio::test]
async fn killed_worker_reports_signal_and_is_relaunched() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let cfg = ConfigFileBuilder::new()
        .working_directory(&dir_str(&dir))
        .restart_delay("0s")
        .worker(&["sh", "-c", "kill -9 $$"])
        .build();

    let mut running = start(cfg);
    let outcomes = with_timeout(stop_after_exits(&mut running, 2)).await;
    with_timeout(running.handle).await??;

    assert_eq!(outcomes, vec![RunOutcome::Signaled(9); 2]);

    Ok(())
}

#[tokio::test]
async fn missing_worker_program_is_treated_as_crash() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let cfg = ConfigFileBuilder::new()
        .working_directory(&dir_str(&dir))
        .restart_delay("10ms")
        .worker(&["/definitely/not/a/worker-binary"])
        .build();

    let mut running = start(cfg);
    let outcomes = with_timeout(stop_after_exits(&mut running, 2)).await;
    let report = with_timeout(running.handle).await??;

    assert_eq!(outcomes.len(), 2);
    for outcome in outcomes {
        assert!(
            matches!(outcome, RunOutcome::LaunchFailed(_)),
            "expected launch failure, got {outcome:?}"
        );
    }
    assert!(report.attempts >= 2);

    Ok(())
}

/// The install step runs once, in the working directory, no matter how
/// many times the worker restarts.
#[tokio::test]
async fn install_runs_once_in_working_directory() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let cfg = ConfigFileBuilder::new()
        .working_directory(&dir_str(&dir))
        .restart_delay("0s")
        .install(&["sh", "-c", "echo installed >> install.log"])
        .worker(&["sh", "-c", "echo run >> worker.log"])
        .build();

    let mut running = start(cfg);
    with_timeout(stop_after_exits(&mut running, 3)).await;
    with_timeout(running.handle).await??;

    let install_log = fs::read_to_string(dir.path().join("install.log"))?;
    assert_eq!(install_log.lines().count(), 1);

    let worker_log = fs::read_to_string(dir.path().join("worker.log"))?;
    assert!(worker_log.lines().count() >= 3);

    Ok(())
}

#[tokio::test]
async fn failing_install_still_starts_worker() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let cfg = ConfigFileBuilder::new()
        .working_directory(&dir_str(&dir))
        .restart_delay("0s")
        .install(&["sh", "-c", "exit 3"])
        .worker(&["sh", "-c", "exit 0"])
        .build();

    let mut running = start(cfg);

    let mut install_outcome = None;
    let mut exits = 0;
    while exits < 1 {
        match with_timeout(running.events.recv()).await {
            Some(SupervisorEvent::DependenciesReconciled { outcome }) => {
                install_outcome = Some(outcome)
            }
            Some(SupervisorEvent::WorkerExited { .. }) => exits += 1,
            Some(_) => {}
            None => break,
        }
    }
    running.stop.stop();
    with_timeout(running.handle).await??;

    assert_eq!(install_outcome, Some(RunOutcome::Exited(3)));
    assert_eq!(exits, 1);

    Ok(())
}

/// Activation exposes the venv to the worker through its environment.
#[tokio::test]
async fn worker_sees_activated_venv() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    fs::create_dir_all(dir.path().join(".venv/bin"))?;

    let cfg = ConfigFileBuilder::new()
        .working_directory(&dir_str(&dir))
        .restart_delay("0s")
        .venv(".venv")
        .worker(&["sh", "-c", "printf %s \"$VIRTUAL_ENV\" > venv.txt"])
        .build();

    let mut running = start(cfg);
    let outcomes = with_timeout(stop_after_exits(&mut running, 1)).await;
    with_timeout(running.handle).await??;

    assert_eq!(outcomes, vec![RunOutcome::Exited(0)]);

    let seen = fs::read_to_string(dir.path().join("venv.txt"))?;
    let expected = fs::canonicalize(dir.path().join(".venv"))?;
    assert_eq!(seen, expected.to_str().unwrap_or_default());

    Ok(())
}

/// Whether `pid` still names a live (non-zombie) process.
fn process_alive(pid: u32) -> bool {
    if std::path::Path::new("/proc/self").exists() {
        return match fs::read_to_string(format!("/proc/{pid}/stat")) {
            // State is the first field after the parenthesised command name.
            Ok(stat) => stat
                .rsplit_once(')')
                .and_then(|(_, rest)| rest.split_whitespace().next())
                .is_some_and(|state| state != "Z" && state != "X"),
            Err(_) => false,
        };
    }

    match std::process::Command::new("ps")
        .args(["-o", "stat=", "-p", &pid.to_string()])
        .output()
    {
        Ok(out) => {
            let stat = String::from_utf8_lossy(&out.stdout);
            let stat = stat.trim();
            !stat.is_empty() && !stat.starts_with('Z')
        }
        Err(_) => false,
    }
}

/// Stopping while a long-running worker is up ends the supervisor promptly
/// and takes the worker down with it.
#[tokio::test]
async fn stop_kills_running_worker() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let cfg = ConfigFileBuilder::new()
        .working_directory(&dir_str(&dir))
        .restart_delay("0s")
        .worker(&["sleep", "30"])
        .build();

    let mut running = start(cfg);
    let pid = loop {
        match with_timeout(running.events.recv()).await {
            Some(SupervisorEvent::WorkerStarted { pid, .. }) => {
                break pid.expect("real workers have a pid");
            }
            Some(_) => {}
            None => panic!("supervisor ended before the worker started"),
        }
    };
    assert!(process_alive(pid), "worker {pid} should be running");
    running.stop.stop();

    let report = tokio::time::timeout(Duration::from_secs(3), running.handle).await???;
    assert_eq!(report.attempts, 1);

    let deadline = tokio::time::Instant::now() + Duration::from_secs(3);
    while process_alive(pid) {
        assert!(
            tokio::time::Instant::now() < deadline,
            "worker {pid} survived the supervisor"
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    Ok(())
}
