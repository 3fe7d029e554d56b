use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;

use keepalive::env::PreparedEnvironment;
use keepalive::errors::{KeepaliveError, Result};
use keepalive::exec::{BoxFuture, CommandSpec, ProcessBackend, WorkerProcess};
use keepalive::supervisor::ShutdownHandle;
use keepalive::types::RunOutcome;

/// What the next worker launch should do.
#[derive(Debug, Clone)]
pub enum ScriptedRun {
    /// Start, then terminate immediately with this outcome.
    Exit(RunOutcome),
    /// Start, stay "running" for the duration, then terminate.
    RunFor(Duration, RunOutcome),
    /// Fail to start at all.
    LaunchError(String),
}

#[derive(Debug, Default)]
struct Recorded {
    install_calls: usize,
    launches: Vec<Instant>,
    exits: Vec<Instant>,
    worker_envs: Vec<PreparedEnvironment>,
    active: usize,
    max_active: usize,
}

/// Shared view of everything a [`ScriptedBackend`] was asked to do.
#[derive(Debug, Clone, Default)]
pub struct BackendLog {
    inner: Arc<Mutex<Recorded>>,
}

impl BackendLog {
    pub fn install_calls(&self) -> usize {
        self.inner.lock().unwrap().install_calls
    }

    /// Number of `launch` calls, including ones that failed to start.
    pub fn launch_count(&self) -> usize {
        self.inner.lock().unwrap().launches.len()
    }

    pub fn launches(&self) -> Vec<Instant> {
        self.inner.lock().unwrap().launches.clone()
    }

    /// Instants at which started workers finished.
    pub fn exits(&self) -> Vec<Instant> {
        self.inner.lock().unwrap().exits.clone()
    }

    pub fn worker_envs(&self) -> Vec<PreparedEnvironment> {
        self.inner.lock().unwrap().worker_envs.clone()
    }

    /// Highest number of workers alive at the same time.
    pub fn max_concurrent_workers(&self) -> usize {
        self.inner.lock().unwrap().max_active
    }

    /// Workers launched and neither exited nor dropped yet.
    pub fn active_workers(&self) -> usize {
        self.inner.lock().unwrap().active
    }
}

/// A fake process backend that:
/// - records install runs and worker launches with timestamps
/// - plays back a fixed script of worker outcomes
/// - optionally stops the supervisor once the script is used up.
///
/// Launches past the end of the script produce a worker that never exits.
pub struct ScriptedBackend {
    script: VecDeque<ScriptedRun>,
    install_outcome: RunOutcome,
    log: BackendLog,
    stop_when_exhausted: Option<ShutdownHandle>,
}

impl ScriptedBackend {
    pub fn new(script: impl IntoIterator<Item = ScriptedRun>) -> Self {
        Self {
            script: script.into_iter().collect(),
            install_outcome: RunOutcome::Exited(0),
            log: BackendLog::default(),
            stop_when_exhausted: None,
        }
    }

    pub fn install_outcome(mut self, outcome: RunOutcome) -> Self {
        self.install_outcome = outcome;
        self
    }

    /// Call `handle.stop()` as soon as the last scripted run has finished.
    pub fn stop_when_exhausted(mut self, handle: ShutdownHandle) -> Self {
        self.stop_when_exhausted = Some(handle);
        self
    }

    pub fn log(&self) -> BackendLog {
        self.log.clone()
    }

    fn stop_handle_if_last(&self) -> Option<ShutdownHandle> {
        if self.script.is_empty() {
            self.stop_when_exhausted.clone()
        } else {
            None
        }
    }
}

impl ProcessBackend for ScriptedBackend {
    fn run_to_completion<'a>(
        &'a mut self,
        _cmd: &'a CommandSpec,
        _env: &'a PreparedEnvironment,
    ) -> BoxFuture<'a, RunOutcome> {
        self.log.inner.lock().unwrap().install_calls += 1;
        let outcome = self.install_outcome.clone();
        Box::pin(async move { outcome })
    }

    fn launch(
        &mut self,
        _cmd: &CommandSpec,
        env: &PreparedEnvironment,
    ) -> Result<Box<dyn WorkerProcess>> {
        let next = self.script.pop_front();
        let stop_after = self.stop_handle_if_last();

        {
            let mut rec = self.log.inner.lock().unwrap();
            rec.launches.push(Instant::now());
            rec.worker_envs.push(env.clone());
        }

        let run = match next {
            Some(ScriptedRun::LaunchError(msg)) => {
                if let Some(handle) = stop_after {
                    handle.stop();
                }
                return Err(KeepaliveError::Other(anyhow::anyhow!(msg)));
            }
            other => other,
        };

        {
            let mut rec = self.log.inner.lock().unwrap();
            rec.active += 1;
            rec.max_active = rec.max_active.max(rec.active);
        }

        Ok(Box::new(FakeWorker {
            run,
            log: self.log.clone(),
            stop_after,
            finished: false,
        }))
    }
}

struct FakeWorker {
    /// `None` means "run forever".
    run: Option<ScriptedRun>,
    log: BackendLog,
    stop_after: Option<ShutdownHandle>,
    finished: bool,
}

impl FakeWorker {
    fn finish(&mut self) {
        self.finished = true;
        {
            let mut rec = self.log.inner.lock().unwrap();
            rec.active -= 1;
            rec.exits.push(Instant::now());
        }
        if let Some(handle) = self.stop_after.take() {
            handle.stop();
        }
    }
}

impl WorkerProcess for FakeWorker {
    fn id(&self) -> Option<u32> {
        None
    }

    fn wait(&mut self) -> BoxFuture<'_, RunOutcome> {
        Box::pin(async move {
            let outcome = match self.run.clone() {
                Some(ScriptedRun::Exit(outcome)) => outcome,
                Some(ScriptedRun::RunFor(duration, outcome)) => {
                    tokio::time::sleep(duration).await;
                    outcome
                }
                Some(ScriptedRun::LaunchError(_)) => unreachable!("launch errors never start"),
                None => std::future::pending::<RunOutcome>().await,
            };
            self.finish();
            outcome
        })
    }
}

impl Drop for FakeWorker {
    fn drop(&mut self) {
        if !self.finished {
            // Abandoned while "running": the real backend kills it here.
            self.log.inner.lock().unwrap().active -= 1;
        }
    }
}
