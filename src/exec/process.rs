// src/exec/process.rs

//! Production process backend built on `tokio::process`.

use anyhow::Context;
use tokio::process::Child;
use tracing::{debug, error};

use crate::env::PreparedEnvironment;
use crate::errors::Result;
use crate::exec::backend::{BoxFuture, ProcessBackend, WorkerProcess};
use crate::exec::CommandSpec;
use crate::types::RunOutcome;

/// Spawns real OS processes with inherited stdio.
#[derive(Debug, Clone, Default)]
pub struct RealProcessBackend;

impl RealProcessBackend {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessBackend for RealProcessBackend {
    fn run_to_completion<'a>(
        &'a mut self,
        cmd: &'a CommandSpec,
        env: &'a PreparedEnvironment,
    ) -> BoxFuture<'a, RunOutcome> {
        Box::pin(async move {
            let mut command = cmd.to_command(env);
            let mut child = match command.spawn() {
                Ok(child) => child,
                Err(e) => {
                    return RunOutcome::LaunchFailed(format!("spawning '{cmd}': {e}"));
                }
            };

            debug!(cmd = %cmd, pid = ?child.id(), "process started");
            wait_child(&mut child, cmd).await
        })
    }

    fn launch(
        &mut self,
        cmd: &CommandSpec,
        env: &PreparedEnvironment,
    ) -> Result<Box<dyn WorkerProcess>> {
        let child = cmd
            .to_command(env)
            .spawn()
            .with_context(|| format!("spawning worker '{cmd}'"))?;

        Ok(Box::new(RealWorker {
            child,
            cmd: cmd.clone(),
        }))
    }
}

struct RealWorker {
    child: Child,
    cmd: CommandSpec,
}

impl WorkerProcess for RealWorker {
    fn id(&self) -> Option<u32> {
        self.child.id()
    }

    fn wait(&mut self) -> BoxFuture<'_, RunOutcome> {
        Box::pin(wait_child(&mut self.child, &self.cmd))
    }
}

async fn wait_child(child: &mut Child, cmd: &CommandSpec) -> RunOutcome {
    match child.wait().await {
        Ok(status) => RunOutcome::from_status(status),
        Err(e) => {
            // The process may still be alive; kill_on_drop covers it once the
            // handle goes away.
            error!(cmd = %cmd, error = %e, "failed to wait on child process");
            RunOutcome::Exited(-1)
        }
    }
}
