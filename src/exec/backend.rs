// src/exec/backend.rs

//! Pluggable process backend abstraction.
//!
//! The supervisor talks to a `ProcessBackend` instead of spawning processes
//! itself. Production code uses [`super::RealProcessBackend`]; tests provide
//! a scripted implementation that records launches and returns canned
//! outcomes without touching the OS.

use std::future::Future;
use std::pin::Pin;

use crate::env::PreparedEnvironment;
use crate::errors::Result;
use crate::exec::CommandSpec;
use crate::types::RunOutcome;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// How the supervisor starts child processes.
pub trait ProcessBackend: Send {
    /// Run a command to completion and report how it ended.
    ///
    /// Used for the dependency install step. A command that cannot be
    /// started is reported as [`RunOutcome::LaunchFailed`], not as an error.
    fn run_to_completion<'a>(
        &'a mut self,
        cmd: &'a CommandSpec,
        env: &'a PreparedEnvironment,
    ) -> BoxFuture<'a, RunOutcome>;

    /// Start the worker and return a handle to wait on.
    ///
    /// An `Err` means the process never started; the supervisor treats that
    /// like a crash.
    fn launch(
        &mut self,
        cmd: &CommandSpec,
        env: &PreparedEnvironment,
    ) -> Result<Box<dyn WorkerProcess>>;
}

/// A running worker.
///
/// Dropping the handle before `wait` resolves must stop the process.
pub trait WorkerProcess: Send {
    /// OS process id, if known.
    fn id(&self) -> Option<u32>;

    /// Wait for the process to terminate.
    fn wait(&mut self) -> BoxFuture<'_, RunOutcome>;
}
