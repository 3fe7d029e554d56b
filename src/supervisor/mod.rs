// src/supervisor/mod.rs

//! The supervisor: prepare once, then keep the worker running.
//!
//! - [`startup`] resolves the working directory, activates the environment
//!   and reconciles dependencies, in that order, exactly once.
//! - [`restart_loop`] launches the worker, waits for it, announces the exit,
//!   sleeps the restart delay, and repeats until stopped.
//! - [`shutdown`] provides the stop channel that ends the loop.
//! - [`events`] defines the [`SupervisorEvent`] stream.
//!
//! Workers run strictly one at a time; a new launch only happens after the
//! previous worker's termination has been observed.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;

use crate::config::SupervisorConfig;
use crate::env::{EnvironmentActivator, VenvActivator};
use crate::errors::Result;
use crate::exec::{ProcessBackend, RealProcessBackend};
use crate::fs::{FileSystem, RealFileSystem};

pub mod events;
pub mod restart_loop;
pub mod shutdown;
pub mod startup;

pub use events::SupervisorEvent;
pub use shutdown::{ShutdownHandle, ShutdownSignal};

use events::EventSink;

/// Summary returned when the supervisor stops via its stop channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupervisorReport {
    /// Number of worker launches attempted, including failed launches.
    pub attempts: u64,
}

pub struct Supervisor<B: ProcessBackend> {
    config: SupervisorConfig,
    backend: B,
    fs: Arc<dyn FileSystem>,
    activator: Box<dyn EnvironmentActivator>,
    events: EventSink,
}

impl<B: ProcessBackend> fmt::Debug for Supervisor<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Supervisor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Supervisor<RealProcessBackend> {
    /// Supervisor backed by real processes, the real filesystem and the
    /// current process `PATH`.
    pub fn with_defaults(config: SupervisorConfig) -> Self {
        Self::new(config, RealProcessBackend::new())
    }
}

impl<B: ProcessBackend> Supervisor<B> {
    pub fn new(config: SupervisorConfig, backend: B) -> Self {
        Self {
            config,
            backend,
            fs: Arc::new(RealFileSystem),
            activator: Box::new(VenvActivator::from_process_env()),
            events: EventSink::default(),
        }
    }

    pub fn with_file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn with_activator(mut self, activator: impl EnvironmentActivator + 'static) -> Self {
        self.activator = Box::new(activator);
        self
    }

    /// Publish [`SupervisorEvent`]s on `tx`.
    pub fn with_events(mut self, tx: mpsc::Sender<SupervisorEvent>) -> Self {
        self.events = EventSink::new(Some(tx));
        self
    }

    /// Run startup, then the restart loop until `shutdown` fires.
    ///
    /// Returns an error only for fatal startup failures (working directory,
    /// environment activation), in which case no install step and no worker
    /// has run. Startup itself is not interruptible.
    pub async fn run(mut self, mut shutdown: ShutdownSignal) -> Result<SupervisorReport> {
        info!(
            working_directory = %self.config.working_directory.display(),
            restart_delay = ?self.config.restart_delay,
            worker = %self.config.worker_command,
            "supervisor starting"
        );

        let env = startup::prepare(
            &self.config,
            self.fs.as_ref(),
            self.activator.as_ref(),
            &mut self.backend,
            &self.events,
        )
        .await?;

        let report = restart_loop::run_until_stopped(
            &self.config.worker_command,
            self.config.restart_delay,
            &env,
            &mut self.backend,
            &self.events,
            &mut shutdown,
        )
        .await;

        info!(attempts = report.attempts, "supervisor stopped");
        Ok(report)
    }
}
