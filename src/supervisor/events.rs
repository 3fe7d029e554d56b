// src/supervisor/events.rs

use std::path::PathBuf;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tracing::{debug, trace};

use crate::types::RunOutcome;

/// Progress notifications published by the supervisor.
///
/// Purely informational: nothing the supervisor does depends on whether
/// anyone is listening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SupervisorEvent {
    WorkingDirectoryResolved { path: PathBuf },
    EnvironmentActivated,
    /// The install step ran; `outcome` is reported but never enforced.
    DependenciesReconciled { outcome: RunOutcome },
    /// No install command is configured.
    DependenciesSkipped,
    WorkerStarted { attempt: u64, pid: Option<u32> },
    WorkerExited { attempt: u64, outcome: RunOutcome },
    RestartScheduled { attempt: u64, delay: Duration },
    Stopped { attempts: u64 },
}

/// Optional event publisher. Never waits on the receiver: events that don't
/// fit in the channel are dropped, and a closed receiver is ignored.
#[derive(Debug, Clone, Default)]
pub(crate) struct EventSink {
    tx: Option<mpsc::Sender<SupervisorEvent>>,
}

impl EventSink {
    pub(crate) fn new(tx: Option<mpsc::Sender<SupervisorEvent>>) -> Self {
        Self { tx }
    }

    pub(crate) fn emit(&self, event: SupervisorEvent) {
        let Some(tx) = &self.tx else {
            return;
        };
        match tx.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                debug!(?event, "event channel full; dropping supervisor event");
            }
            Err(TrySendError::Closed(_)) => {
                trace!("event receiver closed; dropping supervisor event");
            }
        }
    }
}
