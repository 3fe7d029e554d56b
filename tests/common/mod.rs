#![allow(dead_code)]

pub use keepalive_test_utils::builders::ConfigFileBuilder;
pub use keepalive_test_utils::fake_activator::CountingActivator;
pub use keepalive_test_utils::fake_backend::{BackendLog, ScriptedBackend, ScriptedRun};
pub use keepalive_test_utils::{init_tracing, with_timeout};

use tokio::sync::mpsc;

use keepalive::supervisor::SupervisorEvent;

/// Drain every event still buffered in `rx`.
///
/// Call after the supervisor has returned; its sender is gone by then, so
/// this sees the complete stream.
pub fn drain_events(rx: &mut mpsc::Receiver<SupervisorEvent>) -> Vec<SupervisorEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

pub fn count<F>(events: &[SupervisorEvent], pred: F) -> usize
where
    F: Fn(&SupervisorEvent) -> bool,
{
    events.iter().filter(|e| pred(e)).count()
}
