use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use keepalive::env::{EnvironmentActivator, EnvironmentSpec, PreparedEnvironment};
use keepalive::errors::{KeepaliveError, Result};

/// Activator that counts calls and either succeeds with an inherited
/// environment or fails with a fixed message.
#[derive(Debug, Clone, Default)]
pub struct CountingActivator {
    calls: Arc<AtomicUsize>,
    failure: Option<String>,
}

impl CountingActivator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            failure: Some(message.to_string()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl EnvironmentActivator for CountingActivator {
    fn activate(
        &self,
        working_directory: &Path,
        _spec: &EnvironmentSpec,
    ) -> Result<PreparedEnvironment> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(msg) => Err(KeepaliveError::EnvironmentActivation(msg.clone())),
            None => Ok(PreparedEnvironment::inherit(working_directory)),
        }
    }
}
