// src/supervisor/startup.rs

//! One-shot startup sequence: working directory, environment, dependencies.

use tracing::{info, warn};

use crate::config::SupervisorConfig;
use crate::env::{EnvironmentActivator, PreparedEnvironment, resolve_working_directory};
use crate::errors::Result;
use crate::exec::ProcessBackend;
use crate::fs::FileSystem;

use super::events::{EventSink, SupervisorEvent};

/// Run the startup sequence in order.
///
/// The first two steps are fatal on failure and short-circuit everything
/// after them. Dependency reconciliation is best effort: its outcome is
/// logged and published, then startup continues regardless.
pub(crate) async fn prepare<B: ProcessBackend>(
    config: &SupervisorConfig,
    fs: &dyn FileSystem,
    activator: &dyn EnvironmentActivator,
    backend: &mut B,
    events: &EventSink,
) -> Result<PreparedEnvironment> {
    let working_directory = resolve_working_directory(fs, &config.working_directory)?;
    info!(path = %working_directory.display(), "working directory ready");
    events.emit(SupervisorEvent::WorkingDirectoryResolved {
        path: working_directory.clone(),
    });

    let env = activator.activate(&working_directory, &config.environment)?;
    events.emit(SupervisorEvent::EnvironmentActivated);

    reconcile_dependencies(config, &env, backend, events).await;

    Ok(env)
}

async fn reconcile_dependencies<B: ProcessBackend>(
    config: &SupervisorConfig,
    env: &PreparedEnvironment,
    backend: &mut B,
    events: &EventSink,
) {
    let Some(install) = &config.install_command else {
        info!("no install command configured; skipping dependency reconciliation");
        events.emit(SupervisorEvent::DependenciesSkipped);
        return;
    };

    info!(cmd = %install, "reconciling dependencies");
    let outcome = backend.run_to_completion(install, env).await;

    if outcome.is_success() {
        info!(cmd = %install, "dependencies reconciled");
    } else {
        // Not a gate: the worker may still run with what is installed.
        warn!(
            cmd = %install,
            outcome = %outcome,
            "dependency installation failed; continuing anyway"
        );
    }

    events.emit(SupervisorEvent::DependenciesReconciled { outcome });
}
