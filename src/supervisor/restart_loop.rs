// src/supervisor/restart_loop.rs

//! The unattended restart cycle.

use std::time::Duration;

use tracing::{debug, error, info};

use crate::env::PreparedEnvironment;
use crate::exec::{CommandSpec, ProcessBackend};
use crate::types::RunOutcome;

use super::SupervisorReport;
use super::events::{EventSink, SupervisorEvent};
use super::shutdown::ShutdownSignal;

const BANNER_WIDTH: usize = 60;

/// Launch, wait, announce, sleep, repeat until `shutdown` fires.
///
/// Every exit is treated the same way: clean exit, crash, signal, or a
/// worker that could not even be started. There is no attempt cap and the
/// delay never grows.
pub(crate) async fn run_until_stopped<B: ProcessBackend>(
    worker: &CommandSpec,
    restart_delay: Duration,
    env: &PreparedEnvironment,
    backend: &mut B,
    events: &EventSink,
    shutdown: &mut ShutdownSignal,
) -> SupervisorReport {
    let mut attempts: u64 = 0;

    while !shutdown.is_stopped() {
        attempts += 1;
        let attempt = attempts;

        info!(attempt, cmd = %worker, "starting worker");
        println!("[keepalive] starting {worker} (attempt {attempt})");

        let outcome = match backend.launch(worker, env) {
            Ok(mut process) => {
                let pid = process.id();
                debug!(attempt, ?pid, "worker running");
                events.emit(SupervisorEvent::WorkerStarted { attempt, pid });

                let finished = tokio::select! {
                    outcome = process.wait() => Some(outcome),
                    _ = shutdown.stopped() => None,
                };

                match finished {
                    Some(outcome) => outcome,
                    None => {
                        info!(attempt, ?pid, "stop requested while worker running; killing it");
                        drop(process);
                        break;
                    }
                }
            }
            Err(e) => {
                error!(attempt, cmd = %worker, error = %e, "worker failed to launch");
                RunOutcome::LaunchFailed(e.to_string())
            }
        };

        if outcome.is_success() {
            info!(attempt, outcome = %outcome, "worker exited");
        } else {
            error!(attempt, outcome = %outcome, "worker exited abnormally");
        }
        events.emit(SupervisorEvent::WorkerExited {
            attempt,
            outcome: outcome.clone(),
        });

        print_banner(&outcome, restart_delay);
        events.emit(SupervisorEvent::RestartScheduled {
            attempt,
            delay: restart_delay,
        });

        tokio::select! {
            _ = tokio::time::sleep(restart_delay) => {}
            _ = shutdown.stopped() => {
                info!(attempt, "stop requested during restart delay");
                break;
            }
        }
    }

    events.emit(SupervisorEvent::Stopped { attempts });
    SupervisorReport { attempts }
}

fn print_banner(outcome: &RunOutcome, delay: Duration) {
    println!("{}", "=".repeat(BANNER_WIDTH));
    println!(
        "[keepalive] program terminated ({outcome}), restarting in {}",
        describe_delay(delay)
    );
    println!("{}", "=".repeat(BANNER_WIDTH));
}

fn describe_delay(delay: Duration) -> String {
    if delay.subsec_nanos() == 0 {
        match delay.as_secs() {
            1 => "1 second".to_string(),
            secs => format!("{secs} seconds"),
        }
    } else {
        format!("{delay:?}")
    }
}
