// src/lib.rs

pub mod cli;
pub mod config;
pub mod env;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod supervisor;
pub mod types;

use std::path::Path;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{SupervisorConfig, load_or_default};
use crate::env::EnvironmentSpec;
use crate::supervisor::{Supervisor, shutdown};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (file or built-in defaults)
/// - the supervisor with the real process backend
/// - Ctrl-C handling via the supervisor's stop channel
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_or_default(args.config.as_deref().map(Path::new))?;

    if args.dry_run {
        print_dry_run(&cfg);
        return Ok(());
    }

    let (stop, signal) = shutdown::channel();

    // Ctrl-C → stop the loop. The worker shares our console, so it sees the
    // interrupt too; anything still running is killed when its handle drops.
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            return;
        }
        stop.stop();
    });

    let report = Supervisor::with_defaults(cfg).run(signal).await?;
    info!(attempts = report.attempts, "keepalive exiting");
    Ok(())
}

/// Print the resolved configuration without running anything.
fn print_dry_run(cfg: &SupervisorConfig) {
    println!("keepalive dry-run");
    println!(
        "  supervisor.working_directory = {}",
        cfg.working_directory.display()
    );
    println!("  supervisor.restart_delay = {:?}", cfg.restart_delay);
    match &cfg.environment {
        EnvironmentSpec::Inherit => println!("  environment = inherit"),
        EnvironmentSpec::Venv { path } => println!("  environment.venv = {}", path.display()),
    }
    match &cfg.install_command {
        Some(cmd) => println!("  install.cmd = {cmd}"),
        None => println!("  install = disabled"),
    }
    println!("  worker.cmd = {}", cfg.worker_command);

    debug!("dry-run complete (no execution)");
}
