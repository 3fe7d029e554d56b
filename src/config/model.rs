// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::env::EnvironmentSpec;
use crate::exec::CommandSpec;

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [supervisor]
/// working_directory = "/srv/app"
/// restart_delay = "5s"
///
/// [environment]
/// venv = ".venv"
///
/// [install]
/// cmd = ["pip", "install", "-r", "requirements.txt"]
///
/// [worker]
/// cmd = ["python", "-m", "app.main"]
/// ```
///
/// All sections are optional; an empty file yields the built-in defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub supervisor: SupervisorSection,

    #[serde(default)]
    pub environment: EnvironmentSection,

    #[serde(default)]
    pub install: InstallSection,

    #[serde(default)]
    pub worker: WorkerSection,
}

/// `[supervisor]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SupervisorSection {
    /// Directory the install step and the worker run in. Must already exist.
    #[serde(default = "default_working_directory")]
    pub working_directory: String,

    /// Pause between a worker exiting and the next launch, e.g. `"5s"`.
    #[serde(default = "default_restart_delay")]
    pub restart_delay: String,
}

fn default_working_directory() -> String {
    ".".to_string()
}

fn default_restart_delay() -> String {
    "5s".to_string()
}

impl Default for SupervisorSection {
    fn default() -> Self {
        Self {
            working_directory: default_working_directory(),
            restart_delay: default_restart_delay(),
        }
    }
}

/// `[environment]` section.
///
/// - `venv = "path"`: activate the isolated environment at this path
///   (relative to the working directory). Defaults to `.venv`.
/// - `inherit = true`: skip activation and run children with the
///   supervisor's own environment. Cannot be combined with `venv`.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct EnvironmentSection {
    #[serde(default)]
    pub venv: Option<String>,

    #[serde(default)]
    pub inherit: bool,
}

/// Default venv directory when neither `venv` nor `inherit` is given.
pub const DEFAULT_VENV: &str = ".venv";

/// `[install]` section: the one-shot dependency reconciliation command.
#[derive(Debug, Clone, Deserialize)]
pub struct InstallSection {
    /// Program followed by its arguments. No shell is involved.
    #[serde(default = "default_install_cmd")]
    pub cmd: Vec<String>,

    /// Set to `false` to skip dependency reconciliation entirely.
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_install_cmd() -> Vec<String> {
    ["pip", "install", "-r", "requirements.txt"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_true() -> bool {
    true
}

impl Default for InstallSection {
    fn default() -> Self {
        Self {
            cmd: default_install_cmd(),
            enabled: true,
        }
    }
}

/// `[worker]` section: the command kept alive by the restart loop.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkerSection {
    #[serde(default = "default_worker_cmd")]
    pub cmd: Vec<String>,
}

fn default_worker_cmd() -> Vec<String> {
    ["python", "-m", "app.main"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for WorkerSection {
    fn default() -> Self {
        Self {
            cmd: default_worker_cmd(),
        }
    }
}

/// Validated supervisor configuration.
///
/// Built from a [`RawConfigFile`] via `TryFrom`, or directly in code and
/// tests. Everything the supervisor needs is carried here explicitly; the
/// supervisor never reads or changes the process-wide working directory or
/// environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupervisorConfig {
    pub working_directory: PathBuf,
    pub restart_delay: Duration,
    pub worker_command: CommandSpec,
    /// `None` means dependency reconciliation is disabled.
    pub install_command: Option<CommandSpec>,
    pub environment: EnvironmentSpec,
}

impl SupervisorConfig {
    /// Config with the built-in defaults for everything but the working
    /// directory and the worker command.
    pub fn new(working_directory: impl Into<PathBuf>, worker_command: CommandSpec) -> Self {
        Self {
            working_directory: working_directory.into(),
            restart_delay: Duration::from_secs(5),
            worker_command,
            install_command: None,
            environment: EnvironmentSpec::Inherit,
        }
    }

    pub fn with_restart_delay(mut self, delay: Duration) -> Self {
        self.restart_delay = delay;
        self
    }

    pub fn with_install_command(mut self, cmd: CommandSpec) -> Self {
        self.install_command = Some(cmd);
        self
    }

    pub fn with_environment(mut self, environment: EnvironmentSpec) -> Self {
        self.environment = environment;
        self
    }
}
