// src/config/validate.rs

use std::path::PathBuf;

use crate::config::duration::parse_duration;
use crate::config::model::{
    DEFAULT_VENV, EnvironmentSection, RawConfigFile, SupervisorConfig,
};
use crate::env::EnvironmentSpec;
use crate::errors::{KeepaliveError, Result};
use crate::exec::CommandSpec;

impl TryFrom<RawConfigFile> for SupervisorConfig {
    type Error = KeepaliveError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let working_directory = validate_working_directory(&raw.supervisor.working_directory)?;

        let restart_delay = parse_duration(&raw.supervisor.restart_delay).map_err(|e| {
            KeepaliveError::ConfigError(format!("[supervisor].restart_delay: {e}"))
        })?;

        let worker_command = command_from_argv("worker", &raw.worker.cmd)?;

        let install_command = if raw.install.enabled {
            Some(command_from_argv("install", &raw.install.cmd)?)
        } else {
            None
        };

        let environment = validate_environment(&raw.environment)?;

        Ok(SupervisorConfig {
            working_directory,
            restart_delay,
            worker_command,
            install_command,
            environment,
        })
    }
}

fn validate_working_directory(s: &str) -> Result<PathBuf> {
    if s.trim().is_empty() {
        return Err(KeepaliveError::ConfigError(
            "[supervisor].working_directory must not be empty".to_string(),
        ));
    }
    Ok(PathBuf::from(s))
}

fn command_from_argv(section: &str, argv: &[String]) -> Result<CommandSpec> {
    let Some((program, args)) = argv.split_first() else {
        return Err(KeepaliveError::ConfigError(format!(
            "[{section}].cmd must contain at least the program to run"
        )));
    };

    if program.trim().is_empty() {
        return Err(KeepaliveError::ConfigError(format!(
            "[{section}].cmd has an empty program name"
        )));
    }

    Ok(CommandSpec::new(program.clone()).args(args.iter().cloned()))
}

fn validate_environment(section: &EnvironmentSection) -> Result<EnvironmentSpec> {
    match (section.inherit, section.venv.as_deref()) {
        (true, Some(_)) => Err(KeepaliveError::ConfigError(
            "[environment] cannot set both `inherit = true` and `venv`".to_string(),
        )),
        (true, None) => Ok(EnvironmentSpec::Inherit),
        (false, Some(venv)) if venv.trim().is_empty() => Err(KeepaliveError::ConfigError(
            "[environment].venv must not be empty".to_string(),
        )),
        (false, venv) => Ok(EnvironmentSpec::Venv {
            path: PathBuf::from(venv.unwrap_or(DEFAULT_VENV)),
        }),
    }
}
