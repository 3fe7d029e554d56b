// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! Only the startup prerequisites produce errors that stop the supervisor.
//! Failures of the install step or of a worker run are reported as
//! [`crate::types::RunOutcome`] values instead.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KeepaliveError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Working directory {path:?} is unusable: {reason}")]
    WorkingDirectory { path: PathBuf, reason: String },

    #[error("Environment activation failed: {0}")]
    EnvironmentActivation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KeepaliveError {
    /// Whether this error belongs to the startup prerequisites that abort
    /// the supervisor before any worker is launched.
    pub fn is_startup_failure(&self) -> bool {
        matches!(
            self,
            KeepaliveError::WorkingDirectory { .. } | KeepaliveError::EnvironmentActivation(_)
        )
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, KeepaliveError>;
