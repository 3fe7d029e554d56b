// src/env/mod.rs

//! Runtime environment preparation.
//!
//! Two startup prerequisites live here, both fatal on failure:
//! - [`workdir`] resolves and checks the configured working directory.
//! - [`venv`] turns an [`EnvironmentSpec`] into a [`PreparedEnvironment`]
//!   through the [`EnvironmentActivator`] seam.
//!
//! Nothing in this module changes the supervisor's own process state. The
//! prepared environment is applied to each child command explicitly.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::errors::Result;

pub mod venv;
pub mod workdir;

pub use venv::VenvActivator;
pub use workdir::resolve_working_directory;

/// Which runtime environment children should run in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentSpec {
    /// Use the supervisor's own environment unchanged.
    Inherit,
    /// Activate an isolated environment directory. Relative paths are
    /// resolved against the working directory.
    Venv { path: PathBuf },
}

/// Everything a child process needs on top of the supervisor's own
/// environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedEnvironment {
    pub working_directory: PathBuf,
    /// Variables to set on each child.
    pub vars: Vec<(String, OsString)>,
    /// Variables to remove from each child.
    pub removed: Vec<String>,
}

impl PreparedEnvironment {
    /// Environment that only pins the working directory.
    pub fn inherit(working_directory: impl Into<PathBuf>) -> Self {
        Self {
            working_directory: working_directory.into(),
            vars: Vec::new(),
            removed: Vec::new(),
        }
    }

    pub fn var(&self, name: &str) -> Option<&OsString> {
        self.vars
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }
}

/// Seam for the external "activate the environment" step.
///
/// Activation is a single blocking call that either yields a ready
/// environment or fails. There is no retry; a broken environment does not
/// fix itself.
pub trait EnvironmentActivator: Send + Sync {
    fn activate(
        &self,
        working_directory: &Path,
        spec: &EnvironmentSpec,
    ) -> Result<PreparedEnvironment>;
}
