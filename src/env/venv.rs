// src/env/venv.rs

//! Activation of an isolated (virtualenv-style) environment directory.
//!
//! Activating such an environment amounts to three changes for child
//! processes: `VIRTUAL_ENV` points at the environment, its executables
//! directory is prepended to `PATH`, and `PYTHONHOME` is removed.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info};

use crate::env::{EnvironmentActivator, EnvironmentSpec, PreparedEnvironment};
use crate::errors::{KeepaliveError, Result};
use crate::fs::{FileSystem, RealFileSystem};

/// Name of the executables directory inside an environment.
pub fn bin_dir_name() -> &'static str {
    if cfg!(windows) { "Scripts" } else { "bin" }
}

/// Default [`EnvironmentActivator`].
///
/// The base `PATH` is captured once at construction so activation itself is
/// a pure function of the filesystem and the requested environment.
#[derive(Debug, Clone)]
pub struct VenvActivator {
    fs: Arc<dyn FileSystem>,
    base_path: Option<OsString>,
}

impl VenvActivator {
    pub fn new(fs: Arc<dyn FileSystem>, base_path: Option<OsString>) -> Self {
        Self { fs, base_path }
    }

    /// Activator over the real filesystem and the current process `PATH`.
    pub fn from_process_env() -> Self {
        Self::new(Arc::new(RealFileSystem), std::env::var_os("PATH"))
    }

    fn activate_venv(&self, working_directory: &Path, venv: &Path) -> Result<PreparedEnvironment> {
        let venv_path = if venv.is_absolute() {
            venv.to_path_buf()
        } else {
            working_directory.join(venv)
        };

        if !self.fs.is_dir(&venv_path) {
            return Err(KeepaliveError::EnvironmentActivation(format!(
                "environment directory {} does not exist",
                venv_path.display()
            )));
        }

        let venv_path = self.fs.canonicalize(&venv_path).map_err(|e| {
            KeepaliveError::EnvironmentActivation(format!(
                "cannot resolve environment directory {}: {e:#}",
                venv_path.display()
            ))
        })?;

        let bin_dir = venv_path.join(bin_dir_name());
        if !self.fs.is_dir(&bin_dir) {
            return Err(KeepaliveError::EnvironmentActivation(format!(
                "{} has no {} directory; is it a virtual environment?",
                venv_path.display(),
                bin_dir_name()
            )));
        }

        let path_var = prepend_to_path(&bin_dir, self.base_path.as_ref())?;
        debug!(bin_dir = %bin_dir.display(), "prepending environment bin dir to PATH");

        Ok(PreparedEnvironment {
            working_directory: working_directory.to_path_buf(),
            vars: vec![
                ("VIRTUAL_ENV".to_string(), venv_path.into_os_string()),
                ("PATH".to_string(), path_var),
            ],
            removed: vec!["PYTHONHOME".to_string()],
        })
    }
}

impl EnvironmentActivator for VenvActivator {
    fn activate(
        &self,
        working_directory: &Path,
        spec: &EnvironmentSpec,
    ) -> Result<PreparedEnvironment> {
        match spec {
            EnvironmentSpec::Inherit => {
                info!("using inherited environment (no activation)");
                Ok(PreparedEnvironment::inherit(working_directory))
            }
            EnvironmentSpec::Venv { path } => {
                let prepared = self.activate_venv(working_directory, path)?;
                info!(
                    venv = ?prepared.var("VIRTUAL_ENV"),
                    "environment activated"
                );
                Ok(prepared)
            }
        }
    }
}

fn prepend_to_path(dir: &Path, base: Option<&OsString>) -> Result<OsString> {
    let mut entries: Vec<PathBuf> = vec![dir.to_path_buf()];
    if let Some(base) = base {
        entries.extend(std::env::split_paths(base));
    }

    std::env::join_paths(entries).map_err(|e| {
        KeepaliveError::EnvironmentActivation(format!(
            "cannot build PATH with {}: {e}",
            dir.display()
        ))
    })
}
