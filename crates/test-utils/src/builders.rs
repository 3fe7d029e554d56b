#![allow(dead_code)]

use keepalive::config::{RawConfigFile, SupervisorConfig};

/// Builder for `SupervisorConfig` that goes through the same validation as a
/// TOML file does.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        let mut config = RawConfigFile::default();
        config.environment.inherit = true;
        config.install.enabled = false;
        Self { config }
    }

    pub fn working_directory(mut self, dir: &str) -> Self {
        self.config.supervisor.working_directory = dir.to_string();
        self
    }

    pub fn restart_delay(mut self, delay: &str) -> Self {
        self.config.supervisor.restart_delay = delay.to_string();
        self
    }

    pub fn worker(mut self, argv: &[&str]) -> Self {
        self.config.worker.cmd = argv.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn install(mut self, argv: &[&str]) -> Self {
        self.config.install.cmd = argv.iter().map(|s| s.to_string()).collect();
        self.config.install.enabled = true;
        self
    }

    pub fn venv(mut self, path: &str) -> Self {
        self.config.environment.inherit = false;
        self.config.environment.venv = Some(path.to_string());
        self
    }

    pub fn build(self) -> SupervisorConfig {
        SupervisorConfig::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
