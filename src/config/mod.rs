// src/config/mod.rs

//! Configuration loading and validation for keepalive.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk, or fall back to built-in defaults (`loader.rs`).
//! - Validate the raw model into an immutable [`SupervisorConfig`] (`validate.rs`).

pub mod duration;
pub mod loader;
pub mod model;
pub mod validate;

pub use duration::parse_duration;
pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{
    EnvironmentSection, InstallSection, RawConfigFile, SupervisorConfig, SupervisorSection,
    WorkerSection,
};
