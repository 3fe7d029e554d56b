// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the install and worker
//! commands using `tokio::process::Command`.
//!
//! - [`command`] defines [`CommandSpec`], the program + args of a child.
//! - [`backend`] provides the [`ProcessBackend`] trait the supervisor talks
//!   to, so tests can swap in a scripted fake.
//! - [`process`] is the production backend, [`RealProcessBackend`].

pub mod backend;
pub mod command;
pub mod process;

pub use backend::{BoxFuture, ProcessBackend, WorkerProcess};
pub use command::CommandSpec;
pub use process::RealProcessBackend;
