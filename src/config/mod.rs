// src/config/mod.rs

//! Workload configuration.
//!
//! - [`model`] mirrors the TOML layout (`[scheduler]`, `[task.<name>]`).
//! - [`loader`] reads and parses files.
//! - [`validate`] turns a [`RawConfigFile`] into a checked [`ConfigFile`].

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_from_str};
pub use model::{ConfigFile, RawConfigFile, SchedulerSection, TaskConfig, TaskKind};
