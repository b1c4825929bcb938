// src/workload/mod.rs

//! Workloads described in TOML and run on the scheduler.
//!
//! - [`graph`] orders the configured tasks so each is built after its
//!   dependencies.
//! - [`runner`] builds the tasks, submits them and collects their reports.

pub mod graph;
pub mod runner;

pub use graph::WorkloadGraph;
pub use runner::{TaskReport, Workload};
