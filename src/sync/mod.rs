// src/sync/mod.rs

//! Cross-thread one-shot primitives.
//!
//! - [`signal`] holds the completion [`Signal`] every task owns and the
//!   read-only [`Dependency`] view other tasks wait on.
//! - [`result`] holds the typed [`Promise`] / [`TaskResult`] pair used to
//!   hand a task's return value to whoever asks for it.
//!
//! Both are built on a single write-once cell, so every value crossing
//! threads in this crate is written exactly once and read any number of
//! times.

mod cell;
pub mod result;
pub mod signal;

pub use result::{Promise, TaskResult};
pub use signal::{Dependency, Signal};
