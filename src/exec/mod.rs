// src/exec/mod.rs

//! Task execution layer.
//!
//! - [`executor`] owns [`TaskExecutor`]: one worker thread stepping its
//!   queued tasks round-robin until each reports done.
//! - [`scheduler`] provides [`AsyncTaskScheduler`], a fixed pool of
//!   executors addressed by index.
//! - [`manager`] provides [`TaskManager`], which spreads submissions over the
//!   pool round-robin so callers need not track executor indices.

pub mod executor;
pub mod manager;
pub mod scheduler;

pub use executor::{TaskExecutor, make_task_executor};
pub use manager::{TaskManager, make_task_manager};
pub use scheduler::{AsyncTaskScheduler, make_async_task_scheduler};

/// Worker thread name prefix used when none is configured.
pub const DEFAULT_THREAD_NAME: &str = "tasksched-worker";
