// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::exec::DEFAULT_THREAD_NAME;

/// Workload file as read from TOML, before validation.
///
/// ```toml
/// [scheduler]
/// concurrency_level = 4
/// thread_name = "tasksched-worker"
///
/// [task.fetch]
/// steps = 3
/// work_ms = 5
///
/// [task.decode]
/// kind = "atomic"
/// after = ["fetch"]
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    /// Pool settings from `[scheduler]`.
    #[serde(default)]
    pub scheduler: SchedulerSection,

    /// All tasks from `[task.<name>]`, keyed by task name.
    #[serde(default)]
    pub task: BTreeMap<String, TaskConfig>,
}

/// Validated workload file.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (see
/// [`crate::config::validate`]), so holders can rely on:
/// - at least one task,
/// - a non-zero concurrency level,
/// - every `after` entry naming another task,
/// - an acyclic `after` graph,
/// - every pinned `executor` index being in range.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub scheduler: SchedulerSection,
    pub task: BTreeMap<String, TaskConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        scheduler: SchedulerSection,
        task: BTreeMap<String, TaskConfig>,
    ) -> Self {
        Self { scheduler, task }
    }
}

/// `[scheduler]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerSection {
    /// Number of executor threads. Defaults to the available parallelism.
    #[serde(default = "default_concurrency_level")]
    pub concurrency_level: usize,

    /// Worker threads are named `{thread_name}-{index}`.
    #[serde(default = "default_thread_name")]
    pub thread_name: String,
}

fn default_concurrency_level() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn default_thread_name() -> String {
    DEFAULT_THREAD_NAME.to_string()
}

impl Default for SchedulerSection {
    fn default() -> Self {
        Self {
            concurrency_level: default_concurrency_level(),
            thread_name: default_thread_name(),
        }
    }
}

/// Which task variant a `[task.<name>]` entry becomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskKind {
    /// Runs all of its work in a single step.
    Atomic,
    /// Runs `steps` increments, yielding to sibling tasks in between.
    #[default]
    Resumable,
}

/// `[task.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    #[serde(default)]
    pub kind: TaskKind,

    /// Number of suspension points (resumable tasks only).
    #[serde(default = "default_steps")]
    pub steps: usize,

    /// Simulated work per step, in milliseconds.
    #[serde(default)]
    pub work_ms: u64,

    /// Tasks that must complete before this one starts.
    #[serde(default)]
    pub after: Vec<String>,

    /// Pin the task to this executor instead of round-robin placement.
    #[serde(default)]
    pub executor: Option<usize>,
}

fn default_steps() -> usize {
    1
}

impl TaskConfig {
    /// Number of `step()` calls the task needs once unblocked.
    pub fn effective_steps(&self) -> usize {
        match self.kind {
            TaskKind::Atomic => 1,
            TaskKind::Resumable => self.steps,
        }
    }
}
