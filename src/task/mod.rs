// src/task/mod.rs

//! Schedulable units of work.
//!
//! - [`Task`] is the capability every executor drives: one `step()` per pass,
//!   plus completion and dependency bookkeeping.
//! - [`atomic`] provides [`AtomicTask`], which runs a callable to completion
//!   in a single step once its dependencies are met.
//! - [`resumable`] provides [`ResumableTask`], which advances a step-wise
//!   [`Computation`] by one suspension point per step.
//!
//! State shared by both variants (the completion [`Signal`] and the
//! precondition list) lives in a composed [`TaskCore`].

pub mod atomic;
pub mod resumable;

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::sync::{Dependency, Signal};

pub use atomic::{AtomicTask, make_atomic_task};
pub use resumable::{Computation, Resume, ResumableTask, Stages, StagesBuilder, make_resumable_task};

/// Unique identifier for a task, used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(u64);

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

impl TaskId {
    fn next() -> Self {
        TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

/// State every task carries regardless of what it wraps.
#[derive(Debug)]
pub struct TaskCore {
    id: TaskId,
    label: Option<String>,
    signal: Signal,
    dependencies: Vec<Dependency>,
}

impl TaskCore {
    pub fn new() -> Self {
        Self {
            id: TaskId::next(),
            label: None,
            signal: Signal::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn id(&self) -> TaskId {
        self.id
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn set_label(&mut self, label: String) {
        self.label = Some(label);
    }

    pub fn dependency(&self) -> Dependency {
        self.signal.dependency()
    }

    pub fn add_dependency(&mut self, dependency: Dependency) {
        self.dependencies.push(dependency);
    }

    /// Non-blocking, conjunctive poll of every precondition.
    pub fn are_dependencies_met(&self) -> bool {
        self.dependencies.iter().all(Dependency::is_ready)
    }

    /// Fire this task's own signal once its work is done.
    pub(crate) fn complete(&self) {
        self.signal.signal_completion();
    }
}

impl Default for TaskCore {
    fn default() -> Self {
        Self::new()
    }
}

/// A unit of work an executor can drive.
///
/// Executors call [`Task::step`] once per pass until [`Task::done`] reports
/// `true`. A step taken while any dependency is unmet must have no side
/// effects.
///
/// Dependencies must be attached before the task is handed to an executor;
/// after that the executor owns the task and nothing else can reach it.
pub trait Task: Send {
    /// Advance the task by one unit of work, or do nothing if blocked.
    fn step(&mut self);

    /// Whether the wrapped work has fully completed.
    fn done(&self) -> bool;

    fn core(&self) -> &TaskCore;

    fn core_mut(&mut self) -> &mut TaskCore;

    fn id(&self) -> TaskId {
        self.core().id()
    }

    fn label(&self) -> Option<&str> {
        self.core().label()
    }

    fn set_label(&mut self, label: String) {
        self.core_mut().set_label(label);
    }

    /// Handle on this task's completion, for other tasks or for callers.
    fn dependency(&self) -> Dependency {
        self.core().dependency()
    }

    /// Do not run until `other` has completed.
    fn depend_on(&mut self, other: &dyn Task) {
        self.add_dependency(other.dependency());
    }

    fn add_dependency(&mut self, dependency: Dependency) {
        self.core_mut().add_dependency(dependency);
    }

    fn are_dependencies_met(&self) -> bool {
        self.core().are_dependencies_met()
    }
}

impl<T: Task + ?Sized> Task for Box<T> {
    fn step(&mut self) {
        (**self).step();
    }

    fn done(&self) -> bool {
        (**self).done()
    }

    fn core(&self) -> &TaskCore {
        (**self).core()
    }

    fn core_mut(&mut self) -> &mut TaskCore {
        (**self).core_mut()
    }
}

/// Owned, type-erased task as stored in executor queues.
pub type BoxedTask = Box<dyn Task>;

/// `label` if set, otherwise the task id. For log fields.
pub(crate) fn display_name(task: &dyn Task) -> String {
    match task.label() {
        Some(label) => label.to_string(),
        None => task.id().to_string(),
    }
}
