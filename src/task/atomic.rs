// src/task/atomic.rs

use std::fmt;

use crate::sync::{Promise, TaskResult};
use crate::task::{Task, TaskCore};

type Work<R> = Box<dyn FnOnce() -> R + Send>;

/// Task wrapping a plain callable.
///
/// Once every dependency is met, a single [`Task::step`] runs the callable to
/// completion, publishes its return value and fires the completion signal.
/// It cannot be partially advanced.
pub struct AtomicTask<R> {
    core: TaskCore,
    work: Option<Work<R>>,
    promise: Option<Promise<R>>,
    result: TaskResult<R>,
}

impl<R: Send + 'static> AtomicTask<R> {
    pub fn new<F>(work: F) -> Self
    where
        F: FnOnce() -> R + Send + 'static,
    {
        let promise = Promise::new();
        let result = promise.result();
        Self {
            core: TaskCore::new(),
            work: Some(Box::new(work)),
            promise: Some(promise),
            result,
        }
    }

    /// Bind `args` to a callable taking them.
    ///
    /// Several arguments are passed as a tuple:
    ///
    /// ```
    /// use tasksched::task::AtomicTask;
    ///
    /// let task = AtomicTask::with_args(
    ///     |(text, n): (String, i32)| format!("{text} {n}"),
    ///     ("Task".to_string(), 1),
    /// );
    /// # drop(task);
    /// ```
    pub fn with_args<F, A>(work: F, args: A) -> Self
    where
        F: FnOnce(A) -> R + Send + 'static,
        A: Send + 'static,
    {
        Self::new(move || work(args))
    }

    pub fn result(&self) -> TaskResult<R> {
        self.result.clone()
    }
}

impl<R: Send + 'static> Task for AtomicTask<R> {
    fn step(&mut self) {
        if !self.core.are_dependencies_met() {
            return;
        }

        let (Some(work), Some(promise)) = (self.work.take(), self.promise.take()) else {
            return;
        };

        promise.fulfil(work());
        self.core.complete();
    }

    fn done(&self) -> bool {
        self.result.ready()
    }

    fn core(&self) -> &TaskCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut TaskCore {
        &mut self.core
    }
}

impl<R> fmt::Debug for AtomicTask<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AtomicTask")
            .field("core", &self.core)
            .field("done", &self.result.ready())
            .finish_non_exhaustive()
    }
}

/// Build a boxed [`AtomicTask`] together with the handle to its result.
pub fn make_atomic_task<F, R>(work: F) -> (Box<AtomicTask<R>>, TaskResult<R>)
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let task = AtomicTask::new(work);
    let result = task.result();
    (Box::new(task), result)
}
