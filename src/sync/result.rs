// src/sync/result.rs

//! Typed one-shot values produced by tasks.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::cell::OneShot;

/// Write side of a [`TaskResult`].
///
/// Held by the task that produces the value. Consuming `fulfil` makes a
/// second write impossible.
pub struct Promise<T> {
    cell: Arc<OneShot<T>>,
}

impl<T> Promise<T> {
    pub fn new() -> Self {
        Self {
            cell: Arc::new(OneShot::new()),
        }
    }

    /// Publish the value to every [`TaskResult`] handle.
    pub fn fulfil(self, value: T) {
        self.cell.set(value);
    }

    pub fn is_fulfilled(&self) -> bool {
        self.cell.is_set()
    }

    pub fn result(&self) -> TaskResult<T> {
        TaskResult {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T> Default for Promise<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Promise")
            .field("fulfilled", &self.is_fulfilled())
            .finish()
    }
}

/// Read-only handle to the value a task produces.
///
/// Can be cloned and read from any thread, any number of times. Reading
/// before the task has finished blocks.
pub struct TaskResult<T> {
    cell: Arc<OneShot<T>>,
}

impl<T> TaskResult<T> {
    /// Non-blocking poll: has the value been produced?
    pub fn ready(&self) -> bool {
        self.cell.is_set()
    }
}

impl<T: Clone> TaskResult<T> {
    /// Block until the value is produced and return a copy of it.
    pub fn get(&self) -> T {
        self.cell.wait_with(T::clone)
    }

    /// Like [`TaskResult::get`] but gives up after `timeout`.
    pub fn get_timeout(&self, timeout: Duration) -> Option<T> {
        self.cell.wait_timeout_with(timeout, T::clone)
    }
}

impl<T> Clone for TaskResult<T> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T> fmt::Debug for TaskResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskResult")
            .field("ready", &self.ready())
            .finish()
    }
}
