// src/sync/cell.rs

//! Write-once cell shared between one writer and any number of readers.

use std::fmt;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

/// A value slot that is filled at most once and can be waited on from any
/// thread.
pub(crate) struct OneShot<T> {
    slot: Mutex<Option<T>>,
    filled: Condvar,
}

impl<T> OneShot<T> {
    pub(crate) fn new() -> Self {
        Self {
            slot: Mutex::new(None),
            filled: Condvar::new(),
        }
    }

    /// Store `value` and wake every waiter.
    ///
    /// Returns `false` (and drops `value`) if the cell was already filled.
    pub(crate) fn set(&self, value: T) -> bool {
        let mut slot = self.slot.lock();
        if slot.is_some() {
            return false;
        }
        *slot = Some(value);
        self.filled.notify_all();
        true
    }

    pub(crate) fn is_set(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Block until the cell is filled, then apply `f` to the stored value.
    pub(crate) fn wait_with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let mut slot = self.slot.lock();
        loop {
            if let Some(value) = slot.as_ref() {
                return f(value);
            }
            self.filled.wait(&mut slot);
        }
    }

    /// Like [`OneShot::wait_with`] but gives up after `timeout`.
    ///
    /// A zero timeout never blocks.
    pub(crate) fn wait_timeout_with<R>(
        &self,
        timeout: Duration,
        f: impl FnOnce(&T) -> R,
    ) -> Option<R> {
        let mut slot = self.slot.lock();

        if timeout.is_zero() {
            return slot.as_ref().map(f);
        }

        // Durations too large to represent as a deadline mean "forever".
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            drop(slot);
            return Some(self.wait_with(f));
        };

        loop {
            if let Some(value) = slot.as_ref() {
                return Some(f(value));
            }
            if self.filled.wait_until(&mut slot, deadline).timed_out() {
                return slot.as_ref().map(f);
            }
        }
    }
}

impl<T> fmt::Debug for OneShot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OneShot")
            .field("set", &self.is_set())
            .finish()
    }
}
