// src/sync/signal.rs

//! Completion signal owned by a task, and the read-only [`Dependency`]
//! handles other tasks hold on it.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use super::cell::OneShot;

/// One-shot completion flag.
///
/// Exactly one owner (the task) fires it; any number of [`Dependency`]
/// handles observe it.
#[derive(Debug)]
pub struct Signal {
    cell: Arc<OneShot<()>>,
}

impl Signal {
    pub fn new() -> Self {
        Self {
            cell: Arc::new(OneShot::new()),
        }
    }

    /// Fire the signal, waking everything blocked on a [`Dependency`].
    ///
    /// Returns `false` if the signal had already fired. Callers must only
    /// complete a signal once; a repeated call leaves it untouched.
    pub fn signal_completion(&self) -> bool {
        let fired = self.cell.set(());
        if !fired {
            warn!("signal_completion called on an already completed signal; ignoring");
        }
        fired
    }

    /// Non-blocking check of whether the signal has fired.
    pub fn is_signalled(&self) -> bool {
        self.cell.is_set()
    }

    /// Read-only view of this signal.
    pub fn dependency(&self) -> Dependency {
        Dependency {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl Default for Signal {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only handle on another task's [`Signal`].
///
/// Cheap to clone and safe to share between threads. Holding a dependency
/// does not keep the task itself alive.
#[derive(Clone)]
pub struct Dependency {
    cell: Arc<OneShot<()>>,
}

impl Dependency {
    /// Block until the signal fires. Never returns if it never fires.
    pub fn wait(&self) {
        self.cell.wait_with(|_| ());
    }

    /// Wait at most `timeout` for the signal.
    ///
    /// Returns `true` iff the signal fired in time. `Duration::ZERO` polls
    /// without blocking.
    pub fn wait_for(&self, timeout: Duration) -> bool {
        self.cell.wait_timeout_with(timeout, |_| ()).is_some()
    }

    /// Non-blocking poll.
    pub fn is_ready(&self) -> bool {
        self.wait_for(Duration::ZERO)
    }
}

impl From<&Signal> for Dependency {
    fn from(signal: &Signal) -> Self {
        signal.dependency()
    }
}

impl fmt::Debug for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dependency")
            .field("ready", &self.is_ready())
            .finish()
    }
}
