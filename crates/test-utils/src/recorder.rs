use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tasksched::sync::Dependency;

/// Thread-safe log of events, shared by the tasks of a test.
///
/// Tasks push a label when they run; the test then asserts on the order.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, event: impl Into<String>) {
        self.events.lock().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Position of the first occurrence of `event`.
    pub fn position(&self, event: &str) -> Option<usize> {
        self.events.lock().iter().position(|e| e == event)
    }
}

/// Wait on every dependency, panicking if any misses the 5 second budget.
pub fn wait_all(deps: &[Dependency]) {
    for (i, dep) in deps.iter().enumerate() {
        assert!(
            dep.wait_for(Duration::from_secs(5)),
            "dependency {i} not satisfied within 5 seconds"
        );
    }
}
