// src/exec/scheduler.rs

use tracing::{info, warn};

use crate::config::model::SchedulerSection;
use crate::errors::{Result, SchedulerError};
use crate::exec::DEFAULT_THREAD_NAME;
use crate::exec::executor::TaskExecutor;
use crate::task::{BoxedTask, display_name};

/// Fixed-size pool of [`TaskExecutor`]s addressed by index.
///
/// The number of executors (the concurrency level) is chosen at construction
/// and never changes. Dropping the scheduler stops and joins every executor.
#[derive(Debug)]
pub struct AsyncTaskScheduler {
    executors: Vec<TaskExecutor>,
}

impl AsyncTaskScheduler {
    /// Start `concurrency_level` executors.
    ///
    /// Fails with [`SchedulerError::ConfigError`] if `concurrency_level` is 0.
    pub fn new(concurrency_level: usize) -> Result<Self> {
        Self::with_thread_name(concurrency_level, DEFAULT_THREAD_NAME)
    }

    /// Build a scheduler from the `[scheduler]` config section.
    pub fn from_config(section: &SchedulerSection) -> Result<Self> {
        Self::with_thread_name(section.concurrency_level, &section.thread_name)
    }

    /// Like [`AsyncTaskScheduler::new`], naming worker threads
    /// `{thread_name}-{index}`.
    pub fn with_thread_name(concurrency_level: usize, thread_name: &str) -> Result<Self> {
        if concurrency_level == 0 {
            return Err(SchedulerError::ConfigError(
                "concurrency level must be greater than 0".to_string(),
            ));
        }

        let executors = (0..concurrency_level)
            .map(|id| TaskExecutor::spawn(id, thread_name))
            .collect::<Result<Vec<_>>>()?;

        info!(concurrency_level, thread_name, "scheduler started");

        Ok(Self { executors })
    }

    pub fn concurrency_level(&self) -> usize {
        self.executors.len()
    }

    /// Hand `task` to executor `thread_id`.
    ///
    /// An index outside `0..concurrency_level()` is rejected with
    /// [`SchedulerError::ExecutorOutOfRange`]; the task is dropped without
    /// running and no executor is touched.
    pub fn enqueue_task(&self, task: BoxedTask, thread_id: usize) -> Result<()> {
        match self.executors.get(thread_id) {
            Some(executor) => {
                executor.enqueue_task(task);
                Ok(())
            }
            None => {
                warn!(
                    task = %display_name(&*task),
                    thread_id,
                    concurrency_level = self.concurrency_level(),
                    "rejecting task for unknown executor"
                );
                Err(SchedulerError::ExecutorOutOfRange {
                    index: thread_id,
                    concurrency_level: self.concurrency_level(),
                })
            }
        }
    }

    /// Access a single executor, e.g. to inspect its queue.
    pub fn executor(&self, thread_id: usize) -> Option<&TaskExecutor> {
        self.executors.get(thread_id)
    }
}

/// Build a scheduler with `concurrency_level` executors.
pub fn make_async_task_scheduler(concurrency_level: usize) -> Result<AsyncTaskScheduler> {
    AsyncTaskScheduler::new(concurrency_level)
}
