// src/exec/manager.rs

use tracing::trace;

use crate::errors::Result;
use crate::exec::scheduler::AsyncTaskScheduler;
use crate::task::BoxedTask;

/// Round-robin submission helper over an [`AsyncTaskScheduler`].
///
/// Each submitted task goes to the executor under the cursor, then the
/// cursor moves to the next executor, wrapping at the concurrency level.
#[derive(Debug)]
pub struct TaskManager<'a> {
    scheduler: &'a AsyncTaskScheduler,
    next_executor: usize,
}

impl<'a> TaskManager<'a> {
    pub fn new(scheduler: &'a AsyncTaskScheduler) -> Self {
        Self {
            scheduler,
            next_executor: 0,
        }
    }

    /// Index of the executor the next task will go to.
    pub fn next_executor(&self) -> usize {
        self.next_executor
    }

    pub fn enqueue_task(&mut self, task: BoxedTask) -> Result<()> {
        let executor = self.next_executor;
        self.scheduler.enqueue_task(task, executor)?;
        self.next_executor = (executor + 1) % self.scheduler.concurrency_level();
        trace!(executor, next = self.next_executor, "round-robin submission");
        Ok(())
    }

    /// Submit every task in order, one executor further for each.
    pub fn enqueue_tasks<I>(&mut self, tasks: I) -> Result<()>
    where
        I: IntoIterator<Item = BoxedTask>,
    {
        for task in tasks {
            self.enqueue_task(task)?;
        }
        Ok(())
    }
}

pub fn make_task_manager(scheduler: &AsyncTaskScheduler) -> TaskManager<'_> {
    TaskManager::new(scheduler)
}
