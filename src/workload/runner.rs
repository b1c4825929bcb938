// src/workload/runner.rs

use std::collections::HashMap;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::anyhow;
use tracing::{debug, info};

use crate::config::model::{ConfigFile, TaskConfig, TaskKind};
use crate::errors::{Result, SchedulerError};
use crate::exec::{AsyncTaskScheduler, TaskManager};
use crate::sync::{Dependency, TaskResult};
use crate::task::{AtomicTask, BoxedTask, Resume, ResumableTask, Task};
use crate::workload::graph::WorkloadGraph;

/// What a workload task reports once it has finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskReport {
    pub name: String,
    /// Steps the task needed once unblocked.
    pub steps: usize,
    /// Name of the worker thread that ran the final step.
    pub thread: String,
}

/// Handles kept by the caller after the tasks themselves are submitted.
#[derive(Debug)]
struct TaskHandle {
    name: String,
    done: Dependency,
    result: TaskResult<TaskReport>,
}

/// A task built from config but not submitted yet.
struct PendingTask {
    executor: Option<usize>,
    task: BoxedTask,
}

/// A set of tasks built from a [`ConfigFile`], wired together through their
/// `after` dependencies.
pub struct Workload {
    handles: Vec<TaskHandle>,
    pending: Vec<PendingTask>,
}

impl Workload {
    /// Build one task per `[task.<name>]` entry, in topological order.
    pub fn build(cfg: &ConfigFile) -> Result<Self> {
        let graph = WorkloadGraph::from_config(cfg)?;

        let mut signals: HashMap<&str, Dependency> = HashMap::new();
        let mut handles = Vec::with_capacity(cfg.task.len());
        let mut pending = Vec::with_capacity(cfg.task.len());

        for name in graph.topological_order() {
            let config = cfg
                .task
                .get(name)
                .ok_or_else(|| SchedulerError::TaskNotFound(name.clone()))?;

            let (mut task, result) = build_task(name, config);
            task.set_label(name.clone());

            for dep in graph.dependencies_of(name) {
                let signal = signals
                    .get(dep.as_str())
                    .ok_or_else(|| SchedulerError::TaskNotFound(dep.clone()))?;
                task.add_dependency(signal.clone());
            }

            debug!(
                task = %name,
                kind = ?config.kind,
                steps = config.effective_steps(),
                after = ?config.after,
                executor = ?config.executor,
                "built workload task"
            );

            signals.insert(name.as_str(), task.dependency());
            handles.push(TaskHandle {
                name: name.clone(),
                done: task.dependency(),
                result,
            });
            pending.push(PendingTask {
                executor: config.executor,
                task,
            });
        }

        Ok(Self { handles, pending })
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Task names in topological order.
    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.handles.iter().map(|h| h.name.as_str())
    }

    /// Completion handle for the named task.
    pub fn dependency(&self, name: &str) -> Option<Dependency> {
        self.handles
            .iter()
            .find(|h| h.name == name)
            .map(|h| h.done.clone())
    }

    /// Hand every built task to `scheduler`.
    ///
    /// Tasks pinned with `executor = N` go to that executor; the rest are
    /// spread round-robin. Calling this again submits nothing.
    pub fn submit(&mut self, scheduler: &AsyncTaskScheduler) -> Result<()> {
        let mut manager = TaskManager::new(scheduler);

        for PendingTask { executor, task } in self.pending.drain(..) {
            match executor {
                Some(index) => scheduler.enqueue_task(task, index)?,
                None => manager.enqueue_task(task)?,
            }
        }

        info!(tasks = self.handles.len(), "workload submitted");
        Ok(())
    }

    /// Wait up to `timeout` for every task and collect their reports in
    /// topological order.
    pub fn wait(&self, timeout: Duration) -> Result<Vec<TaskReport>> {
        let start = Instant::now();
        let mut unfinished = Vec::new();

        for handle in &self.handles {
            let remaining = timeout.saturating_sub(start.elapsed());
            if !handle.done.wait_for(remaining) {
                unfinished.push(handle.name.as_str());
            }
        }

        if !unfinished.is_empty() {
            return Err(SchedulerError::Other(anyhow!(
                "timed out after {:?} waiting for tasks: {}",
                timeout,
                unfinished.join(", ")
            )));
        }

        self.handles
            .iter()
            .map(|handle| {
                handle.result.get_timeout(Duration::ZERO).ok_or_else(|| {
                    SchedulerError::Other(anyhow!(
                        "task '{}' signalled completion without a result",
                        handle.name
                    ))
                })
            })
            .collect()
    }
}

impl std::fmt::Debug for Workload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Workload")
            .field("tasks", &self.handles)
            .field("unsubmitted", &self.pending.len())
            .finish()
    }
}

fn build_task(name: &str, config: &TaskConfig) -> (BoxedTask, TaskResult<TaskReport>) {
    let work = Duration::from_millis(config.work_ms);
    let steps = config.effective_steps();
    let name = name.to_string();

    match config.kind {
        TaskKind::Atomic => {
            let task = AtomicTask::new(move || {
                simulate_work(work);
                report(name, 1)
            });
            let result = task.result();
            (Box::new(task), result)
        }
        TaskKind::Resumable => {
            let mut taken = 0;
            let task = ResumableTask::new(move || {
                simulate_work(work);
                taken += 1;
                if taken < steps {
                    Resume::Suspended
                } else {
                    Resume::Finished(report(name.clone(), taken))
                }
            });
            let result = task.result();
            (Box::new(task), result)
        }
    }
}

fn simulate_work(work: Duration) {
    if !work.is_zero() {
        thread::sleep(work);
    }
}

fn report(name: String, steps: usize) -> TaskReport {
    TaskReport {
        name,
        steps,
        thread: thread::current()
            .name()
            .unwrap_or("<unnamed>")
            .to_string(),
    }
}
