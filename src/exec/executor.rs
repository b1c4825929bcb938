// src/exec/executor.rs

//! Single-threaded cooperative executor.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, error, trace};

use crate::errors::Result;
use crate::exec::DEFAULT_THREAD_NAME;
use crate::task::{BoxedTask, display_name};

/// State shared between the executor handle and its worker thread.
struct Shared {
    /// Tasks waiting for the next pass. Producers append here.
    queue: Mutex<Vec<BoxedTask>>,
    /// Notified when a task is enqueued or a stop is requested.
    task_available: Condvar,
    stop: AtomicBool,
}

/// One worker thread running a non-preemptive round-robin over its tasks.
///
/// Each pass takes every queued task, steps each one once in FIFO order,
/// drops the ones that are done and puts the rest back. Tasks on the same
/// executor never run concurrently; they only interleave step by step.
///
/// Dropping the executor requests a stop and joins the worker: the pass in
/// flight finishes, no new pass starts, and tasks still queued at that point
/// are dropped without completing.
pub struct TaskExecutor {
    id: usize,
    shared: Arc<Shared>,
    handle: Option<JoinHandle<()>>,
}

impl TaskExecutor {
    /// Start a standalone executor with the default thread name.
    pub fn new() -> Result<Self> {
        Self::spawn(0, DEFAULT_THREAD_NAME)
    }

    /// Start executor number `id` on a thread named `{thread_name}-{id}`.
    pub fn spawn(id: usize, thread_name: &str) -> Result<Self> {
        let shared = Arc::new(Shared {
            queue: Mutex::new(Vec::new()),
            task_available: Condvar::new(),
            stop: AtomicBool::new(false),
        });

        let worker_shared = Arc::clone(&shared);
        let handle = thread::Builder::new()
            .name(format!("{thread_name}-{id}"))
            .spawn(move || run_loop(id, &worker_shared))?;

        Ok(Self {
            id,
            shared,
            handle: Some(handle),
        })
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// Hand `task` over to this executor and wake its worker.
    pub fn enqueue_task(&self, task: BoxedTask) {
        trace!(executor = self.id, task = %display_name(&*task), "enqueue task");
        self.shared.queue.lock().push(task);
        self.shared.task_available.notify_one();
    }

    /// Number of tasks waiting for the next pass.
    ///
    /// Tasks being stepped by the pass in flight are not counted.
    pub fn queued_tasks(&self) -> usize {
        self.shared.queue.lock().len()
    }

    fn request_stop(&self) {
        // Set the flag under the queue lock so a worker about to wait cannot
        // miss the notification.
        let _queue = self.shared.queue.lock();
        self.shared.stop.store(true, Ordering::Release);
        self.shared.task_available.notify_one();
    }
}

impl Drop for TaskExecutor {
    fn drop(&mut self) {
        self.request_stop();

        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!(executor = self.id, "executor thread panicked");
            }
        }
    }
}

impl std::fmt::Debug for TaskExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskExecutor")
            .field("id", &self.id)
            .field("queued_tasks", &self.queued_tasks())
            .finish_non_exhaustive()
    }
}

/// Build a standalone executor.
pub fn make_task_executor() -> Result<TaskExecutor> {
    TaskExecutor::new()
}

/// Worker thread main loop.
fn run_loop(id: usize, shared: &Shared) {
    debug!(executor = id, "executor loop started");

    // Reused between passes; producers keep appending to `shared.queue`
    // while this buffer is being stepped.
    let mut working: Vec<BoxedTask> = Vec::new();

    loop {
        {
            let mut queue = shared.queue.lock();
            while queue.is_empty() && !shared.stop.load(Ordering::Acquire) {
                shared.task_available.wait(&mut queue);
            }
            if shared.stop.load(Ordering::Acquire) {
                break;
            }
            std::mem::swap(&mut *queue, &mut working);
        }

        let stepped = working.len();
        let retired = run_pass(id, &mut working);
        trace!(executor = id, stepped, retired, "pass finished");

        if !working.is_empty() {
            // Survivors stay ahead of tasks enqueued during the pass.
            let mut queue = shared.queue.lock();
            working.append(&mut *queue);
            std::mem::swap(&mut *queue, &mut working);
        }

        if shared.stop.load(Ordering::Acquire) {
            break;
        }

        // Nothing finished: everything left is blocked or mid-computation.
        // Give other threads a chance before polling again.
        if stepped > 0 && retired == 0 {
            thread::yield_now();
        }
    }

    let abandoned = shared.queue.lock().len();
    if abandoned > 0 {
        debug!(executor = id, abandoned, "executor stopped with unfinished tasks");
    }
    debug!(executor = id, "executor loop finished");
}

/// Step every task once, in order, and drop the finished ones.
///
/// Returns how many tasks were removed.
fn run_pass(executor: usize, working: &mut Vec<BoxedTask>) -> usize {
    let before = working.len();

    working.retain_mut(|task| {
        match panic::catch_unwind(AssertUnwindSafe(|| task.step())) {
            Ok(()) => {
                if task.done() {
                    trace!(executor, task = %display_name(&**task), "task done");
                    false
                } else {
                    true
                }
            }
            Err(payload) => {
                error!(
                    executor,
                    task = %display_name(&**task),
                    panic = %panic_message(payload.as_ref()),
                    "task panicked during step; dropping it without signalling completion"
                );
                false
            }
        }
    });

    before - working.len()
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "<non-string panic payload>"
    }
}
