// src/task/resumable.rs

//! Step-wise resumable tasks.
//!
//! A [`Computation`] is a suspendable piece of work: each call to
//! [`Computation::resume`] runs it up to its next suspension point and
//! reports whether it paused or returned. Local progress lives in the
//! computation value itself, so resuming picks up exactly where the previous
//! call left off.
//!
//! A [`ResumableTask`] starts suspended at the beginning of its computation.
//! A computation that pauses `k` times before returning therefore has
//! `k + 1` suspension points and needs exactly `k + 1` steps to finish.

use std::collections::VecDeque;
use std::fmt;

use crate::sync::{Promise, TaskResult};
use crate::task::{Task, TaskCore};

/// Outcome of resuming a [`Computation`] once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resume<R> {
    /// Paused at a suspension point; resume again later.
    Suspended,
    /// Ran past its final point and produced a value.
    Finished(R),
}

/// A computation that can pause and be resumed from the same point.
///
/// `resume` is never called again after it has returned
/// [`Resume::Finished`].
pub trait Computation: Send {
    type Output;

    fn resume(&mut self) -> Resume<Self::Output>;
}

impl<F, R> Computation for F
where
    F: FnMut() -> Resume<R> + Send,
{
    type Output = R;

    fn resume(&mut self) -> Resume<R> {
        self()
    }
}

type Stage = Box<dyn FnOnce() + Send>;

/// A computation written as a straight sequence of stages with a suspension
/// point between each, ending in a final stage that produces the value.
///
/// ```
/// use tasksched::task::{Computation, Resume, Stages};
///
/// let mut greeting = Stages::builder()
///     .then(|| {})
///     .finish(|| "Task 1".to_string());
///
/// assert_eq!(greeting.resume(), Resume::Suspended);
/// assert_eq!(greeting.resume(), Resume::Finished("Task 1".to_string()));
/// ```
pub struct Stages<R> {
    stages: VecDeque<Stage>,
    finish: Option<Box<dyn FnOnce() -> R + Send>>,
}

impl Stages<()> {
    pub fn builder() -> StagesBuilder {
        StagesBuilder::default()
    }
}

impl<R> Stages<R> {
    /// Number of resumes still needed to finish.
    pub fn remaining(&self) -> usize {
        self.stages.len() + usize::from(self.finish.is_some())
    }
}

impl<R> Computation for Stages<R> {
    type Output = R;

    fn resume(&mut self) -> Resume<R> {
        if let Some(stage) = self.stages.pop_front() {
            stage();
            return Resume::Suspended;
        }

        match self.finish.take() {
            Some(finish) => Resume::Finished(finish()),
            // Resumed after finishing; nothing left to run.
            None => Resume::Suspended,
        }
    }
}

/// Collects the intermediate stages of a [`Stages`] computation.
#[derive(Default)]
pub struct StagesBuilder {
    stages: VecDeque<Stage>,
}

impl StagesBuilder {
    /// Append a stage followed by a suspension point.
    pub fn then<F>(mut self, stage: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        self.stages.push_back(Box::new(stage));
        self
    }

    /// Add `count` stages that do nothing but suspend.
    pub fn suspend(mut self, count: usize) -> Self {
        for _ in 0..count {
            self.stages.push_back(Box::new(|| {}));
        }
        self
    }

    pub fn finish<F, R>(self, finish: F) -> Stages<R>
    where
        F: FnOnce() -> R + Send + 'static,
    {
        Stages {
            stages: self.stages,
            finish: Some(Box::new(finish)),
        }
    }
}

impl fmt::Debug for StagesBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StagesBuilder")
            .field("stages", &self.stages.len())
            .finish()
    }
}

impl<R> fmt::Debug for Stages<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stages")
            .field("remaining", &self.remaining())
            .finish()
    }
}

/// Task driving a [`Computation`] one suspension point per step.
///
/// Tasks sharing an executor interleave between suspension points, so long
/// work should be split into many short stages.
pub struct ResumableTask<R> {
    core: TaskCore,
    computation: Option<Box<dyn Computation<Output = R>>>,
    promise: Option<Promise<R>>,
    result: TaskResult<R>,
    steps_taken: usize,
}

impl<R: Send + 'static> ResumableTask<R> {
    pub fn new<C>(computation: C) -> Self
    where
        C: Computation<Output = R> + 'static,
    {
        let promise = Promise::new();
        let result = promise.result();
        Self {
            core: TaskCore::new(),
            computation: Some(Box::new(computation)),
            promise: Some(promise),
            result,
            steps_taken: 0,
        }
    }

    pub fn result(&self) -> TaskResult<R> {
        self.result.clone()
    }

    /// Number of steps that actually resumed the computation.
    pub fn steps_taken(&self) -> usize {
        self.steps_taken
    }
}

impl<R: Send + 'static> Task for ResumableTask<R> {
    fn step(&mut self) {
        if !self.core.are_dependencies_met() {
            return;
        }

        let Some(computation) = self.computation.as_mut() else {
            return;
        };

        self.steps_taken += 1;
        if let Resume::Finished(value) = computation.resume() {
            // The finished computation (and whatever it captured) is released
            // here rather than when the executor drops the task.
            self.computation = None;
            if let Some(promise) = self.promise.take() {
                promise.fulfil(value);
            }
            self.core.complete();
        }
    }

    fn done(&self) -> bool {
        self.computation.is_none()
    }

    fn core(&self) -> &TaskCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut TaskCore {
        &mut self.core
    }
}

impl<R> fmt::Debug for ResumableTask<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResumableTask")
            .field("core", &self.core)
            .field("steps_taken", &self.steps_taken)
            .field("done", &self.computation.is_none())
            .finish_non_exhaustive()
    }
}

/// Build a boxed [`ResumableTask`] together with the handle to its result.
pub fn make_resumable_task<C, R>(computation: C) -> (Box<ResumableTask<R>>, TaskResult<R>)
where
    C: Computation<Output = R> + 'static,
    R: Send + 'static,
{
    let task = ResumableTask::new(computation);
    let result = task.result();
    (Box::new(task), result)
}
