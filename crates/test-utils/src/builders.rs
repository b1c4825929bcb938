#![allow(dead_code)]

use std::collections::BTreeMap;
use tasksched::config::{ConfigFile, RawConfigFile, SchedulerSection, TaskConfig, TaskKind};

/// Builder for `RawConfigFile` / `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                scheduler: SchedulerSection::default(),
                task: BTreeMap::new(),
            },
        }
    }

    pub fn concurrency_level(mut self, level: usize) -> Self {
        self.config.scheduler.concurrency_level = level;
        self
    }

    pub fn thread_name(mut self, name: &str) -> Self {
        self.config.scheduler.thread_name = name.to_string();
        self
    }

    pub fn with_task(mut self, name: &str, task: TaskConfig) -> Self {
        self.config.task.insert(name.to_string(), task);
        self
    }

    /// The unvalidated config, for tests that exercise validation itself.
    pub fn build_raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskConfig`.
pub struct TaskConfigBuilder {
    task: TaskConfig,
}

impl TaskConfigBuilder {
    /// A resumable task with a single step.
    pub fn resumable() -> Self {
        Self {
            task: TaskConfig {
                kind: TaskKind::Resumable,
                steps: 1,
                work_ms: 0,
                after: vec![],
                executor: None,
            },
        }
    }

    pub fn atomic() -> Self {
        let mut builder = Self::resumable();
        builder.task.kind = TaskKind::Atomic;
        builder
    }

    pub fn steps(mut self, steps: usize) -> Self {
        self.task.steps = steps;
        self
    }

    pub fn work_ms(mut self, ms: u64) -> Self {
        self.task.work_ms = ms;
        self
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.task.after.push(dep.to_string());
        self
    }

    pub fn executor(mut self, index: usize) -> Self {
        self.task.executor = Some(index);
        self
    }

    pub fn build(self) -> TaskConfig {
        self.task
    }
}
