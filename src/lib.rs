// src/lib.rs

//! Dependency-aware cooperative task scheduler.
//!
//! Work is wrapped in a [`task::Task`] (either an [`task::AtomicTask`] that
//! runs a callable in one go, or a [`task::ResumableTask`] that advances a
//! step-wise computation one suspension point at a time), optionally made to
//! wait on other tasks through [`sync::Dependency`] handles, and handed to an
//! [`exec::AsyncTaskScheduler`]. Each of the scheduler's executors owns one
//! worker thread that steps its tasks round-robin until they are done.
//!
//! ```
//! use tasksched::exec::{AsyncTaskScheduler, TaskManager};
//! use tasksched::task::{AtomicTask, Task};
//!
//! # fn main() -> tasksched::errors::Result<()> {
//! let scheduler = AsyncTaskScheduler::new(2)?;
//! let mut manager = TaskManager::new(&scheduler);
//!
//! let first = AtomicTask::new(|| 20);
//! let mut second = AtomicTask::with_args(|n: i32| n + 1, 21);
//! second.depend_on(&first);
//!
//! let answer = second.result();
//! manager.enqueue_task(Box::new(first))?;
//! manager.enqueue_task(Box::new(second))?;
//!
//! assert_eq!(answer.get(), 22);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod sync;
pub mod task;
pub mod workload;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, default_config_path, load_from_path};
use crate::exec::AsyncTaskScheduler;
use crate::workload::{TaskReport, Workload, WorkloadGraph};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - workload loading (plus the `--concurrency` override)
/// - scheduler construction
/// - task construction and submission
/// - waiting for completion and printing the summary
pub fn run(args: CliArgs) -> Result<()> {
    let config_path = args
        .config
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    let mut raw = load_from_path(&config_path)?;
    if let Some(concurrency) = args.concurrency {
        debug!(concurrency, "overriding [scheduler].concurrency_level from CLI");
        raw.scheduler.concurrency_level = concurrency;
    }
    let cfg = ConfigFile::try_from(raw)?;

    if args.dry_run {
        print_dry_run(&cfg)?;
        return Ok(());
    }

    let scheduler = AsyncTaskScheduler::from_config(&cfg.scheduler)?;
    let mut workload = Workload::build(&cfg)?;

    info!(
        tasks = workload.len(),
        concurrency_level = scheduler.concurrency_level(),
        "running workload"
    );

    workload.submit(&scheduler)?;
    let reports = workload.wait(Duration::from_secs(args.timeout_secs))?;

    print_reports(&reports);
    Ok(())
}

/// Print the scheduler settings and the tasks in the order they are built.
fn print_dry_run(cfg: &ConfigFile) -> Result<()> {
    let graph = WorkloadGraph::from_config(cfg)?;

    println!("tasksched dry-run");
    println!(
        "  scheduler.concurrency_level = {}",
        cfg.scheduler.concurrency_level
    );
    println!("  scheduler.thread_name = {}", cfg.scheduler.thread_name);
    println!();

    println!("tasks ({}):", cfg.task.len());
    for name in graph.topological_order() {
        let Some(task) = cfg.task.get(name) else {
            continue;
        };
        println!("  - {name}");
        println!("      kind: {:?}", task.kind);
        println!("      steps: {}", task.effective_steps());
        if task.work_ms > 0 {
            println!("      work_ms: {}", task.work_ms);
        }
        if !task.after.is_empty() {
            println!("      after: {:?}", task.after);
        }
        if let Some(executor) = task.executor {
            println!("      executor: {executor}");
        }
    }

    let roots: Vec<_> = graph.roots().collect();
    debug!(?roots, "dry-run complete (no execution)");
    Ok(())
}

fn print_reports(reports: &[TaskReport]) {
    println!("tasks completed ({}):", reports.len());
    for report in reports {
        println!(
            "  - {} ({} step{}) on {}",
            report.name,
            report.steps,
            if report.steps == 1 { "" } else { "s" },
            report.thread
        );
    }
}
