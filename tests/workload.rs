// tests/workload.rs

use std::io::Write;
use std::time::Duration;

use tasksched::cli::{CliArgs, LogLevel};
use tasksched::config::ConfigFile;
use tasksched::errors::SchedulerError;
use tasksched::exec::AsyncTaskScheduler;
use tasksched::logging::parse_level_str;
use tasksched::workload::{Workload, WorkloadGraph};
use tasksched_test_utils::builders::{ConfigFileBuilder, TaskConfigBuilder};
use tasksched_test_utils::init_tracing;
use tempfile::NamedTempFile;

/// fetch -> (parse, index) -> publish
fn diamond_config() -> ConfigFile {
    ConfigFileBuilder::new()
        .concurrency_level(2)
        .thread_name("wl")
        .with_task("fetch", TaskConfigBuilder::resumable().steps(3).build())
        .with_task("parse", TaskConfigBuilder::atomic().after("fetch").build())
        .with_task(
            "index",
            TaskConfigBuilder::resumable()
                .steps(2)
                .after("fetch")
                .executor(1)
                .build(),
        )
        .with_task(
            "publish",
            TaskConfigBuilder::atomic()
                .after("parse")
                .after("index")
                .build(),
        )
        .build()
}

#[test]
fn graph_orders_tasks_after_their_dependencies() {
    let graph = WorkloadGraph::from_config(&diamond_config()).unwrap();
    let order = graph.topological_order();
    let pos = |name: &str| order.iter().position(|n| n == name).unwrap();

    assert_eq!(order.len(), 4);
    assert!(pos("fetch") < pos("parse"));
    assert!(pos("fetch") < pos("index"));
    assert!(pos("parse") < pos("publish"));
    assert!(pos("index") < pos("publish"));

    assert_eq!(graph.roots().collect::<Vec<_>>(), vec!["fetch"]);
    assert_eq!(graph.dependencies_of("publish"), ["parse", "index"]);
    let mut dependents = graph.dependents_of("fetch").to_vec();
    dependents.sort();
    assert_eq!(dependents, ["index", "parse"]);
    assert!(graph.dependents_of("publish").is_empty());
}

#[test]
fn workload_runs_to_completion_and_reports() {
    init_tracing();

    let cfg = diamond_config();
    let scheduler = AsyncTaskScheduler::from_config(&cfg.scheduler).unwrap();
    let mut workload = Workload::build(&cfg).unwrap();

    assert_eq!(workload.len(), 4);
    assert!(!workload.is_empty());
    let names: Vec<&str> = workload.task_names().collect();
    assert_eq!(names.first(), Some(&"fetch"));
    assert_eq!(names.last(), Some(&"publish"));

    let publish = workload.dependency("publish").unwrap();
    assert!(workload.dependency("missing").is_none());

    workload.submit(&scheduler).unwrap();
    let reports = workload.wait(Duration::from_secs(10)).unwrap();
    assert!(publish.is_ready());

    assert_eq!(reports.len(), 4);
    for report in &reports {
        assert!(report.thread.starts_with("wl-"), "{report:?}");
        let expected_steps = match report.name.as_str() {
            "fetch" => 3,
            "index" => 2,
            _ => 1,
        };
        assert_eq!(report.steps, expected_steps, "{report:?}");
    }

    let index = reports.iter().find(|r| r.name == "index").unwrap();
    assert_eq!(index.thread, "wl-1");
}

#[test]
fn wait_times_out_on_slow_tasks() {
    init_tracing();

    let cfg = ConfigFileBuilder::new()
        .concurrency_level(1)
        .with_task("slow", TaskConfigBuilder::atomic().work_ms(300).build())
        .build();
    let scheduler = AsyncTaskScheduler::from_config(&cfg.scheduler).unwrap();
    let mut workload = Workload::build(&cfg).unwrap();
    workload.submit(&scheduler).unwrap();

    match workload.wait(Duration::from_millis(10)) {
        Err(SchedulerError::Other(err)) => {
            let msg = err.to_string();
            assert!(msg.contains("timed out"), "{msg}");
            assert!(msg.contains("slow"), "{msg}");
        }
        other => panic!("expected timeout, got {other:?}"),
    }

    // Still finishes given enough time.
    assert!(workload.wait(Duration::from_secs(5)).is_ok());
}

fn cli_args(config: &NamedTempFile, dry_run: bool) -> CliArgs {
    CliArgs {
        config: Some(config.path().to_string_lossy().into_owned()),
        concurrency: None,
        timeout_secs: 10,
        log_level: None,
        dry_run,
    }
}

#[test]
fn run_executes_a_workload_file() {
    init_tracing();

    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[scheduler]
concurrency_level = 2

[task.a]
steps = 2

[task.b]
kind = "atomic"
after = ["a"]
"#
    )
    .unwrap();

    tasksched::run(cli_args(&file, true)).unwrap();
    tasksched::run(cli_args(&file, false)).unwrap();

    // The override is applied before validation.
    let mut args = cli_args(&file, false);
    args.concurrency = Some(0);
    let err = tasksched::run(args).unwrap_err();
    assert!(err.to_string().contains("greater than 0"), "{err}");
}

#[test]
fn log_levels_parse_case_insensitively() {
    assert_eq!(parse_level_str("DEBUG"), Some(tracing::Level::DEBUG));
    assert_eq!(parse_level_str(" warning "), Some(tracing::Level::WARN));
    assert_eq!(parse_level_str("loud"), None);
    assert_eq!(tracing::Level::from(LogLevel::Trace), tracing::Level::TRACE);
}
