// tests/config_loading.rs

use std::io::Write;

use tasksched::config::{ConfigFile, TaskKind, load_and_validate, load_from_str};
use tasksched::errors::SchedulerError;
use tasksched_test_utils::builders::{ConfigFileBuilder, TaskConfigBuilder};
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn loads_defaults_and_explicit_values() {
    let file = write_config(
        r#"
[scheduler]
concurrency_level = 3
thread_name = "pool"

[task.fetch]
steps = 4
work_ms = 2

[task.decode]
kind = "atomic"
after = ["fetch"]
executor = 2
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.scheduler.concurrency_level, 3);
    assert_eq!(cfg.scheduler.thread_name, "pool");

    let fetch = &cfg.task["fetch"];
    assert_eq!(fetch.kind, TaskKind::Resumable);
    assert_eq!(fetch.effective_steps(), 4);
    assert_eq!(fetch.work_ms, 2);
    assert!(fetch.after.is_empty());
    assert_eq!(fetch.executor, None);

    let decode = &cfg.task["decode"];
    assert_eq!(decode.kind, TaskKind::Atomic);
    assert_eq!(decode.effective_steps(), 1);
    assert_eq!(decode.after, vec!["fetch"]);
    assert_eq!(decode.executor, Some(2));
}

#[test]
fn scheduler_section_is_optional() {
    let raw = load_from_str(
        r#"
[task.only]
"#,
    )
    .unwrap();
    assert!(raw.scheduler.concurrency_level >= 1);
    assert_eq!(raw.scheduler.thread_name, "tasksched-worker");

    let cfg = ConfigFile::try_from(raw).unwrap();
    assert_eq!(cfg.task["only"].steps, 1);
}

#[test]
fn dag_cycle_returns_structured_error() {
    let file = write_config(
        r#"
[task.A]
after = ["B"]

[task.B]
after = ["A"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(SchedulerError::DagCycle(msg)) => {
            assert!(msg.contains("cycle detected"));
            assert!(msg.contains('A') || msg.contains('B'));
        }
        other => panic!("expected DagCycle error, got {other:?}"),
    }
}

#[test]
fn unknown_dependency_is_rejected() {
    let file = write_config(
        r#"
[task.A]
after = ["missing"]
"#,
    );

    match load_and_validate(file.path()) {
        Err(SchedulerError::ConfigError(msg)) => {
            assert!(msg.contains("has unknown dependency 'missing'"));
        }
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn self_dependency_is_rejected() {
    let raw = ConfigFileBuilder::new()
        .with_task("A", TaskConfigBuilder::resumable().after("A").build())
        .build_raw();

    match ConfigFile::try_from(raw) {
        Err(SchedulerError::ConfigError(msg)) => {
            assert!(msg.contains("cannot depend on itself"));
        }
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn pinned_executor_must_be_in_range() {
    let raw = ConfigFileBuilder::new()
        .concurrency_level(2)
        .with_task("A", TaskConfigBuilder::atomic().executor(2).build())
        .build_raw();

    match ConfigFile::try_from(raw) {
        Err(SchedulerError::ConfigError(msg)) => {
            assert!(msg.contains("is pinned to executor 2"));
        }
        other => panic!("expected ConfigError, got {other:?}"),
    }
}

#[test]
fn zero_concurrency_and_zero_steps_are_rejected() {
    let zero_concurrency = ConfigFileBuilder::new()
        .concurrency_level(0)
        .with_task("A", TaskConfigBuilder::resumable().build())
        .build_raw();
    assert!(matches!(
        ConfigFile::try_from(zero_concurrency),
        Err(SchedulerError::ConfigError(msg)) if msg.contains("greater than 0")
    ));

    let zero_steps = ConfigFileBuilder::new()
        .with_task("A", TaskConfigBuilder::resumable().steps(0).build())
        .build_raw();
    assert!(matches!(
        ConfigFile::try_from(zero_steps),
        Err(SchedulerError::ConfigError(msg)) if msg.contains("at least one step")
    ));

    // Atomic tasks ignore `steps`.
    let atomic = ConfigFileBuilder::new()
        .with_task("A", TaskConfigBuilder::atomic().steps(0).build())
        .build_raw();
    assert!(ConfigFile::try_from(atomic).is_ok());
}

#[test]
fn empty_config_is_rejected() {
    let raw = load_from_str("").unwrap();
    assert!(matches!(
        ConfigFile::try_from(raw),
        Err(SchedulerError::ConfigError(msg)) if msg.contains("at least one [task.<name>]")
    ));
}

#[test]
fn malformed_toml_and_missing_file_surface_as_errors() {
    assert!(matches!(
        load_from_str("[task.A]\nkind = \"sometimes\"\n"),
        Err(SchedulerError::TomlError(_))
    ));

    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        load_and_validate(dir.path().join("Tasksched.toml")),
        Err(SchedulerError::IoError(_))
    ));
}
