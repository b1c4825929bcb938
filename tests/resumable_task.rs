// tests/resumable_task.rs

use std::time::Duration;

use tasksched::exec::TaskExecutor;
use tasksched::task::{
    Computation, Resume, ResumableTask, Stages, Task, make_resumable_task,
};
use tasksched_test_utils::init_tracing;
use tasksched_test_utils::recorder::Recorder;

/// Computation that suspends `yields` times before returning `value`.
fn yielding(yields: usize, value: usize) -> impl FnMut() -> Resume<usize> + Send {
    let mut resumed = 0;
    move || {
        if resumed < yields {
            resumed += 1;
            Resume::Suspended
        } else {
            Resume::Finished(value)
        }
    }
}

#[test]
fn needs_one_step_per_suspension_point() {
    init_tracing();

    for yields in 0..4 {
        let mut task = ResumableTask::new(yielding(yields, yields));

        for _ in 0..yields {
            task.step();
            assert!(!task.done());
        }
        task.step();
        assert!(task.done(), "{yields} yields should need {} steps", yields + 1);
        assert_eq!(task.steps_taken(), yields + 1);
        assert_eq!(task.result().get(), yields);
        assert!(task.dependency().is_ready());

        // Further steps are no-ops.
        task.step();
        assert_eq!(task.steps_taken(), yields + 1);
    }
}

#[test]
fn blocked_task_does_not_resume() {
    init_tracing();

    let mut first = ResumableTask::new(yielding(1, 0));
    let mut second = ResumableTask::new(yielding(0, 1));
    second.depend_on(&first);

    second.step();
    second.step();
    assert_eq!(second.steps_taken(), 0);

    first.step();
    second.step();
    assert_eq!(second.steps_taken(), 0, "first is still suspended");

    first.step();
    second.step();
    assert!(second.done());
    assert_eq!(second.steps_taken(), 1);
}

#[test]
fn stages_run_in_order_and_return_value() {
    init_tracing();

    let recorder = Recorder::new();
    let (r1, r2, r3) = (recorder.clone(), recorder.clone(), recorder.clone());
    let stages = Stages::builder()
        .then(move || r1.record("stage 1"))
        .suspend(2)
        .then(move || r2.record("stage 2"))
        .finish(move || {
            r3.record("finish");
            "Task 1".to_string()
        });
    assert_eq!(stages.remaining(), 5);

    let (mut task, result) = make_resumable_task(stages);
    while !task.done() {
        task.step();
    }

    assert_eq!(task.steps_taken(), 5);
    assert_eq!(result.get(), "Task 1");
    assert_eq!(recorder.events(), vec!["stage 1", "stage 2", "finish"]);
}

#[test]
fn stages_without_intermediate_points_finish_in_one_resume() {
    let mut stages = Stages::builder().finish(|| 7);
    assert_eq!(stages.remaining(), 1);
    assert_eq!(stages.resume(), Resume::Finished(7));
    assert_eq!(stages.remaining(), 0);
}

#[test]
fn resumable_tasks_with_dependencies_finish_on_one_executor() {
    init_tracing();

    // first yields 3 times, second 2 times, third once; each waits on the
    // previous one.
    let recorder = Recorder::new();
    let mk = |yields: usize, name: &'static str| {
        let recorder = recorder.clone();
        let mut resumed = 0;
        ResumableTask::new(move || {
            recorder.record(format!("{name} {resumed}"));
            if resumed < yields {
                resumed += 1;
                Resume::Suspended
            } else {
                Resume::Finished(name)
            }
        })
    };

    let first = mk(3, "first");
    let mut second = mk(2, "second");
    let mut third = mk(1, "third");
    second.depend_on(&first);
    third.depend_on(&second);

    let results = [first.result(), second.result(), third.result()];

    let executor = TaskExecutor::new().unwrap();
    // Enqueue in reverse so the blocked ones are stepped first.
    executor.enqueue_task(Box::new(third));
    executor.enqueue_task(Box::new(second));
    executor.enqueue_task(Box::new(first));

    for (result, name) in results.iter().zip(["first", "second", "third"]) {
        assert_eq!(result.get_timeout(Duration::from_secs(5)), Some(name));
    }

    let events = recorder.events();
    assert_eq!(events.len(), 4 + 3 + 2);
    let last_first = recorder.position("first 3").unwrap();
    let first_second = recorder.position("second 0").unwrap();
    let last_second = recorder.position("second 2").unwrap();
    let first_third = recorder.position("third 0").unwrap();
    assert!(last_first < first_second);
    assert!(last_second < first_third);
}
