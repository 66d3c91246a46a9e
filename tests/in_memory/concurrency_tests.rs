//! Racing lifecycle and timer operations against one user's open slot.

use super::helpers::{Harness, harness, seed_user};
use rstest::rstest;
use std::sync::Arc;
use taskflow::task::{domain::TaskStatus, services::CreateTaskRequest};
use taskflow::timelog::services::TimeTrackingError;
use tokio::sync::Barrier;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_starts_for_one_user_admit_exactly_one(harness: Harness) {
    const ATTEMPTS: usize = 8;

    let user_id = seed_user(&harness, "lnavarro");
    let task = harness
        .lifecycle
        .create(CreateTaskRequest::new("Contended task"))
        .await
        .expect("creation should succeed");
    let barrier = Arc::new(Barrier::new(ATTEMPTS));

    let mut handles = Vec::with_capacity(ATTEMPTS);
    for _ in 0..ATTEMPTS {
        let tracker = harness.tracker.clone();
        let gate = Arc::clone(&barrier);
        let task_id = task.id();
        handles.push(tokio::spawn(async move {
            gate.wait().await;
            tracker.start(user_id, task_id).await
        }));
    }

    let mut successes = 0;
    let mut already_active = 0;
    for handle in handles {
        match handle.await.expect("task should not panic") {
            Ok(_) => successes += 1,
            Err(TimeTrackingError::AlreadyActive(id)) => {
                assert_eq!(id, user_id);
                already_active += 1;
            }
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(already_active, ATTEMPTS - 1);
    let entries = harness
        .tracker
        .entries_for_user(user_id)
        .await
        .expect("lookup should succeed");
    assert_eq!(entries.len(), 1, "only one entry may exist");
    assert!(entries.first().is_some_and(|entry| entry.is_open()));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_lifecycle_starts_leave_loser_tasks_untouched(harness: Harness) {
    const ATTEMPTS: usize = 4;

    let user_id = seed_user(&harness, "mcastro");
    let mut task_ids = Vec::with_capacity(ATTEMPTS);
    for index in 0..ATTEMPTS {
        let task = harness
            .lifecycle
            .create(CreateTaskRequest::new(format!("Racing task {index}")))
            .await
            .expect("creation should succeed");
        task_ids.push(task.id());
    }
    let barrier = Arc::new(Barrier::new(ATTEMPTS));

    let mut handles = Vec::with_capacity(ATTEMPTS);
    for task_id in &task_ids {
        let lifecycle = harness.lifecycle.clone();
        let gate = Arc::clone(&barrier);
        let id = *task_id;
        handles.push(tokio::spawn(async move {
            gate.wait().await;
            lifecycle.start(id, user_id).await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        if handle.await.expect("task should not panic").is_ok() {
            successes += 1;
        }
    }
    assert_eq!(successes, 1);

    let mut in_progress = 0;
    for task_id in task_ids {
        let task = harness
            .lifecycle
            .get(task_id)
            .await
            .expect("lookup should succeed");
        match task.status() {
            TaskStatus::InProgress => {
                in_progress += 1;
                assert_eq!(task.assignee(), Some(user_id));
            }
            TaskStatus::Pending => assert_eq!(task.assignee(), None),
            other => panic!("unexpected status: {other}"),
        }
    }
    assert_eq!(in_progress, 1, "exactly one task may have started");
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_stops_close_the_entry_once(harness: Harness) {
    const ATTEMPTS: usize = 6;

    let user_id = seed_user(&harness, "nsoler");
    let task = harness
        .lifecycle
        .create(CreateTaskRequest::new("Stopped from two tabs"))
        .await
        .expect("creation should succeed");
    harness
        .tracker
        .start(user_id, task.id())
        .await
        .expect("start should succeed");
    harness.clock.advance_minutes(3);
    let barrier = Arc::new(Barrier::new(ATTEMPTS));

    let mut handles = Vec::with_capacity(ATTEMPTS);
    for _ in 0..ATTEMPTS {
        let tracker = harness.tracker.clone();
        let gate = Arc::clone(&barrier);
        handles.push(tokio::spawn(async move {
            gate.wait().await;
            tracker.stop(user_id).await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.expect("task should not panic") {
            Ok(entry) => {
                assert_eq!(entry.duration_minutes(), Some(3));
                successes += 1;
            }
            Err(TimeTrackingError::NoOpenEntry(_)) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(successes, 1, "the entry may close exactly once");
    assert_eq!(
        harness
            .tracker
            .total_minutes_for_user(user_id)
            .await
            .expect("total should succeed"),
        3
    );
}
