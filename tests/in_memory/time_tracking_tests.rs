//! In-memory integration tests for the open-entry invariant and duration
//! accounting.

use super::helpers::{Harness, harness, monday_morning, seed_user};
use rstest::rstest;
use taskflow::task::{domain::TaskId, services::CreateTaskRequest};
use taskflow::timelog::{
    adapters::memory::InMemoryTimeEntryRepository,
    domain::TimeEntry,
    ports::{TimeEntryRepository, TimeEntryRepositoryError},
    services::TimeTrackingError,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn manual_timer_runs_independently_of_task_status(harness: Harness) {
    let user_id = seed_user(&harness, "ijimenez");
    let task = harness
        .lifecycle
        .create(CreateTaskRequest::new("Manual timer target"))
        .await
        .expect("creation should succeed");

    // Timer use without a lifecycle transition: the task stays pending.
    harness
        .tracker
        .start(user_id, task.id())
        .await
        .expect("start should succeed");
    harness.clock.advance_minutes(12);
    let closed = harness
        .tracker
        .stop(user_id)
        .await
        .expect("stop should succeed");

    assert_eq!(closed.duration_minutes(), Some(12));
    let unchanged = harness
        .lifecycle
        .get(task.id())
        .await
        .expect("lookup should succeed");
    assert_eq!(
        unchanged.status(),
        taskflow::task::domain::TaskStatus::Pending
    );
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn one_open_entry_per_user_across_tasks(harness: Harness) {
    let user_id = seed_user(&harness, "jortega");
    let first_task = TaskId::new();
    let second_task = TaskId::new();

    harness
        .tracker
        .start(user_id, first_task)
        .await
        .expect("first start should succeed");
    let result = harness.tracker.start(user_id, second_task).await;

    assert!(matches!(
        result,
        Err(TimeTrackingError::AlreadyActive(id)) if id == user_id
    ));
    let entries = harness
        .tracker
        .entries_for_user(user_id)
        .await
        .expect("lookup should succeed");
    assert_eq!(entries.len(), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn closed_entries_are_immutable_in_the_store(harness: Harness) {
    let user_id = seed_user(&harness, "kperez");
    let task_id = TaskId::new();

    harness
        .tracker
        .start(user_id, task_id)
        .await
        .expect("start should succeed");
    harness.clock.advance_minutes(7);
    let closed = harness
        .tracker
        .stop(user_id)
        .await
        .expect("stop should succeed");

    // A second stop finds nothing; the closed entry keeps its duration.
    let repeat = harness.tracker.stop(user_id).await;
    assert!(matches!(repeat, Err(TimeTrackingError::NoOpenEntry(_))));
    let entries = harness
        .tracker
        .entries_for_task(task_id)
        .await
        .expect("lookup should succeed");
    assert_eq!(
        entries.first().map(TimeEntry::duration_minutes),
        Some(Some(7))
    );
    assert_eq!(entries.first().map(TimeEntry::id), Some(closed.id()));
}

#[tokio::test(flavor = "multi_thread")]
async fn repository_rejects_second_open_entry_per_user() {
    let repository = InMemoryTimeEntryRepository::new();
    let clock = super::helpers::ManualClock::starting_at(monday_morning());
    let user_id = taskflow::directory::domain::UserId::new();

    let first = TimeEntry::open(TaskId::new(), user_id, &clock);
    repository
        .insert(&first)
        .await
        .expect("first insert should succeed");

    let second = TimeEntry::open(TaskId::new(), user_id, &clock);
    let result = repository.insert(&second).await;

    assert!(matches!(
        result,
        Err(TimeEntryRepositoryError::OpenEntryExists(id)) if id == user_id
    ));
}

#[tokio::test(flavor = "multi_thread")]
async fn repository_allows_closed_history_alongside_open_entry() {
    let repository = InMemoryTimeEntryRepository::new();
    let clock = super::helpers::ManualClock::starting_at(monday_morning());
    let user_id = taskflow::directory::domain::UserId::new();
    let task_id = TaskId::new();

    let mut closed = TimeEntry::open(task_id, user_id, &clock);
    clock.advance_minutes(20);
    closed.close(&clock).expect("close should succeed");
    repository
        .insert(&closed)
        .await
        .expect("closed insert should succeed");

    let open = TimeEntry::open(task_id, user_id, &clock);
    repository
        .insert(&open)
        .await
        .expect("open insert should succeed");

    let found = repository
        .find_open_by_user(user_id)
        .await
        .expect("lookup should succeed")
        .expect("the open entry should be found");
    assert_eq!(found.id(), open.id());
    assert_eq!(
        repository
            .sum_minutes_by_user(user_id)
            .await
            .expect("sum should succeed"),
        20
    );
}
