//! Shared test helpers for in-memory integration tests.

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::fixture;
use std::sync::{Arc, RwLock};
use taskflow::directory::{
    adapters::{InMemoryDepartmentDirectory, InMemoryUserDirectory},
    domain::{Department, DepartmentId, DepartmentName, User, UserId, Username},
};
use taskflow::task::{
    adapters::memory::InMemoryTaskRepository, services::TaskLifecycleService,
};
use taskflow::timelog::{
    adapters::memory::InMemoryTimeEntryRepository, services::TimeTrackingService,
};

/// Deterministic clock that tests advance by hand.
pub struct ManualClock {
    now: RwLock<DateTime<Utc>>,
}

impl ManualClock {
    pub fn starting_at(now: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    pub fn advance_minutes(&self, minutes: i64) {
        let mut now = self.now.write().expect("clock lock should not be poisoned");
        *now = *now + Duration::minutes(minutes);
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.read().expect("clock lock should not be poisoned")
    }
}

/// Fixed reference instant keeping test arithmetic readable.
#[must_use]
pub fn monday_morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 18, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub type TestTracker = TimeTrackingService<InMemoryTimeEntryRepository, ManualClock>;
pub type TestLifecycle = TaskLifecycleService<
    InMemoryTaskRepository,
    InMemoryTimeEntryRepository,
    ManualClock,
    InMemoryUserDirectory,
    InMemoryDepartmentDirectory,
>;

/// Fully wired in-memory core sharing one clock and one entry store.
pub struct Harness {
    pub lifecycle: TestLifecycle,
    pub tracker: TestTracker,
    pub clock: Arc<ManualClock>,
    pub users: Arc<InMemoryUserDirectory>,
    pub departments: Arc<InMemoryDepartmentDirectory>,
}

/// Provides a fresh harness for each test.
#[fixture]
pub fn harness() -> Harness {
    let clock = Arc::new(ManualClock::starting_at(monday_morning()));
    let users = Arc::new(InMemoryUserDirectory::new());
    let departments = Arc::new(InMemoryDepartmentDirectory::new());
    let tracker = TimeTrackingService::new(
        Arc::new(InMemoryTimeEntryRepository::new()),
        Arc::clone(&clock),
    );
    let lifecycle = TaskLifecycleService::new(
        Arc::new(InMemoryTaskRepository::new()),
        tracker.clone(),
        Arc::clone(&clock),
        Arc::clone(&users),
        Arc::clone(&departments),
    );
    Harness {
        lifecycle,
        tracker,
        clock,
        users,
        departments,
    }
}

/// Seeds a user into the directory and returns its identifier.
pub fn seed_user(harness: &Harness, username: &str) -> UserId {
    let user = User::new(
        Username::new(username).expect("username should be valid"),
        username,
    );
    let user_id = user.id();
    harness.users.insert(user).expect("seeding should succeed");
    user_id
}

/// Seeds a department into the directory and returns its identifier.
pub fn seed_department(harness: &Harness, name: &str) -> DepartmentId {
    let department = Department::new(DepartmentName::new(name).expect("name should be valid"));
    let department_id = department.id();
    harness
        .departments
        .insert(department)
        .expect("seeding should succeed");
    department_id
}
