//! Unit tests for the timelog domain and services.


use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use std::sync::RwLock;

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

    pub fn advance_seconds(&self, seconds: i64) {
        let mut now = self.now.write().expect("clock lock should not be poisoned");
        *now = *now + Duration::seconds(seconds);
    }

    pub fn rewind_minutes(&self, minutes: i64) {
        let mut now = self.now.write().expect("clock lock should not be poisoned");
        *now = *now - Duration::minutes(minutes);
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
pub fn nine_am() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 18, 9, 0, 0)
        .single()
        .expect("valid timestamp")
}
