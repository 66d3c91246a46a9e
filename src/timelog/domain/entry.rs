//! Time entry aggregate root.

use super::{TimeEntryId, TimeLogDomainError};
use crate::directory::domain::UserId;
use crate::task::domain::TaskId;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// One block of work by one user on one task.
///
/// An entry is *open* while it has no end time. Closing sets the end time
/// and the duration in whole minutes exactly once; afterwards the entry is
/// immutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    id: TimeEntryId,
    task_id: TaskId,
    user_id: UserId,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    duration_minutes: Option<i64>,
}

impl TimeEntry {
    /// Opens a new entry starting at the current clock time.
    #[must_use]
    pub fn open(task_id: TaskId, user_id: UserId, clock: &impl Clock) -> Self {
        Self {
            id: TimeEntryId::new(),
            task_id,
            user_id,
            started_at: clock.utc(),
            ended_at: None,
            duration_minutes: None,
        }
    }

    /// Returns the entry identifier.
    #[must_use]
    pub const fn id(&self) -> TimeEntryId {
        self.id
    }

    /// Returns the task the entry belongs to.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the user who logged the entry.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the start timestamp.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Returns the end timestamp, if the entry is closed.
    #[must_use]
    pub const fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Returns the recorded duration in whole minutes, if the entry is
    /// closed.
    #[must_use]
    pub const fn duration_minutes(&self) -> Option<i64> {
        self.duration_minutes
    }

    /// Returns whether the entry has no end time yet.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Closes the entry at the current clock time.
    ///
    /// The duration is the elapsed whole minutes, truncated toward zero and
    /// clamped at zero so a backwards clock step never records a negative
    /// value.
    ///
    /// # Errors
    ///
    /// Returns [`TimeLogDomainError::AlreadyClosed`] when the entry already
    /// has an end time.
    pub fn close(&mut self, clock: &impl Clock) -> Result<(), TimeLogDomainError> {
        if self.ended_at.is_some() {
            return Err(TimeLogDomainError::AlreadyClosed(self.id));
        }
        let ended = clock.utc();
        let minutes = (ended - self.started_at).num_minutes().max(0);
        self.ended_at = Some(ended);
        self.duration_minutes = Some(minutes);
        Ok(())
    }
}
