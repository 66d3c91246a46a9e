//! Time tracker enforcing the single-open-entry-per-user invariant.

use crate::directory::domain::UserId;
use crate::task::domain::TaskId;
use crate::timelog::{
    domain::{TimeEntry, TimeLogDomainError},
    ports::{TimeEntryRepository, TimeEntryRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Service-level errors for time tracking operations.
#[derive(Debug, Error)]
pub enum TimeTrackingError {
    /// The user already has an open entry and must stop it first.
    #[error("user {0} already has an open time entry")]
    AlreadyActive(UserId),

    /// The user has no open entry to stop.
    #[error("no open time entry for user {0}")]
    NoOpenEntry(UserId),

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TimeLogDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TimeEntryRepositoryError),
}

/// Result type for time tracking service operations.
pub type TimeTrackingResult<T> = Result<T, TimeTrackingError>;

/// Outcome of a best-effort stop.
///
/// Task completion closes a running timer when one exists and proceeds
/// quietly otherwise; this makes the "nothing to do" case an explicit value
/// instead of a swallowed error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopOutcome {
    /// An open entry was found and closed.
    Stopped(TimeEntry),
    /// The user had nothing running.
    NoOpenEntry,
}

impl StopOutcome {
    /// Returns the closed entry, if one was stopped.
    #[must_use]
    pub const fn stopped(&self) -> Option<&TimeEntry> {
        match self {
            Self::Stopped(entry) => Some(entry),
            Self::NoOpenEntry => None,
        }
    }
}

/// Arena of per-user locks serializing open-slot check-then-act sequences.
///
/// Entries are created on first use and kept for the process lifetime; the
/// arena grows with the active user population only.
#[derive(Debug, Clone, Default)]
struct UserLockArena {
    locks: Arc<Mutex<HashMap<UserId, Arc<Mutex<()>>>>>,
}

impl UserLockArena {
    fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock slot for `user_id`, creating it when absent.
    async fn acquire(&self, user_id: UserId) -> OwnedMutexGuard<()> {
        let slot = {
            let mut locks = self.locks.lock().await;
            Arc::clone(locks.entry(user_id).or_default())
        };
        slot.lock_owned().await
    }
}

/// Time tracking orchestration service.
///
/// Sole owner of the invariant that a user holds at most one open entry
/// system-wide. Both mutating operations hold the user's lock across their
/// whole check-then-act sequence, and the repository's open-slot constraint
/// backs the lock up.
pub struct TimeTrackingService<R, C>
where
    R: TimeEntryRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    user_locks: UserLockArena,
}

impl<R, C> Clone for TimeTrackingService<R, C>
where
    R: TimeEntryRepository,
    C: Clock + Send + Sync,
{
    // Clones share the lock arena.
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
            user_locks: self.user_locks.clone(),
        }
    }
}

impl<R, C> TimeTrackingService<R, C>
where
    R: TimeEntryRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new time tracking service.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            clock,
            user_locks: UserLockArena::new(),
        }
    }

    /// Opens a new entry for `user_id` against `task_id`.
    ///
    /// # Errors
    ///
    /// Returns [`TimeTrackingError::AlreadyActive`] when the user already
    /// has an open entry, and repository errors otherwise.
    pub async fn start(&self, user_id: UserId, task_id: TaskId) -> TimeTrackingResult<TimeEntry> {
        let _slot = self.user_locks.acquire(user_id).await;
        if self.repository.find_open_by_user(user_id).await?.is_some() {
            return Err(TimeTrackingError::AlreadyActive(user_id));
        }
        let entry = TimeEntry::open(task_id, user_id, &*self.clock);
        self.repository.insert(&entry).await.map_err(|err| match err {
            TimeEntryRepositoryError::OpenEntryExists(id) => TimeTrackingError::AlreadyActive(id),
            other => TimeTrackingError::Repository(other),
        })?;
        tracing::debug!(
            user_id = %user_id,
            task_id = %task_id,
            entry_id = %entry.id(),
            "time entry opened"
        );
        Ok(entry)
    }

    /// Closes the user's open entry.
    ///
    /// # Errors
    ///
    /// Returns [`TimeTrackingError::NoOpenEntry`] when nothing is running,
    /// and repository errors otherwise.
    pub async fn stop(&self, user_id: UserId) -> TimeTrackingResult<TimeEntry> {
        match self.stop_if_active(user_id).await? {
            StopOutcome::Stopped(entry) => Ok(entry),
            StopOutcome::NoOpenEntry => Err(TimeTrackingError::NoOpenEntry(user_id)),
        }
    }

    /// Closes the user's open entry when one exists.
    ///
    /// # Errors
    ///
    /// Returns repository errors; an idle user is not an error.
    pub async fn stop_if_active(&self, user_id: UserId) -> TimeTrackingResult<StopOutcome> {
        let _slot = self.user_locks.acquire(user_id).await;
        let Some(mut entry) = self.repository.find_open_by_user(user_id).await? else {
            return Ok(StopOutcome::NoOpenEntry);
        };
        entry.close(&*self.clock)?;
        self.repository.update(&entry).await?;
        tracing::debug!(
            user_id = %user_id,
            entry_id = %entry.id(),
            minutes = entry.duration_minutes().unwrap_or_default(),
            "time entry closed"
        );
        Ok(StopOutcome::Stopped(entry))
    }

    /// Returns the user's open entry without mutating it.
    ///
    /// # Errors
    ///
    /// Returns repository errors from the lookup.
    pub async fn active_entry(&self, user_id: UserId) -> TimeTrackingResult<Option<TimeEntry>> {
        Ok(self.repository.find_open_by_user(user_id).await?)
    }

    /// Returns all entries logged by the given user.
    ///
    /// # Errors
    ///
    /// Returns repository errors from the lookup.
    pub async fn entries_for_user(&self, user_id: UserId) -> TimeTrackingResult<Vec<TimeEntry>> {
        Ok(self.repository.find_by_user(user_id).await?)
    }

    /// Returns all entries logged against the given task.
    ///
    /// # Errors
    ///
    /// Returns repository errors from the lookup.
    pub async fn entries_for_task(&self, task_id: TaskId) -> TimeTrackingResult<Vec<TimeEntry>> {
        Ok(self.repository.find_by_task(task_id).await?)
    }

    /// Returns the given user's entries started inside `[from, to]`.
    ///
    /// # Errors
    ///
    /// Returns repository errors from the lookup.
    pub async fn entries_for_user_in_range(
        &self,
        user_id: UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> TimeTrackingResult<Vec<TimeEntry>> {
        Ok(self
            .repository
            .find_by_user_in_range(user_id, from, to)
            .await?)
    }

    /// Returns the total logged minutes for a task, over closed entries.
    ///
    /// # Errors
    ///
    /// Returns repository errors from the aggregation.
    pub async fn total_minutes_for_task(&self, task_id: TaskId) -> TimeTrackingResult<i64> {
        Ok(self.repository.sum_minutes_by_task(task_id).await?)
    }

    /// Returns the total logged minutes for a user, over closed entries.
    ///
    /// # Errors
    ///
    /// Returns repository errors from the aggregation.
    pub async fn total_minutes_for_user(&self, user_id: UserId) -> TimeTrackingResult<i64> {
        Ok(self.repository.sum_minutes_by_user(user_id).await?)
    }
}
