//! Repository port for time entry persistence, lookup, and aggregation.

use crate::directory::domain::UserId;
use crate::task::domain::TaskId;
use crate::timelog::domain::{TimeEntry, TimeEntryId};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for time entry repository operations.
pub type TimeEntryRepositoryResult<T> = Result<T, TimeEntryRepositoryError>;

/// Time entry persistence contract.
///
/// Implementations must enforce the open-slot uniqueness constraint: at
/// most one open entry per user may be stored at any instant.
#[async_trait]
pub trait TimeEntryRepository: Send + Sync {
    /// Stores a new entry.
    ///
    /// # Errors
    ///
    /// Returns [`TimeEntryRepositoryError::DuplicateEntry`] when the entry
    /// ID already exists, or [`TimeEntryRepositoryError::OpenEntryExists`]
    /// when the entry is open and the user already has an open entry.
    async fn insert(&self, entry: &TimeEntry) -> TimeEntryRepositoryResult<()>;

    /// Persists changes to an existing entry (closing it).
    ///
    /// # Errors
    ///
    /// Returns [`TimeEntryRepositoryError::NotFound`] when the entry does
    /// not exist.
    async fn update(&self, entry: &TimeEntry) -> TimeEntryRepositoryResult<()>;

    /// Finds the open entry for the given user.
    ///
    /// Returns `None` when the user has nothing running.
    async fn find_open_by_user(&self, user_id: UserId)
    -> TimeEntryRepositoryResult<Option<TimeEntry>>;

    /// Returns all entries logged by the given user, ordered by start time.
    async fn find_by_user(&self, user_id: UserId) -> TimeEntryRepositoryResult<Vec<TimeEntry>>;

    /// Returns all entries logged against the given task, ordered by start
    /// time.
    async fn find_by_task(&self, task_id: TaskId) -> TimeEntryRepositoryResult<Vec<TimeEntry>>;

    /// Returns the given user's entries started inside `[from, to]`,
    /// ordered by start time.
    async fn find_by_user_in_range(
        &self,
        user_id: UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> TimeEntryRepositoryResult<Vec<TimeEntry>>;

    /// Sums recorded durations over the closed entries of a task. Open
    /// entries contribute nothing until closed.
    async fn sum_minutes_by_task(&self, task_id: TaskId) -> TimeEntryRepositoryResult<i64>;

    /// Sums recorded durations over the closed entries of a user. Open
    /// entries contribute nothing until closed.
    async fn sum_minutes_by_user(&self, user_id: UserId) -> TimeEntryRepositoryResult<i64>;
}

/// Errors returned by time entry repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TimeEntryRepositoryError {
    /// An entry with the same identifier already exists.
    #[error("duplicate time entry identifier: {0}")]
    DuplicateEntry(TimeEntryId),

    /// The user already has an open entry.
    #[error("user {0} already has an open time entry")]
    OpenEntryExists(UserId),

    /// The entry was not found.
    #[error("time entry not found: {0}")]
    NotFound(TimeEntryId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TimeEntryRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
