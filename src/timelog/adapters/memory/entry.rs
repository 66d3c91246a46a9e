//! In-memory time entry repository with an open-slot uniqueness constraint.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::directory::domain::UserId;
use crate::task::domain::TaskId;
use crate::timelog::{
    domain::{TimeEntry, TimeEntryId},
    ports::{TimeEntryRepository, TimeEntryRepositoryError, TimeEntryRepositoryResult},
};

/// Thread-safe in-memory time entry repository.
///
/// The open-slot index mirrors a storage-level uniqueness constraint: a
/// second open entry for the same user is rejected at insert time.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTimeEntryRepository {
    state: Arc<RwLock<InMemoryTimeEntryState>>,
}

#[derive(Debug, Default)]
struct InMemoryTimeEntryState {
    entries: HashMap<TimeEntryId, TimeEntry>,
    open_index: HashMap<UserId, TimeEntryId>,
}

impl InMemoryTimeEntryRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Collects entries matching a predicate, ordered by start time.
fn collect_sorted<F>(state: &InMemoryTimeEntryState, predicate: F) -> Vec<TimeEntry>
where
    F: Fn(&TimeEntry) -> bool,
{
    let mut entries: Vec<TimeEntry> = state
        .entries
        .values()
        .filter(|entry| predicate(entry))
        .cloned()
        .collect();
    entries.sort_by_key(TimeEntry::started_at);
    entries
}

/// Sums recorded durations over entries matching a predicate. Open entries
/// carry no duration and contribute nothing.
fn sum_minutes<F>(state: &InMemoryTimeEntryState, predicate: F) -> i64
where
    F: Fn(&TimeEntry) -> bool,
{
    state
        .entries
        .values()
        .filter(|entry| predicate(entry))
        .filter_map(TimeEntry::duration_minutes)
        .sum()
}

#[async_trait]
impl TimeEntryRepository for InMemoryTimeEntryRepository {
    async fn insert(&self, entry: &TimeEntry) -> TimeEntryRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TimeEntryRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if state.entries.contains_key(&entry.id()) {
            return Err(TimeEntryRepositoryError::DuplicateEntry(entry.id()));
        }
        if entry.is_open() && state.open_index.contains_key(&entry.user_id()) {
            return Err(TimeEntryRepositoryError::OpenEntryExists(entry.user_id()));
        }
        if entry.is_open() {
            state.open_index.insert(entry.user_id(), entry.id());
        }
        state.entries.insert(entry.id(), entry.clone());
        Ok(())
    }

    async fn update(&self, entry: &TimeEntry) -> TimeEntryRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TimeEntryRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        if !state.entries.contains_key(&entry.id()) {
            return Err(TimeEntryRepositoryError::NotFound(entry.id()));
        }
        if !entry.is_open() && state.open_index.get(&entry.user_id()) == Some(&entry.id()) {
            state.open_index.remove(&entry.user_id());
        }
        state.entries.insert(entry.id(), entry.clone());
        Ok(())
    }

    async fn find_open_by_user(
        &self,
        user_id: UserId,
    ) -> TimeEntryRepositoryResult<Option<TimeEntry>> {
        let state = self.state.read().map_err(|err| {
            TimeEntryRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        let entry = state
            .open_index
            .get(&user_id)
            .and_then(|entry_id| state.entries.get(entry_id))
            .cloned();
        Ok(entry)
    }

    async fn find_by_user(&self, user_id: UserId) -> TimeEntryRepositoryResult<Vec<TimeEntry>> {
        let state = self.state.read().map_err(|err| {
            TimeEntryRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(collect_sorted(&state, |entry| entry.user_id() == user_id))
    }

    async fn find_by_task(&self, task_id: TaskId) -> TimeEntryRepositoryResult<Vec<TimeEntry>> {
        let state = self.state.read().map_err(|err| {
            TimeEntryRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(collect_sorted(&state, |entry| entry.task_id() == task_id))
    }

    async fn find_by_user_in_range(
        &self,
        user_id: UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> TimeEntryRepositoryResult<Vec<TimeEntry>> {
        let state = self.state.read().map_err(|err| {
            TimeEntryRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(collect_sorted(&state, |entry| {
            entry.user_id() == user_id && entry.started_at() >= from && entry.started_at() <= to
        }))
    }

    async fn sum_minutes_by_task(&self, task_id: TaskId) -> TimeEntryRepositoryResult<i64> {
        let state = self.state.read().map_err(|err| {
            TimeEntryRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(sum_minutes(&state, |entry| entry.task_id() == task_id))
    }

    async fn sum_minutes_by_user(&self, user_id: UserId) -> TimeEntryRepositoryResult<i64> {
        let state = self.state.read().map_err(|err| {
            TimeEntryRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(sum_minutes(&state, |entry| entry.user_id() == user_id))
    }
}
