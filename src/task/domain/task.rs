//! Task record and the status state machine.

use super::{ParseTaskStatusError, TaskDomainError, TaskId};
use crate::directory::domain::{DepartmentId, UserId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task has been created but work has not started.
    Pending,
    /// Task is being worked on with a running timer.
    InProgress,
    /// Task work is temporarily paused.
    Paused,
    /// Task has been completed.
    Completed,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Paused => "paused",
            Self::Completed => "completed",
        }
    }

    /// Returns whether the state machine permits moving to `next`.
    ///
    /// Every non-terminal status may complete directly; a task that was
    /// never started can still be closed out.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::InProgress | Self::Completed)
                | (Self::InProgress, Self::Paused | Self::Completed)
                | (Self::Paused, Self::InProgress | Self::Completed)
        )
    }

    /// Returns whether the status accepts no further transitions.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "paused" => Ok(Self::Paused),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority. Inert attribute with no lifecycle coupling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Low urgency.
    Low,
    /// Default urgency.
    #[default]
    Medium,
    /// High urgency.
    High,
}

/// Normalized, non-empty task title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskTitle(String);

impl TaskTitle {
    /// Creates a validated task title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the value is empty after
    /// trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, TaskDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        Ok(Self(normalized.to_owned()))
    }

    /// Returns the title as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskTitle {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parameter object for creating a new task record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskData {
    /// Validated task title.
    pub title: TaskTitle,
    /// Free-form description, if any.
    pub description: Option<String>,
    /// Initial status; defaults to [`TaskStatus::Pending`] when unset.
    pub status: Option<TaskStatus>,
    /// Priority; defaults to [`TaskPriority::Medium`] when unset.
    pub priority: Option<TaskPriority>,
    /// Resolved department reference, if any.
    pub department: Option<DepartmentId>,
    /// Resolved assignee reference, if any.
    pub assignee: Option<UserId>,
}

/// Parameter object for wholesale task replacement.
///
/// Updates overwrite every mutable attribute; they are administrative edits
/// and bypass the status state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskUpdate {
    /// Replacement title.
    pub title: TaskTitle,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement status.
    pub status: TaskStatus,
    /// Replacement priority.
    pub priority: TaskPriority,
    /// Replacement department reference.
    pub department: Option<DepartmentId>,
    /// Replacement assignee reference.
    pub assignee: Option<UserId>,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: Option<String>,
    status: TaskStatus,
    priority: TaskPriority,
    department: Option<DepartmentId>,
    assignee: Option<UserId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task record.
    #[must_use]
    pub fn new(data: NewTaskData, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            title: data.title,
            description: data.description,
            status: data.status.unwrap_or(TaskStatus::Pending),
            priority: data.priority.unwrap_or_default(),
            department: data.department,
            assignee: data.assignee,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the task description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the task lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the task priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the department reference, if any.
    #[must_use]
    pub const fn department(&self) -> Option<DepartmentId> {
        self.department
    }

    /// Returns the assignee reference, if any.
    #[must_use]
    pub const fn assignee(&self) -> Option<UserId> {
        self.assignee
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Moves the task to `next` when the state machine permits it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] when the current
    /// status does not allow the change.
    pub fn transition_to(
        &mut self,
        next: TaskStatus,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if !self.status.can_transition_to(next) {
            return Err(TaskDomainError::InvalidStatusTransition {
                task_id: self.id,
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.touch(clock);
        Ok(())
    }

    /// Starts work on the task: moves it to [`TaskStatus::InProgress`] and
    /// assigns the acting user.
    ///
    /// Reassignment is allowed; a paused task may be resumed by a different
    /// user than the one who started it.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] when the task is
    /// not in a startable status.
    pub fn start(&mut self, assignee: UserId, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.transition_to(TaskStatus::InProgress, clock)?;
        self.assignee = Some(assignee);
        Ok(())
    }

    /// Pauses work on the task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] when the task is
    /// not in progress.
    pub fn pause(&mut self, clock: &impl Clock) -> Result<(), TaskDomainError> {
        self.transition_to(TaskStatus::Paused, clock)
    }

    /// Completes the task.
    ///
    /// Idempotent: completing an already-completed task leaves the record
    /// untouched, including `updated_at`. Every non-terminal status may
    /// complete, so this cannot fail.
    pub fn complete(&mut self, clock: &impl Clock) {
        if self.status == TaskStatus::Completed {
            return;
        }
        self.status = TaskStatus::Completed;
        self.touch(clock);
    }

    /// Replaces every mutable attribute with the given values.
    pub fn apply_update(&mut self, update: TaskUpdate, clock: &impl Clock) {
        self.title = update.title;
        self.description = update.description;
        self.status = update.status;
        self.priority = update.priority;
        self.department = update.department;
        self.assignee = update.assignee;
        self.touch(clock);
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
