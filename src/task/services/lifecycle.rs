//! Service layer coupling the task state machine to the time tracker.

use crate::directory::{
    domain::{DepartmentId, UserId},
    ports::{DepartmentDirectory, DirectoryError, UserDirectory},
};
use crate::task::{
    domain::{
        NewTaskData, Task, TaskDomainError, TaskId, TaskPriority, TaskStatus, TaskTitle, TaskUpdate,
    },
    ports::{TaskRepository, TaskRepositoryError},
};
use crate::timelog::{
    ports::TimeEntryRepository,
    services::{StopOutcome, TimeTrackingError, TimeTrackingService},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
    status: Option<TaskStatus>,
    priority: Option<TaskPriority>,
    department: Option<DepartmentId>,
    assignee: Option<UserId>,
}

impl CreateTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: None,
            priority: None,
            department: None,
            assignee: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the initial status instead of the default.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the priority instead of the default.
    #[must_use]
    pub const fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the department reference to resolve at creation time.
    #[must_use]
    pub const fn with_department(mut self, department: DepartmentId) -> Self {
        self.department = Some(department);
        self
    }

    /// Sets the assignee reference to resolve at creation time.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assignee = Some(assignee);
        self
    }
}

/// Request payload for wholesale task replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    title: String,
    description: Option<String>,
    status: TaskStatus,
    priority: TaskPriority,
    department: Option<DepartmentId>,
    assignee: Option<UserId>,
}

impl UpdateTaskRequest {
    /// Creates a request with the required replacement values.
    #[must_use]
    pub fn new(title: impl Into<String>, status: TaskStatus, priority: TaskPriority) -> Self {
        Self {
            title: title.into(),
            description: None,
            status,
            priority,
            department: None,
            assignee: None,
        }
    }

    /// Sets the replacement description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the replacement department reference.
    #[must_use]
    pub const fn with_department(mut self, department: DepartmentId) -> Self {
        self.department = Some(department);
        self
    }

    /// Sets the replacement assignee reference.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assignee = Some(assignee);
        self
    }
}

/// Service-level errors for task lifecycle operations.
#[derive(Debug, Error)]
pub enum TaskLifecycleError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),

    /// Timer operation failed.
    #[error(transparent)]
    Timer(#[from] TimeTrackingError),

    /// Directory lookup failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),

    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),

    /// No user exists with the given identifier.
    #[error("user {0} not found")]
    UserNotFound(UserId),

    /// No department exists with the given identifier.
    #[error("department {0} not found")]
    DepartmentNotFound(DepartmentId),
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
///
/// Lifecycle operations persist the task only after the timer mutation
/// succeeds, so a timer failure leaves no partial state behind.
pub struct TaskLifecycleService<R, E, C, U, D>
where
    R: TaskRepository,
    E: TimeEntryRepository,
    C: Clock + Send + Sync,
    U: UserDirectory,
    D: DepartmentDirectory,
{
    repository: Arc<R>,
    tracker: TimeTrackingService<E, C>,
    clock: Arc<C>,
    users: Arc<U>,
    departments: Arc<D>,
}

impl<R, E, C, U, D> Clone for TaskLifecycleService<R, E, C, U, D>
where
    R: TaskRepository,
    E: TimeEntryRepository,
    C: Clock + Send + Sync,
    U: UserDirectory,
    D: DepartmentDirectory,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            tracker: self.tracker.clone(),
            clock: Arc::clone(&self.clock),
            users: Arc::clone(&self.users),
            departments: Arc::clone(&self.departments),
        }
    }
}

impl<R, E, C, U, D> TaskLifecycleService<R, E, C, U, D>
where
    R: TaskRepository,
    E: TimeEntryRepository,
    C: Clock + Send + Sync,
    U: UserDirectory,
    D: DepartmentDirectory,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(
        repository: Arc<R>,
        tracker: TimeTrackingService<E, C>,
        clock: Arc<C>,
        users: Arc<U>,
        departments: Arc<D>,
    ) -> Self {
        Self {
            repository,
            tracker,
            clock,
            users,
            departments,
        }
    }

    async fn find_task_or_error(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .ok_or(TaskLifecycleError::TaskNotFound(task_id))
    }

    async fn resolve_department(
        &self,
        department: Option<DepartmentId>,
    ) -> TaskLifecycleResult<Option<DepartmentId>> {
        let Some(department_id) = department else {
            return Ok(None);
        };
        if self.departments.find_by_id(department_id).await?.is_none() {
            return Err(TaskLifecycleError::DepartmentNotFound(department_id));
        }
        Ok(Some(department_id))
    }

    async fn resolve_assignee(
        &self,
        assignee: Option<UserId>,
    ) -> TaskLifecycleResult<Option<UserId>> {
        let Some(user_id) = assignee else {
            return Ok(None);
        };
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(TaskLifecycleError::UserNotFound(user_id));
        }
        Ok(Some(user_id))
    }

    /// Creates a new task.
    ///
    /// Status defaults to pending when unset. Department and assignee
    /// references are resolved against the directories and must exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when validation or reference
    /// resolution fails, or when persistence rejects the record.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let title = TaskTitle::new(request.title)?;
        let department = self.resolve_department(request.department).await?;
        let assignee = self.resolve_assignee(request.assignee).await?;
        let task = Task::new(
            NewTaskData {
                title,
                description: request.description,
                status: request.status,
                priority: request.priority,
                department,
                assignee,
            },
            &*self.clock,
        );
        self.repository.store(&task).await?;
        tracing::debug!(task_id = %task.id(), "task created");
        Ok(task)
    }

    /// Retrieves a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when no task has the
    /// given identifier.
    pub async fn get(&self, task_id: TaskId) -> TaskLifecycleResult<Task> {
        self.find_task_or_error(task_id).await
    }

    /// Lists all tasks.
    ///
    /// # Errors
    ///
    /// Returns persistence-layer errors from the repository.
    pub async fn list(&self) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.list_all().await?)
    }

    /// Lists tasks referencing a department.
    ///
    /// # Errors
    ///
    /// Returns persistence-layer errors from the repository.
    pub async fn list_by_department(
        &self,
        department: DepartmentId,
    ) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.find_by_department(department).await?)
    }

    /// Lists tasks assigned to a user.
    ///
    /// # Errors
    ///
    /// Returns persistence-layer errors from the repository.
    pub async fn list_by_assignee(&self, assignee: UserId) -> TaskLifecycleResult<Vec<Task>> {
        Ok(self.repository.find_by_assignee(assignee).await?)
    }

    /// Replaces a task's mutable attributes wholesale.
    ///
    /// Reference resolution applies as in [`Self::create`]. Timers are not
    /// touched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the task is missing, validation
    /// or reference resolution fails, or persistence rejects the change.
    pub async fn update(
        &self,
        task_id: TaskId,
        request: UpdateTaskRequest,
    ) -> TaskLifecycleResult<Task> {
        let mut task = self.find_task_or_error(task_id).await?;
        let title = TaskTitle::new(request.title)?;
        let department = self.resolve_department(request.department).await?;
        let assignee = self.resolve_assignee(request.assignee).await?;
        task.apply_update(
            TaskUpdate {
                title,
                description: request.description,
                status: request.status,
                priority: request.priority,
                department,
                assignee,
            },
            &*self.clock,
        );
        self.repository.update(&task).await?;
        Ok(task)
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when no task has the
    /// given identifier.
    pub async fn delete(&self, task_id: TaskId) -> TaskLifecycleResult<()> {
        self.repository.delete(task_id).await.map_err(|err| match err {
            TaskRepositoryError::NotFound(id) => TaskLifecycleError::TaskNotFound(id),
            other => TaskLifecycleError::Repository(other),
        })
    }

    /// Starts work on a task: assigns the acting user, moves the task to in
    /// progress, and opens their timer.
    ///
    /// The task change is persisted only after the timer opened, so a user
    /// who already has a running timer leaves the task untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when the task is
    /// missing, domain errors for invalid transitions, and
    /// [`TimeTrackingError::AlreadyActive`] through
    /// [`TaskLifecycleError::Timer`] when the user has a running timer.
    pub async fn start(&self, task_id: TaskId, user_id: UserId) -> TaskLifecycleResult<Task> {
        let mut task = self.find_task_or_error(task_id).await?;
        task.start(user_id, &*self.clock)?;
        let entry = self.tracker.start(user_id, task_id).await?;
        if let Err(err) = self.repository.update(&task).await {
            self.release_orphaned_entry(user_id).await;
            return Err(err.into());
        }
        tracing::debug!(
            task_id = %task_id,
            user_id = %user_id,
            entry_id = %entry.id(),
            "task started"
        );
        Ok(task)
    }

    /// Pauses work on a task and stops the acting user's timer.
    ///
    /// The task change is persisted only after the timer stopped, so a user
    /// with nothing running leaves the task untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when the task is
    /// missing, domain errors for invalid transitions, and
    /// [`TimeTrackingError::NoOpenEntry`] through
    /// [`TaskLifecycleError::Timer`] when no timer is running.
    pub async fn pause(&self, task_id: TaskId, user_id: UserId) -> TaskLifecycleResult<Task> {
        let mut task = self.find_task_or_error(task_id).await?;
        task.pause(&*self.clock)?;
        let entry = self.tracker.stop(user_id).await?;
        self.repository.update(&task).await?;
        tracing::debug!(
            task_id = %task_id,
            user_id = %user_id,
            minutes = entry.duration_minutes().unwrap_or_default(),
            "task paused"
        );
        Ok(task)
    }

    /// Completes a task, closing the acting user's timer when one is
    /// running.
    ///
    /// Completing a task that was never started is valid, and completing an
    /// already-completed task is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::TaskNotFound`] when the task is
    /// missing, and timer or persistence errors otherwise.
    pub async fn complete(&self, task_id: TaskId, user_id: UserId) -> TaskLifecycleResult<Task> {
        let mut task = self.find_task_or_error(task_id).await?;
        match self.tracker.stop_if_active(user_id).await? {
            StopOutcome::Stopped(entry) => {
                tracing::debug!(
                    task_id = %task_id,
                    entry_id = %entry.id(),
                    minutes = entry.duration_minutes().unwrap_or_default(),
                    "timer closed on completion"
                );
            }
            StopOutcome::NoOpenEntry => {}
        }
        task.complete(&*self.clock);
        self.repository.update(&task).await?;
        Ok(task)
    }

    /// Closes the entry left open when a task persist fails after the timer
    /// started, returning the user's open slot.
    async fn release_orphaned_entry(&self, user_id: UserId) {
        if let Err(err) = self.tracker.stop(user_id).await {
            tracing::warn!(
                user_id = %user_id,
                error = %err,
                "failed to release orphaned time entry"
            );
        }
    }
}
