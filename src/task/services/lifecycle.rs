//! Service layer for single-task creation and status changes.

use crate::task::{
    domain::{Priority, Task, TaskDomainError, TaskDraft, TaskId, TaskNumber, TaskStatus, TaskSummary, UserId},
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a single task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
    priority: Priority,
    assignee: Option<UserId>,
    created_by: UserId,
}

impl CreateTaskRequest {
    /// Creates a request with required fields.
    #[must_use]
    pub fn new(title: impl Into<String>, created_by: UserId) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: Priority::default(),
            assignee: None,
            created_by,
        }
    }

    /// Sets the free-form description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the urgency level.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the assignee.
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
}

/// Result type for task lifecycle service operations.
pub type TaskLifecycleResult<T> = Result<T, TaskLifecycleError>;

/// Task lifecycle orchestration service.
#[derive(Clone)]
pub struct TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskLifecycleService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task lifecycle service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a single task, allocating the next free number inside the
    /// insert transaction.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError`] when the title is invalid or the
    /// repository rejects persistence.
    pub async fn create(&self, request: CreateTaskRequest) -> TaskLifecycleResult<Task> {
        let mut draft = TaskDraft::new(request.title, request.created_by)?;
        if let Some(description) = request.description {
            draft = draft.with_description(description);
        }
        draft = draft.with_priority(request.priority);
        if let Some(assignee) = request.assignee {
            draft = draft.with_assignee(assignee);
        }

        let task = self.repository.create(draft, self.clock.utc()).await?;
        Ok(task)
    }

    /// Applies a status change, releasing or reassigning the task number as
    /// the transition demands.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the task does not
    /// exist or persistence fails.
    pub async fn change_status(&self, id: TaskId, status: TaskStatus) -> TaskLifecycleResult<Task> {
        let task = self
            .repository
            .change_status(id, status, self.clock.utc())
            .await?;
        Ok(task)
    }

    /// Soft-deletes a task by archiving it, releasing its number.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when the task does not
    /// exist or persistence fails.
    pub async fn delete(&self, id: TaskId) -> TaskLifecycleResult<Task> {
        self.change_status(id, TaskStatus::Archived).await
    }

    /// Returns the smallest free task number over a fresh holder-set read.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn next_number(&self) -> TaskLifecycleResult<TaskNumber> {
        let number = self.repository.next_number().await?;
        Ok(number)
    }

    /// Retrieves a task by identifier.
    ///
    /// Returns `Ok(None)` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when persistence lookup
    /// fails.
    pub async fn find_by_id(&self, id: TaskId) -> TaskLifecycleResult<Option<Task>> {
        let result: TaskRepositoryResult<Option<Task>> = self.repository.find_by_id(id).await;
        Ok(result?)
    }

    /// Returns the snapshot of non-archived tasks, ordered by id.
    ///
    /// # Errors
    ///
    /// Returns [`TaskLifecycleError::Repository`] when persistence fails.
    pub async fn active_tasks(&self) -> TaskLifecycleResult<Vec<TaskSummary>> {
        let snapshot = self.repository.active_tasks().await?;
        Ok(snapshot)
    }
}
