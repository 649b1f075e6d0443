//! Repository port for task persistence and number allocation.
//!
//! Every method that reads the current number-holder set and then writes
//! numbers executes inside a single storage transaction; implementations
//! serialise those transactions (lock or conflict-detecting retry) so two
//! concurrent callers can never both claim the same smallest free number.

use crate::task::domain::{
    NumberRequest, Task, TaskDomainError, TaskDraft, TaskId, TaskNumber, TaskStatus, TaskSummary,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for task repository operations.
pub type TaskRepositoryResult<T> = Result<T, TaskRepositoryError>;

/// Task persistence contract.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Returns a snapshot of all non-archived tasks, ordered by id.
    async fn active_tasks(&self) -> TaskRepositoryResult<Vec<TaskSummary>>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>>;

    /// Returns the smallest positive number not held by any non-archived
    /// task, computed against a fresh read of the holder set.
    async fn next_number(&self) -> TaskRepositoryResult<TaskNumber>;

    /// Inserts a single task, allocating the next free number inside the
    /// same transaction.
    async fn create(&self, draft: TaskDraft, now: DateTime<Utc>) -> TaskRepositoryResult<Task>;

    /// Bulk insert used by import: displaces existing holders of requested
    /// numbers to safe slots, persists those reassignments, then inserts
    /// every request with its planned number, all in one transaction.
    /// Either the whole batch commits or nothing does.
    async fn reconcile_and_create(
        &self,
        requests: Vec<NumberRequest>,
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<Vec<Task>>;

    /// Applies a status change through the domain transition, honouring its
    /// numbering effect (release on archival, fresh assignment on
    /// un-archival) inside the same transaction.
    ///
    /// # Errors
    ///
    /// Returns [`TaskRepositoryError::NotFound`] when the task does not
    /// exist.
    async fn change_status(
        &self,
        id: TaskId,
        status: TaskStatus,
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task>;

    /// Returns ids of tasks `done` since before `cutoff`, candidates for
    /// the lazy archive sweep.
    async fn archivable_tasks(&self, cutoff: DateTime<Utc>) -> TaskRepositoryResult<Vec<TaskId>>;
}

/// Errors returned by task repository implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskRepositoryError {
    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// A concurrent writer claimed the same task number; the transaction
    /// was rolled back.
    #[error("task number allocation conflict")]
    NumberConflict,

    /// Domain planning or validation failed inside the transaction.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
