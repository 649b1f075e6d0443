//! Read model for the active-task snapshot.

use super::{TaskId, TaskNumber, TaskStatus};
use serde::Serialize;

/// Slim view of a non-archived task, as consumed by number reconciliation
/// and the duplicate classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSummary {
    /// Task identifier.
    pub id: TaskId,
    /// Held task number, if any.
    pub number: Option<TaskNumber>,
    /// Task title.
    pub title: String,
    /// Lifecycle status (never `archived` in an active snapshot).
    pub status: TaskStatus,
}
