//! Diesel row models for task persistence.

use super::schema::tasks;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Surrogate task identifier.
    pub id: i64,
    /// Compact task number; null while archived.
    pub task_number: Option<i32>,
    /// Task title.
    pub title: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Lifecycle status.
    pub status: String,
    /// Urgency level.
    pub priority: String,
    /// Optional assignee reference.
    pub assigned_to: Option<i64>,
    /// Creating user reference.
    pub created_by: i64,
    /// Completion timestamp, set while the task is `done`.
    pub completed_at: Option<DateTime<Utc>>,
    /// Archival timestamp, set while the task is `archived`.
    pub archived_at: Option<DateTime<Utc>>,
    /// Creation timestamp (possibly backdated by import).
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records; the id comes from the sequence.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Allocated task number.
    pub task_number: Option<i32>,
    /// Task title.
    pub title: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Lifecycle status.
    pub status: String,
    /// Urgency level.
    pub priority: String,
    /// Optional assignee reference.
    pub assigned_to: Option<i64>,
    /// Creating user reference.
    pub created_by: i64,
    /// Creation timestamp (possibly backdated by import).
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}
