//! Task aggregate root and status/number lifecycle coupling.

use super::{ParsePriorityError, ParseTaskStatusError, TaskDomainError, TaskId, TaskNumber, UserId};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task has been created but work has not started.
    Pending,
    /// Task is being worked on.
    InProgress,
    /// Task work has finished.
    Done,
    /// Task has been retired and no longer holds a task number.
    Archived,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Done => "done",
            Self::Archived => "archived",
        }
    }

    /// Returns `true` for the archived status.
    #[must_use]
    pub const fn is_archived(self) -> bool {
        matches!(self, Self::Archived)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            "archived" => Ok(Self::Archived),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

/// Task urgency level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Low urgency.
    Low,
    /// Default urgency.
    #[default]
    Medium,
    /// Raised urgency.
    High,
    /// Highest urgency, set by the import parser's marker token.
    Urgent,
}

impl Priority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParsePriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            "urgent" => Ok(Self::Urgent),
            _ => Err(ParsePriorityError(value.to_owned())),
        }
    }
}

/// Numbering side effect demanded by a status transition.
///
/// Every status change routes through [`Task::transition_status`]; the
/// caller applies the returned effect inside the same transaction so the
/// status/number coupling cannot drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum NumberingEffect {
    /// The task keeps whatever number it held.
    Retained,
    /// The task's number was cleared and is free for reuse.
    Released,
    /// The task re-entered the active set and needs a fresh number.
    AssignmentNeeded,
}

/// Validated insert model for a new task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    title: String,
    description: Option<String>,
    priority: Priority,
    occurred_on: Option<NaiveDate>,
    assigned_to: Option<UserId>,
    created_by: UserId,
}

impl TaskDraft {
    /// Creates a draft with a validated title.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is empty after
    /// trimming.
    pub fn new(title: impl Into<String>, created_by: UserId) -> Result<Self, TaskDomainError> {
        let raw: String = title.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TaskDomainError::EmptyTitle);
        }
        Ok(Self {
            title: trimmed.to_owned(),
            description: None,
            priority: Priority::default(),
            occurred_on: None,
            assigned_to: None,
            created_by,
        })
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

    /// Sets the date the task was originally recorded; the created row's
    /// creation timestamp is backdated to this date's midnight UTC.
    #[must_use]
    pub const fn with_occurred_on(mut self, occurred_on: NaiveDate) -> Self {
        self.occurred_on = Some(occurred_on);
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee: UserId) -> Self {
        self.assigned_to = Some(assignee);
        self
    }

    /// Returns the validated title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the urgency level.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the originally-recorded date, if any.
    #[must_use]
    pub const fn occurred_on(&self) -> Option<NaiveDate> {
        self.occurred_on
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<UserId> {
        self.assigned_to
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Resolves the creation timestamp: midnight UTC of `occurred_on` when
    /// set, otherwise the transaction timestamp.
    #[must_use]
    pub fn creation_timestamp(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.occurred_on
            .map_or(now, |date| date.and_time(NaiveTime::MIN).and_utc())
    }
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted task number, absent for archived tasks.
    pub number: Option<TaskNumber>,
    /// Persisted title.
    pub title: String,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted lifecycle status.
    pub status: TaskStatus,
    /// Persisted urgency level.
    pub priority: Priority,
    /// Persisted assignee, if any.
    pub assigned_to: Option<UserId>,
    /// Persisted creating user.
    pub created_by: UserId,
    /// Persisted completion timestamp, if the task reached `done`.
    pub completed_at: Option<DateTime<Utc>>,
    /// Persisted archival timestamp, if the task was archived.
    pub archived_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest lifecycle timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    number: Option<TaskNumber>,
    title: String,
    description: Option<String>,
    status: TaskStatus,
    priority: Priority,
    assigned_to: Option<UserId>,
    created_by: UserId,
    completed_at: Option<DateTime<Utc>>,
    archived_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a pending task from a draft with its allocated number.
    #[must_use]
    pub fn create(id: TaskId, number: TaskNumber, draft: TaskDraft, now: DateTime<Utc>) -> Self {
        let created_at = draft.creation_timestamp(now);
        Self {
            id,
            number: Some(number),
            title: draft.title,
            description: draft.description,
            status: TaskStatus::Pending,
            priority: draft.priority,
            assigned_to: draft.assigned_to,
            created_by: draft.created_by,
            completed_at: None,
            archived_at: None,
            created_at,
            updated_at: now,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            number: data.number,
            title: data.title,
            description: data.description,
            status: data.status,
            priority: data.priority,
            assigned_to: data.assigned_to,
            created_by: data.created_by,
            completed_at: data.completed_at,
            archived_at: data.archived_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the held task number, absent while archived.
    #[must_use]
    pub const fn number(&self) -> Option<TaskNumber> {
        self.number
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the urgency level.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the assignee, if any.
    #[must_use]
    pub const fn assigned_to(&self) -> Option<UserId> {
        self.assigned_to
    }

    /// Returns the creating user.
    #[must_use]
    pub const fn created_by(&self) -> UserId {
        self.created_by
    }

    /// Returns the completion timestamp, if the task reached `done`.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the archival timestamp, if the task was archived.
    #[must_use]
    pub const fn archived_at(&self) -> Option<DateTime<Utc>> {
        self.archived_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest lifecycle timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies a status change and returns the numbering effect the caller
    /// must honour inside the same transaction.
    ///
    /// Entering `archived` clears the number unconditionally; leaving
    /// `archived` demands a fresh assignment via [`Self::assign_number`].
    /// Completion bookkeeping (`completed_at`) follows the `done` status.
    pub fn transition_status(&mut self, new_status: TaskStatus, now: DateTime<Utc>) -> NumberingEffect {
        let old_status = self.status;
        self.status = new_status;
        self.updated_at = now;

        if new_status == TaskStatus::Done && old_status != TaskStatus::Done {
            self.completed_at = Some(now);
        } else if new_status != TaskStatus::Done && old_status == TaskStatus::Done {
            self.completed_at = None;
        }

        match (old_status.is_archived(), new_status.is_archived()) {
            (false, true) => {
                self.archived_at = Some(now);
                self.number = None;
                NumberingEffect::Released
            }
            (true, false) => {
                self.archived_at = None;
                NumberingEffect::AssignmentNeeded
            }
            _ => NumberingEffect::Retained,
        }
    }

    /// Assigns a number, either fresh after un-archival or as a
    /// reconciliation reassignment during bulk import.
    pub fn assign_number(&mut self, number: TaskNumber, now: DateTime<Utc>) {
        self.number = Some(number);
        self.updated_at = now;
    }
}
