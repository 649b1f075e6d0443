//! Import candidate and duplicate annotation types.

use crate::task::domain::{Priority, TaskId, TaskNumber};
use chrono::NaiveDate;
use serde::Serialize;

/// A parsed, not-yet-persisted prospective task extracted from pasted text.
///
/// The parser guarantees the title is non-empty after trimming and marker
/// stripping; lines that reduce to an empty title never leave the parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportCandidate {
    /// Task number requested by the line, if it carried one.
    pub explicit_number: Option<TaskNumber>,
    /// Cleaned task title.
    pub title: String,
    /// Urgency level; `urgent` when the line carried the marker token.
    pub priority: Priority,
    /// Date the task was originally recorded, extracted from a trailing
    /// tab field.
    pub occurred_on: Option<NaiveDate>,
}

/// Duplicate judgement for one candidate.
///
/// The shape makes the annotation invariant unrepresentable: a duplicate
/// always carries the id of a task from the snapshot the classifier saw,
/// and a non-duplicate never carries one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuplicateVerdict {
    /// The candidate is new and will be created.
    Unique {
        /// Optional explanation, carried when classification degraded.
        reason: Option<String>,
    },
    /// The candidate duplicates an existing task and is reported only.
    Duplicate {
        /// Id of the matched task from the classified snapshot.
        matched_existing_id: TaskId,
        /// Short model-provided explanation.
        reason: Option<String>,
    },
}

impl DuplicateVerdict {
    /// Returns `true` for duplicate verdicts.
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }

    /// Returns the matched task id for duplicate verdicts.
    #[must_use]
    pub const fn matched_existing_id(&self) -> Option<TaskId> {
        match self {
            Self::Duplicate {
                matched_existing_id,
                ..
            } => Some(*matched_existing_id),
            Self::Unique { .. } => None,
        }
    }

    /// Returns the explanation, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Unique { reason } | Self::Duplicate { reason, .. } => reason.as_deref(),
        }
    }
}

/// A candidate together with its duplicate judgement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedCandidate {
    /// The parsed candidate.
    pub candidate: ImportCandidate,
    /// Its duplicate judgement.
    pub verdict: DuplicateVerdict,
}
