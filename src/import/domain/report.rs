//! Batch report returned to import callers.

use crate::task::domain::{Task, TaskId, TaskNumber};
use serde::Serialize;

/// One skipped candidate, reported but never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateEntry {
    /// Parsed title of the skipped candidate.
    pub title: String,
    /// Number the line requested, if any.
    pub explicit_number: Option<TaskNumber>,
    /// Id of the existing task it duplicates.
    pub matched_existing_id: TaskId,
    /// Short explanation from the classifier.
    pub reason: Option<String>,
}

/// Outcome of one bulk import call. Produced per call, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportBatchResult {
    created: Vec<Task>,
    duplicates: Vec<DuplicateEntry>,
    total_parsed: usize,
}

impl ImportBatchResult {
    /// Assembles the report for a committed batch.
    #[must_use]
    pub const fn new(
        created: Vec<Task>,
        duplicates: Vec<DuplicateEntry>,
        total_parsed: usize,
    ) -> Self {
        Self {
            created,
            duplicates,
            total_parsed,
        }
    }

    /// Returns the created tasks, in candidate order.
    #[must_use]
    pub fn created(&self) -> &[Task] {
        &self.created
    }

    /// Returns the skipped duplicates, in candidate order.
    #[must_use]
    pub fn duplicates(&self) -> &[DuplicateEntry] {
        &self.duplicates
    }

    /// Returns how many candidates the parser produced.
    #[must_use]
    pub const fn total_parsed(&self) -> usize {
        self.total_parsed
    }

    /// Returns how many tasks were created.
    #[must_use]
    pub fn total_created(&self) -> usize {
        self.created.len()
    }

    /// Returns how many candidates were skipped as duplicates.
    #[must_use]
    pub fn total_duplicates(&self) -> usize {
        self.duplicates.len()
    }
}
