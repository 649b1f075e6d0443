//! Bulk-import orchestration.
//!
//! Sequencing matters: parsing and classification complete before the
//! allocation transaction begins, so a slow or hung classifier never holds
//! the number-namespace lock. The repository call then either commits the
//! whole reconciled batch or rolls it back; duplicates are reported, never
//! persisted.

use super::dedup::DuplicateDetector;
use crate::import::domain::{
    DuplicateEntry, DuplicateVerdict, ImportBatchResult, ImportCandidate, parser,
};
use crate::import::ports::DuplicateClassifier;
use crate::task::domain::{NumberRequest, TaskDomainError, TaskDraft, UserId};
use crate::task::ports::{TaskRepository, TaskRepositoryError};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Request payload for one bulk import call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportRequest {
    text: String,
    default_assignee: Option<UserId>,
    requester: UserId,
}

impl ImportRequest {
    /// Creates a request for the given pasted text and requesting user.
    #[must_use]
    pub fn new(text: impl Into<String>, requester: UserId) -> Self {
        Self {
            text: text.into(),
            default_assignee: None,
            requester,
        }
    }

    /// Assigns every created task to the given user.
    #[must_use]
    pub const fn with_default_assignee(mut self, assignee: UserId) -> Self {
        self.default_assignee = Some(assignee);
        self
    }
}

/// Service-level errors for bulk import.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The submitted text contained no parseable task lines.
    #[error("no parseable tasks found in the submitted text")]
    EmptyBatch,
    /// Domain validation failed while building drafts.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed; the whole batch was rolled back.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
}

/// Bulk-import orchestration service.
#[derive(Clone)]
pub struct ImportService<R, C, K>
where
    R: TaskRepository,
    C: DuplicateClassifier,
    K: Clock + Send + Sync,
{
    repository: Arc<R>,
    detector: DuplicateDetector<C>,
    clock: Arc<K>,
}

impl<R, C, K> ImportService<R, C, K>
where
    R: TaskRepository,
    C: DuplicateClassifier,
    K: Clock + Send + Sync,
{
    /// Creates a new import service.
    #[must_use]
    pub const fn new(repository: Arc<R>, classifier: Arc<C>, clock: Arc<K>) -> Self {
        Self {
            repository,
            detector: DuplicateDetector::new(classifier),
            clock,
        }
    }

    /// Imports a pasted block of text as one logical transaction and
    /// returns the batch report.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError::EmptyBatch`] when nothing parseable was
    /// submitted, and [`ImportError::Repository`] when persistence fails;
    /// in the latter case nothing was created and nothing was renumbered.
    pub async fn import(&self, request: ImportRequest) -> Result<ImportBatchResult, ImportError> {
        let batch_id = Uuid::new_v4();
        let candidates: Vec<ImportCandidate> = parser::candidates(&request.text).collect();
        if candidates.is_empty() {
            return Err(ImportError::EmptyBatch);
        }
        let total_parsed = candidates.len();

        let snapshot = self.repository.active_tasks().await?;
        let annotated = self.detector.annotate(candidates, &snapshot).await;

        let mut requests = Vec::new();
        let mut duplicates = Vec::new();
        for entry in annotated {
            match entry.verdict {
                DuplicateVerdict::Duplicate {
                    matched_existing_id,
                    reason,
                } => duplicates.push(DuplicateEntry {
                    title: entry.candidate.title,
                    explicit_number: entry.candidate.explicit_number,
                    matched_existing_id,
                    reason,
                }),
                DuplicateVerdict::Unique { .. } => {
                    requests.push(build_request(entry.candidate, &request)?);
                }
            }
        }

        let created = if requests.is_empty() {
            Vec::new()
        } else {
            self.repository
                .reconcile_and_create(requests, self.clock.utc())
                .await?
        };

        tracing::info!(
            batch_id = %batch_id,
            parsed = total_parsed,
            created = created.len(),
            duplicates = duplicates.len(),
            "bulk import committed"
        );
        Ok(ImportBatchResult::new(created, duplicates, total_parsed))
    }
}

fn build_request(
    candidate: ImportCandidate,
    request: &ImportRequest,
) -> Result<NumberRequest, TaskDomainError> {
    let mut draft = TaskDraft::new(candidate.title, request.requester)?;
    draft = draft.with_priority(candidate.priority);
    if let Some(date) = candidate.occurred_on {
        draft = draft.with_occurred_on(date);
    }
    if let Some(assignee) = request.default_assignee {
        draft = draft.with_assignee(assignee);
    }
    Ok(NumberRequest::new(draft, candidate.explicit_number))
}
