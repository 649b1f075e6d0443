//! Duplicate classifier port.
//!
//! Duplicate detection is a judgement call delegated to an external,
//! non-deterministic model. The port's contract treats the model's
//! absence, malformed output, and partial output as first-class degraded
//! outcomes rather than errors: a classifier outage must never block an
//! import, so `classify` is total and the caller pattern-matches on the
//! tagged response instead of handling failures.

use crate::import::domain::ImportCandidate;
use crate::task::domain::TaskSummary;
use async_trait::async_trait;
use serde::Deserialize;

/// One per-candidate verdict from the classifier, keyed by the candidate's
/// position in the submitted batch. Response order is irrelevant; the
/// caller re-associates by index.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IndexedVerdict {
    /// Position of the candidate in the submitted batch.
    pub index: usize,
    /// Whether the candidate duplicates an existing task.
    #[serde(default)]
    pub is_duplicate: bool,
    /// Claimed id of the matched existing task, unvalidated wire value.
    #[serde(default)]
    pub matched_existing_id: Option<i64>,
    /// Short model-provided explanation.
    #[serde(default)]
    pub reason: Option<String>,
}

/// Tagged outcome of a classification call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifierResponse {
    /// The service answered with parseable per-index verdicts; indices may
    /// be missing, repeated, or out of order.
    Verdicts(Vec<IndexedVerdict>),
    /// The service answered, but its output did not parse as verdicts.
    Malformed,
    /// No credential is configured or the service could not be reached.
    Unavailable,
}

/// External duplicate classification contract.
#[async_trait]
pub trait DuplicateClassifier: Send + Sync {
    /// Judges each incoming candidate against the existing-task snapshot.
    ///
    /// Total: degraded outcomes are encoded in [`ClassifierResponse`],
    /// never raised to the caller.
    async fn classify(
        &self,
        existing: &[TaskSummary],
        incoming: &[ImportCandidate],
    ) -> ClassifierResponse;
}
