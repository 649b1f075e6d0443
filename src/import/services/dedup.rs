//! Duplicate detection over the classifier port.
//!
//! A classifier outage must never block an import: every degraded outcome
//! collapses to "treat as non-duplicate", and the caller always receives
//! one annotation per candidate, in input order.

use crate::import::domain::{AnnotatedCandidate, DuplicateVerdict, ImportCandidate};
use crate::import::ports::{ClassifierResponse, DuplicateClassifier, IndexedVerdict};
use crate::task::domain::{TaskId, TaskSummary};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Fixed diagnostic reason attached when the classifier's answer did not
/// parse.
pub const UNPARSEABLE_REASON: &str = "Error al analizar duplicados";

/// Service annotating candidates with duplicate verdicts.
#[derive(Debug, Clone)]
pub struct DuplicateDetector<C>
where
    C: DuplicateClassifier,
{
    classifier: Arc<C>,
}

impl<C> DuplicateDetector<C>
where
    C: DuplicateClassifier,
{
    /// Creates a detector over the given classifier.
    #[must_use]
    pub const fn new(classifier: Arc<C>) -> Self {
        Self { classifier }
    }

    /// Annotates every candidate, preserving order: one output per input.
    ///
    /// An empty snapshot short-circuits to all-unique without invoking the
    /// classifier; `Malformed` and `Unavailable` responses degrade to
    /// all-unique, with a fixed diagnostic reason in the malformed case.
    pub async fn annotate(
        &self,
        candidates: Vec<ImportCandidate>,
        existing: &[TaskSummary],
    ) -> Vec<AnnotatedCandidate> {
        if candidates.is_empty() {
            return Vec::new();
        }
        if existing.is_empty() {
            return annotate_all_unique(candidates, None);
        }

        match self.classifier.classify(existing, &candidates).await {
            ClassifierResponse::Verdicts(verdicts) => merge_verdicts(candidates, existing, verdicts),
            ClassifierResponse::Malformed => {
                tracing::warn!("classifier answer unparseable; importing all candidates");
                annotate_all_unique(candidates, Some(UNPARSEABLE_REASON.to_owned()))
            }
            ClassifierResponse::Unavailable => {
                tracing::warn!("classifier unavailable; importing all candidates");
                annotate_all_unique(candidates, None)
            }
        }
    }
}

fn annotate_all_unique(
    candidates: Vec<ImportCandidate>,
    reason: Option<String>,
) -> Vec<AnnotatedCandidate> {
    candidates
        .into_iter()
        .map(|candidate| AnnotatedCandidate {
            candidate,
            verdict: DuplicateVerdict::Unique {
                reason: reason.clone(),
            },
        })
        .collect()
}

/// Re-associates verdicts with candidates by index. The response need not
/// be ordered or complete: the first verdict per index wins, and missing
/// indices default to non-duplicate.
fn merge_verdicts(
    candidates: Vec<ImportCandidate>,
    existing: &[TaskSummary],
    verdicts: Vec<IndexedVerdict>,
) -> Vec<AnnotatedCandidate> {
    let known_ids: BTreeSet<i64> = existing.iter().map(|task| task.id.value()).collect();
    let mut by_index: BTreeMap<usize, IndexedVerdict> = BTreeMap::new();
    for verdict in verdicts {
        by_index.entry(verdict.index).or_insert(verdict);
    }

    candidates
        .into_iter()
        .enumerate()
        .map(|(index, candidate)| {
            let verdict = by_index
                .remove(&index)
                .map_or(DuplicateVerdict::Unique { reason: None }, |raw| {
                    resolve_verdict(raw, &known_ids)
                });
            AnnotatedCandidate { candidate, verdict }
        })
        .collect()
}

/// Validates a raw verdict against the snapshot the classifier saw; a
/// duplicate claim naming an unknown id is downgraded to non-duplicate.
fn resolve_verdict(raw: IndexedVerdict, known_ids: &BTreeSet<i64>) -> DuplicateVerdict {
    if raw.is_duplicate {
        if let Some(id) = raw.matched_existing_id
            && known_ids.contains(&id)
        {
            return DuplicateVerdict::Duplicate {
                matched_existing_id: TaskId::new(id),
                reason: raw.reason,
            };
        }
        tracing::warn!(
            index = raw.index,
            "duplicate verdict referenced an unknown task id; treating as non-duplicate"
        );
        return DuplicateVerdict::Unique { reason: raw.reason };
    }
    DuplicateVerdict::Unique { reason: raw.reason }
}
