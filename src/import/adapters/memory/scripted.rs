//! Scripted classifier returning a canned response.

use crate::import::domain::ImportCandidate;
use crate::import::ports::{ClassifierResponse, DuplicateClassifier};
use crate::task::domain::TaskSummary;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Classifier that answers every call with a fixed response and counts
/// how often it was invoked.
#[derive(Debug)]
pub struct ScriptedClassifier {
    response: ClassifierResponse,
    calls: AtomicUsize,
}

impl ScriptedClassifier {
    /// Creates a classifier that always answers with `response`.
    #[must_use]
    pub const fn new(response: ClassifierResponse) -> Self {
        Self {
            response,
            calls: AtomicUsize::new(0),
        }
    }

    /// Creates a classifier simulating an outage.
    #[must_use]
    pub const fn unavailable() -> Self {
        Self::new(ClassifierResponse::Unavailable)
    }

    /// Returns how many times [`DuplicateClassifier::classify`] ran.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DuplicateClassifier for ScriptedClassifier {
    async fn classify(
        &self,
        _existing: &[TaskSummary],
        _incoming: &[ImportCandidate],
    ) -> ClassifierResponse {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.response.clone()
    }
}
