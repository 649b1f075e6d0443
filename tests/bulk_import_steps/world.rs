//! Shared world state for bulk import behaviour scenarios.

use std::sync::Arc;

use mockable::DefaultClock;
use rstest::fixture;
use tablon::import::adapters::memory::ScriptedClassifier;
use tablon::import::domain::ImportBatchResult;
use tablon::import::services::{ImportError, ImportRequest, ImportService};
use tablon::task::adapters::memory::InMemoryTaskRepository;
use tablon::task::domain::UserId;
use tablon::task::services::TaskLifecycleService;

/// Import service type used by the BDD world.
pub type TestImportService =
    ImportService<InMemoryTaskRepository, ScriptedClassifier, DefaultClock>;

/// Lifecycle service type used by the BDD world.
pub type TestLifecycleService = TaskLifecycleService<InMemoryTaskRepository, DefaultClock>;

/// Scenario world for bulk import behaviour tests.
pub struct ImportWorld {
    pub lifecycle: TestLifecycleService,
    pub importer: TestImportService,
    pub requester: UserId,
    pub pending_lines: Vec<String>,
    pub last_result: Option<Result<ImportBatchResult, ImportError>>,
}

impl ImportWorld {
    /// Creates a world with an empty board and an unavailable classifier,
    /// the defined degraded mode for classification.
    #[must_use]
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryTaskRepository::new());
        let clock = Arc::new(DefaultClock);
        let lifecycle = TaskLifecycleService::new(Arc::clone(&repository), Arc::clone(&clock));
        let importer = ImportService::new(
            repository,
            Arc::new(ScriptedClassifier::unavailable()),
            clock,
        );
        Self {
            lifecycle,
            importer,
            requester: UserId::new(1),
            pending_lines: Vec::new(),
            last_result: None,
        }
    }

    /// Builds the pasted text from the lines accumulated by given steps.
    #[must_use]
    pub fn pasted_text(&self) -> String {
        self.pending_lines.join("\n")
    }

    /// Builds the import request for the accumulated text.
    #[must_use]
    pub fn import_request(&self) -> ImportRequest {
        ImportRequest::new(self.pasted_text(), self.requester)
    }
}

impl Default for ImportWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Provides a fresh world per scenario.
#[fixture]
pub fn world() -> ImportWorld {
    ImportWorld::new()
}

/// Runs a future to completion on the scenario's runtime.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

/// Parses a quoted number list such as `"2, 3, 4"`.
#[must_use]
pub fn parse_number_list(text: &str) -> Vec<u32> {
    text.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(|part| part.parse::<u32>().ok())
        .collect()
}
