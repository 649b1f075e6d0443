//! Shared builders for in-memory integration tests.

use std::sync::Arc;

use mockable::DefaultClock;
use tablon::import::adapters::memory::ScriptedClassifier;
use tablon::import::services::ImportService;
use tablon::task::adapters::memory::InMemoryTaskRepository;
use tablon::task::domain::{TaskNumber, TaskSummary, UserId};
use tablon::task::services::{ArchiveSweepService, CreateTaskRequest, TaskLifecycleService};

/// Import service type used by the integration tests.
pub type TestImportService =
    ImportService<InMemoryTaskRepository, ScriptedClassifier, DefaultClock>;

/// Lifecycle service type used by the integration tests.
pub type TestLifecycleService = TaskLifecycleService<InMemoryTaskRepository, DefaultClock>;

/// Sweep service type used by the integration tests.
pub type TestSweepService = ArchiveSweepService<InMemoryTaskRepository, DefaultClock>;

static TRACING: std::sync::Once = std::sync::Once::new();

/// Installs a test-writer subscriber once so `RUST_LOG` surfaces the
/// crate's tracing output during test runs.
pub fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

/// Creates an empty shared repository.
pub fn repository() -> Arc<InMemoryTaskRepository> {
    init_tracing();
    Arc::new(InMemoryTaskRepository::new())
}

/// Builds a lifecycle service over the shared repository.
pub fn lifecycle(repository: &Arc<InMemoryTaskRepository>) -> TestLifecycleService {
    TaskLifecycleService::new(Arc::clone(repository), Arc::new(DefaultClock))
}

/// Builds an import service over the shared repository and classifier.
pub fn importer(
    repository: &Arc<InMemoryTaskRepository>,
    classifier: Arc<ScriptedClassifier>,
) -> TestImportService {
    ImportService::new(Arc::clone(repository), classifier, Arc::new(DefaultClock))
}

/// Builds a sweep service with the given retention window.
pub fn sweeper(repository: &Arc<InMemoryTaskRepository>, retention_days: i64) -> TestSweepService {
    ArchiveSweepService::new(Arc::clone(repository), Arc::new(DefaultClock))
        .with_retention_days(retention_days)
}

/// Creates `count` seed tasks through the lifecycle service.
pub async fn seed_tasks(service: &TestLifecycleService, count: usize) {
    for index in 1..=count {
        service
            .create(CreateTaskRequest::new(
                format!("Seed task {index}"),
                UserId::new(1),
            ))
            .await
            .expect("seeding should succeed");
    }
}

/// Asserts the active snapshot holds unique numbers densely packed from 1.
pub fn assert_compact_numbering(snapshot: &[TaskSummary]) {
    let mut held: Vec<u32> = snapshot
        .iter()
        .filter_map(|summary| summary.number)
        .map(TaskNumber::value)
        .collect();
    held.sort_unstable();
    let expected: Vec<u32> = (1..=u32::try_from(held.len()).expect("snapshot fits u32")).collect();
    assert_eq!(
        held, expected,
        "active task numbers must be unique and densely packed from 1"
    );
}
