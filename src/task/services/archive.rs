//! Lazy archive sweep for completed tasks.
//!
//! List endpoints invoke the sweep before querying; tasks `done` for longer
//! than the retention window are archived through the regular status
//! transition, which releases their numbers for reuse.

use super::TaskLifecycleResult;
use crate::task::{domain::TaskStatus, ports::TaskRepository};
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use std::sync::Arc;

/// Days a completed task stays visible before the sweep archives it.
const DEFAULT_RETENTION_DAYS: i64 = 3;

/// Archive sweep service.
#[derive(Clone)]
pub struct ArchiveSweepService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    retention: Duration,
}

impl<R, C> ArchiveSweepService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a sweep service with the default retention window.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            clock,
            retention: Duration::days(DEFAULT_RETENTION_DAYS),
        }
    }

    /// Overrides the retention window; values outside chrono's supported
    /// range fall back to the default.
    #[must_use]
    pub fn with_retention_days(mut self, days: i64) -> Self {
        self.retention =
            Duration::try_days(days).unwrap_or_else(|| Duration::days(DEFAULT_RETENTION_DAYS));
        self
    }

    /// Archives every task completed before the retention cutoff and
    /// returns how many were archived.
    ///
    /// # Errors
    ///
    /// Returns [`super::TaskLifecycleError::Repository`] when lookup or a
    /// status change fails; earlier archivals in the sweep remain applied.
    pub async fn sweep(&self) -> TaskLifecycleResult<usize> {
        let now = self.clock.utc();
        let cutoff = self.cutoff(now);
        let ids = self.repository.archivable_tasks(cutoff).await?;
        for id in &ids {
            self.repository
                .change_status(*id, TaskStatus::Archived, now)
                .await?;
        }
        if !ids.is_empty() {
            tracing::info!(archived = ids.len(), "archive sweep retired completed tasks");
        }
        Ok(ids.len())
    }

    fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(self.retention)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}
