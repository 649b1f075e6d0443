//! Thread-safe in-memory task repository.
//!
//! Number-writing operations serialise on the `RwLock` write guard, which
//! stands in for the transactional lock the `PostgreSQL` adapter takes.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{
        NumberRequest, NumberingEffect, Task, TaskDraft, TaskId, TaskNumber, TaskStatus,
        TaskSummary, first_free, plan_batch,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};

/// Thread-safe in-memory task repository.
#[derive(Debug, Clone)]
pub struct InMemoryTaskRepository {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug)]
struct InMemoryTaskState {
    tasks: BTreeMap<TaskId, Task>,
    next_id: i64,
}

impl Default for InMemoryTaskRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryTaskState {
                tasks: BTreeMap::new(),
                next_id: 1,
            })),
        }
    }
}

fn held_numbers(state: &InMemoryTaskState) -> BTreeSet<TaskNumber> {
    state
        .tasks
        .values()
        .filter(|task| !task.status().is_archived())
        .filter_map(Task::number)
        .collect()
}

fn active_summaries(state: &InMemoryTaskState) -> Vec<TaskSummary> {
    state
        .tasks
        .values()
        .filter(|task| !task.status().is_archived())
        .map(|task| TaskSummary {
            id: task.id(),
            number: task.number(),
            title: task.title().to_owned(),
            status: task.status(),
        })
        .collect()
}

fn allocate_id(state: &mut InMemoryTaskState) -> TaskId {
    let id = TaskId::new(state.next_id);
    state.next_id += 1;
    id
}

fn lock_poisoned(err: impl std::fmt::Display) -> TaskRepositoryError {
    TaskRepositoryError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn active_tasks(&self) -> TaskRepositoryResult<Vec<TaskSummary>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(active_summaries(&state))
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn next_number(&self) -> TaskRepositoryResult<TaskNumber> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(first_free(&held_numbers(&state))?)
    }

    async fn create(&self, draft: TaskDraft, now: DateTime<Utc>) -> TaskRepositoryResult<Task> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let number = first_free(&held_numbers(&state))?;
        let id = allocate_id(&mut state);
        let task = Task::create(id, number, draft, now);
        state.tasks.insert(id, task.clone());
        Ok(task)
    }

    async fn reconcile_and_create(
        &self,
        requests: Vec<NumberRequest>,
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<Vec<Task>> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let snapshot = active_summaries(&state);
        let requested: Vec<Option<TaskNumber>> =
            requests.iter().map(NumberRequest::requested).collect();
        let plan = plan_batch(&snapshot, &requested)?;

        // Displacements are applied before any insertion, mirroring the
        // flush ordering the PostgreSQL adapter uses inside its transaction.
        for reassignment in plan.reassignments() {
            let displaced = state
                .tasks
                .get_mut(&reassignment.task)
                .ok_or(TaskRepositoryError::NotFound(reassignment.task))?;
            displaced.assign_number(reassignment.new_number, now);
        }

        let mut created = Vec::with_capacity(requests.len());
        for (request, number) in requests.into_iter().zip(plan.assignments().iter().copied()) {
            let id = allocate_id(&mut state);
            let task = Task::create(id, number, request.into_draft(), now);
            state.tasks.insert(id, task.clone());
            created.push(task);
        }
        Ok(created)
    }

    async fn change_status(
        &self,
        id: TaskId,
        status: TaskStatus,
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task> {
        let mut state = self.state.write().map_err(lock_poisoned)?;
        let mut task = state
            .tasks
            .get(&id)
            .cloned()
            .ok_or(TaskRepositoryError::NotFound(id))?;

        let effect = task.transition_status(status, now);
        if effect == NumberingEffect::AssignmentNeeded {
            // The stored copy is still archived and holds no number, so the
            // holder set read here excludes the task being revived.
            let number = first_free(&held_numbers(&state))?;
            task.assign_number(number, now);
        }
        state.tasks.insert(id, task.clone());
        Ok(task)
    }

    async fn archivable_tasks(&self, cutoff: DateTime<Utc>) -> TaskRepositoryResult<Vec<TaskId>> {
        let state = self.state.read().map_err(lock_poisoned)?;
        Ok(state
            .tasks
            .values()
            .filter(|task| task.status() == TaskStatus::Done)
            .filter(|task| task.completed_at().is_some_and(|done_at| done_at <= cutoff))
            .map(Task::id)
            .collect())
    }
}
