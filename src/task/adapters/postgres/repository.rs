//! `PostgreSQL` repository implementation for task persistence.
//!
//! Number-writing operations run inside one transaction that first takes a
//! transaction-scoped advisory lock on the number namespace, then re-reads
//! the holder set, so concurrent callers serialise instead of racing for
//! the same smallest free number. The partial unique index on active task
//! numbers backstops the invariant; a violation maps to
//! [`TaskRepositoryError::NumberConflict`].

use super::{
    models::{NewTaskRow, TaskRow},
    schema::tasks,
};
use crate::task::{
    domain::{
        NumberRequest, NumberingEffect, PersistedTaskData, Priority, Task, TaskDraft, TaskId,
        TaskNumber, TaskStatus, TaskSummary, UserId, first_free, plan_batch,
    },
    ports::{TaskRepository, TaskRepositoryError, TaskRepositoryResult},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};
use std::collections::BTreeSet;

/// `PostgreSQL` connection pool type used by task adapters.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// Advisory lock key for the task-number namespace ("tablon", tag 1).
const NUMBER_NAMESPACE_LOCK: i64 = 0x7461_626c_6f6e_0001;

/// `PostgreSQL`-backed task repository.
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: TaskPgPool,
}

impl PostgresTaskRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskRepositoryError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskRepositoryError::persistence)?
    }
}

impl From<DieselError> for TaskRepositoryError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                if is_active_number_violation(info.as_ref()) =>
            {
                Self::NumberConflict
            }
            _ => Self::persistence(err),
        }
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn active_tasks(&self) -> TaskRepositoryResult<Vec<TaskSummary>> {
        self.run_blocking(load_active_summaries).await
    }

    async fn find_by_id(&self, id: TaskId) -> TaskRepositoryResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .filter(tasks::id.eq(id.value()))
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
        .await
    }

    async fn next_number(&self) -> TaskRepositoryResult<TaskNumber> {
        self.run_blocking(|connection| {
            let held = load_held_numbers(connection)?;
            Ok(first_free(&held)?)
        })
        .await
    }

    async fn create(&self, draft: TaskDraft, now: DateTime<Utc>) -> TaskRepositoryResult<Task> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx_conn| {
                lock_number_namespace(tx_conn)?;
                let held = load_held_numbers(tx_conn)?;
                let number = first_free(&held)?;
                insert_draft(tx_conn, &draft, number, now)
            })
        })
        .await
    }

    async fn reconcile_and_create(
        &self,
        requests: Vec<NumberRequest>,
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx_conn| {
                lock_number_namespace(tx_conn)?;
                let snapshot = load_active_summaries(tx_conn)?;
                let requested: Vec<Option<TaskNumber>> =
                    requests.iter().map(NumberRequest::requested).collect();
                let plan = plan_batch(&snapshot, &requested)?;

                // Every displacement is persisted before the first insert;
                // rollback on any failure leaves no partial batch behind.
                for reassignment in plan.reassignments() {
                    apply_reassignment(tx_conn, reassignment.task, reassignment.new_number, now)?;
                }

                let mut created = Vec::with_capacity(requests.len());
                for (request, number) in
                    requests.iter().zip(plan.assignments().iter().copied())
                {
                    created.push(insert_draft(tx_conn, request.draft(), number, now)?);
                }
                Ok(created)
            })
        })
        .await
    }

    async fn change_status(
        &self,
        id: TaskId,
        status: TaskStatus,
        now: DateTime<Utc>,
    ) -> TaskRepositoryResult<Task> {
        self.run_blocking(move |connection| {
            connection.transaction::<_, TaskRepositoryError, _>(|tx_conn| {
                lock_number_namespace(tx_conn)?;
                let row = tasks::table
                    .filter(tasks::id.eq(id.value()))
                    .select(TaskRow::as_select())
                    .first::<TaskRow>(tx_conn)
                    .optional()?
                    .ok_or(TaskRepositoryError::NotFound(id))?;
                let mut task = row_to_task(row)?;

                let effect = task.transition_status(status, now);
                if effect == NumberingEffect::AssignmentNeeded {
                    // The stored row is still archived, so the holder set
                    // read here excludes the task being revived.
                    let held = load_held_numbers(tx_conn)?;
                    let number = first_free(&held)?;
                    task.assign_number(number, now);
                }
                persist_lifecycle(tx_conn, &task)?;
                Ok(task)
            })
        })
        .await
    }

    async fn archivable_tasks(&self, cutoff: DateTime<Utc>) -> TaskRepositoryResult<Vec<TaskId>> {
        self.run_blocking(move |connection| {
            let ids = tasks::table
                .filter(tasks::status.eq(TaskStatus::Done.as_str()))
                .filter(tasks::completed_at.le(cutoff))
                .order(tasks::id.asc())
                .select(tasks::id)
                .load::<i64>(connection)?;
            Ok(ids.into_iter().map(TaskId::new).collect())
        })
        .await
    }
}

/// Takes the transaction-scoped advisory lock serialising number writers.
fn lock_number_namespace(connection: &mut PgConnection) -> TaskRepositoryResult<()> {
    diesel::sql_query("SELECT pg_advisory_xact_lock($1)")
        .bind::<diesel::sql_types::BigInt, _>(NUMBER_NAMESPACE_LOCK)
        .execute(connection)?;
    Ok(())
}

fn load_active_summaries(
    connection: &mut PgConnection,
) -> TaskRepositoryResult<Vec<TaskSummary>> {
    let rows = tasks::table
        .filter(tasks::status.ne(TaskStatus::Archived.as_str()))
        .order(tasks::id.asc())
        .select((tasks::id, tasks::task_number, tasks::title, tasks::status))
        .load::<(i64, Option<i32>, String, String)>(connection)?;

    rows.into_iter()
        .map(|(id, number, title, status)| {
            Ok(TaskSummary {
                id: TaskId::new(id),
                number: number_from_db(number)?,
                title,
                status: parse_status(&status)?,
            })
        })
        .collect()
}

fn load_held_numbers(connection: &mut PgConnection) -> TaskRepositoryResult<BTreeSet<TaskNumber>> {
    let numbers = tasks::table
        .filter(tasks::status.ne(TaskStatus::Archived.as_str()))
        .filter(tasks::task_number.is_not_null())
        .select(tasks::task_number)
        .load::<Option<i32>>(connection)?;

    numbers
        .into_iter()
        .flatten()
        .map(|value| {
            let unsigned = u32::try_from(value).map_err(TaskRepositoryError::persistence)?;
            Ok(TaskNumber::new(unsigned)?)
        })
        .collect()
}

fn insert_draft(
    connection: &mut PgConnection,
    draft: &TaskDraft,
    number: TaskNumber,
    now: DateTime<Utc>,
) -> TaskRepositoryResult<Task> {
    let new_row = NewTaskRow {
        task_number: Some(number_to_db(number)?),
        title: draft.title().to_owned(),
        description: draft.description().map(ToOwned::to_owned),
        status: TaskStatus::Pending.as_str().to_owned(),
        priority: draft.priority().as_str().to_owned(),
        assigned_to: draft.assigned_to().map(|user| user.value()),
        created_by: draft.created_by().value(),
        created_at: draft.creation_timestamp(now),
        updated_at: now,
    };

    let row = diesel::insert_into(tasks::table)
        .values(&new_row)
        .returning(TaskRow::as_returning())
        .get_result::<TaskRow>(connection)?;
    row_to_task(row)
}

fn apply_reassignment(
    connection: &mut PgConnection,
    task: TaskId,
    new_number: TaskNumber,
    now: DateTime<Utc>,
) -> TaskRepositoryResult<()> {
    let updated = diesel::update(tasks::table.filter(tasks::id.eq(task.value())))
        .set((
            tasks::task_number.eq(Some(number_to_db(new_number)?)),
            tasks::updated_at.eq(now),
        ))
        .execute(connection)?;
    if updated == 0 {
        return Err(TaskRepositoryError::NotFound(task));
    }
    Ok(())
}

fn persist_lifecycle(connection: &mut PgConnection, task: &Task) -> TaskRepositoryResult<()> {
    let number = task.number().map(number_to_db).transpose()?;
    let updated = diesel::update(tasks::table.filter(tasks::id.eq(task.id().value())))
        .set((
            tasks::task_number.eq(number),
            tasks::status.eq(task.status().as_str()),
            tasks::completed_at.eq(task.completed_at()),
            tasks::archived_at.eq(task.archived_at()),
            tasks::updated_at.eq(task.updated_at()),
        ))
        .execute(connection)?;
    if updated == 0 {
        return Err(TaskRepositoryError::NotFound(task.id()));
    }
    Ok(())
}

fn row_to_task(row: TaskRow) -> TaskRepositoryResult<Task> {
    let TaskRow {
        id,
        task_number,
        title,
        description,
        status,
        priority,
        assigned_to,
        created_by,
        completed_at,
        archived_at,
        created_at,
        updated_at,
    } = row;

    let data = PersistedTaskData {
        id: TaskId::new(id),
        number: number_from_db(task_number)?,
        title,
        description,
        status: parse_status(&status)?,
        priority: parse_priority(&priority)?,
        assigned_to: assigned_to.map(UserId::new),
        created_by: UserId::new(created_by),
        completed_at,
        archived_at,
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}

fn parse_status(value: &str) -> TaskRepositoryResult<TaskStatus> {
    TaskStatus::try_from(value).map_err(TaskRepositoryError::persistence)
}

fn parse_priority(value: &str) -> TaskRepositoryResult<Priority> {
    Priority::try_from(value).map_err(TaskRepositoryError::persistence)
}

fn number_from_db(value: Option<i32>) -> TaskRepositoryResult<Option<TaskNumber>> {
    value
        .map(|raw| {
            let unsigned = u32::try_from(raw).map_err(TaskRepositoryError::persistence)?;
            TaskNumber::new(unsigned).map_err(TaskRepositoryError::from)
        })
        .transpose()
}

fn number_to_db(number: TaskNumber) -> TaskRepositoryResult<i32> {
    i32::try_from(number.value()).map_err(TaskRepositoryError::persistence)
}

fn is_active_number_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == "idx_tasks_active_number_unique")
}
