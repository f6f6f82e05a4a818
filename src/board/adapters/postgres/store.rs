//! `PostgreSQL` implementation of the task record store.

use super::{
    models::{NewTaskRow, TaskChangeset, TaskRow, UserRow},
    schema::{tasks, users},
};
use crate::board::{
    domain::{
        NewTask, PersistedTaskData, Task, TaskDomainError, TaskId, TaskPatch, TaskStatus, User,
        UserId,
    },
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use mockable::{Clock, DefaultClock};
use std::sync::Arc;

/// `PostgreSQL` connection pool type used by the board adapter.
pub type BoardPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed task store.
pub struct PostgresTaskStore<C = DefaultClock> {
    pool: BoardPgPool,
    clock: Arc<C>,
}

impl PostgresTaskStore<DefaultClock> {
    /// Creates a store from a connection pool using the system clock.
    #[must_use]
    pub fn new(pool: BoardPgPool) -> Self {
        Self::with_clock(pool, Arc::new(DefaultClock))
    }
}

impl<C> Clone for PostgresTaskStore<C> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<C: Clock + Send + Sync + 'static> PostgresTaskStore<C> {
    /// Creates a store stamping records with `clock`.
    #[must_use]
    pub const fn with_clock(pool: BoardPgPool, clock: Arc<C>) -> Self {
        Self { pool, clock }
    }

    async fn run_blocking<F, T>(&self, f: F) -> TaskStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> TaskStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(TaskStoreError::unavailable)?;
            f(&mut connection)
        })
        .await
        .map_err(TaskStoreError::unavailable)?
    }
}

#[async_trait]
impl<C: Clock + Send + Sync + 'static> TaskStore for PostgresTaskStore<C> {
    async fn list_tasks(&self) -> TaskStoreResult<Vec<Task>> {
        self.run_blocking(|connection| {
            let rows = tasks::table
                .order(tasks::id.asc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(TaskStoreError::unavailable)?;
            Ok(rows.into_iter().map(row_to_task).collect())
        })
        .await
    }

    async fn list_users(&self) -> TaskStoreResult<Vec<User>> {
        self.run_blocking(|connection| {
            let rows = users::table
                .order(users::id.desc())
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(TaskStoreError::unavailable)?;
            Ok(rows
                .into_iter()
                .map(|row| User::new(UserId::new(row.id), row.name, row.email))
                .collect())
        })
        .await
    }

    async fn find_task(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        self.run_blocking(move |connection| {
            let row = tasks::table
                .find(id.value())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()
                .map_err(TaskStoreError::unavailable)?;
            Ok(row.map(row_to_task))
        })
        .await
    }

    async fn create_task(&self, draft: &NewTask) -> TaskStoreResult<Task> {
        let timestamp = self.clock.utc();
        let new_row = NewTaskRow {
            title: draft.title.clone(),
            description: draft.description.clone(),
            status: draft.status.as_str().to_owned(),
            due_date: draft.due_date,
            assignee_id: draft.assignee_id.map(UserId::value),
            progress: draft.progress,
            created_at: timestamp,
            updated_at: timestamp,
        };

        self.run_blocking(move |connection| {
            let row = diesel::insert_into(tasks::table)
                .values(&new_row)
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(connection)
                .map_err(TaskStoreError::unavailable)?;
            Ok(row_to_task(row))
        })
        .await
    }

    async fn update_task(&self, id: TaskId, patch: &TaskPatch) -> TaskStoreResult<Task> {
        if patch.is_empty() {
            return Err(TaskStoreError::Rejected(TaskDomainError::EmptyPatch));
        }
        let changeset = to_changeset(patch, self.clock.utc());

        self.run_blocking(move |connection| {
            let row = diesel::update(tasks::table.find(id.value()))
                .set(&changeset)
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(connection)
                .optional()
                .map_err(TaskStoreError::unavailable)?;
            updated_task(id, row)
        })
        .await
    }

    async fn delete_task(&self, id: TaskId) -> TaskStoreResult<()> {
        self.run_blocking(move |connection| {
            let deleted = diesel::delete(tasks::table.find(id.value()))
                .execute(connection)
                .map_err(TaskStoreError::unavailable)?;
            ensure_deleted(id, deleted)
        })
        .await
    }
}

/// Maps the row returned by `UPDATE ... RETURNING`; no row means no match.
pub(crate) fn updated_task(id: TaskId, row: Option<TaskRow>) -> TaskStoreResult<Task> {
    row.map(row_to_task).ok_or(TaskStoreError::NotFound(id))
}

pub(crate) const fn ensure_deleted(id: TaskId, deleted: usize) -> TaskStoreResult<()> {
    if deleted == 0 {
        return Err(TaskStoreError::NotFound(id));
    }
    Ok(())
}

pub(crate) fn to_changeset(
    patch: &TaskPatch,
    updated_at: chrono::DateTime<chrono::Utc>,
) -> TaskChangeset {
    TaskChangeset {
        title: patch.title.clone(),
        description: patch.description.clone(),
        status: patch.status.map(|stage| stage.as_str().to_owned()),
        due_date: patch.due_date,
        assignee_id: patch
            .assignee_id
            .map(|assignee| assignee.map(UserId::value)),
        progress: patch.progress,
        updated_at,
    }
}

pub(crate) fn row_to_task(row: TaskRow) -> Task {
    let TaskRow {
        id,
        title,
        description,
        status,
        due_date,
        assignee_id,
        progress,
        created_at,
        updated_at,
    } = row;

    Task::from_persisted(PersistedTaskData {
        id: TaskId::new(id),
        title,
        description,
        status: TaskStatus::from(status),
        due_date,
        assignee_id: assignee_id.map(UserId::new),
        progress,
        created_at,
        updated_at,
    })
}
