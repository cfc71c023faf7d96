//! `PostgreSQL` implementation of the remote task store.

use super::{
    models::{CompletionChangeset, NewTaskRow, TaskRow},
    schema::tasks,
};
use crate::task::{
    domain::{Completion, PersistedTaskData, Task, TaskId, TaskText, UserId},
    ports::{RemoteStoreError, RemoteStoreResult, RemoteTaskStore},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

/// `PostgreSQL` connection pool type used by the task store.
pub type TaskPgPool = Pool<ConnectionManager<PgConnection>>;

/// Builds a connection pool for `database_url`.
///
/// # Errors
///
/// Returns [`PoolError`] when the initial connections cannot be established.
pub fn build_pool(database_url: &str, max_size: u32) -> Result<TaskPgPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder().max_size(max_size).build(manager)
}

/// `PostgreSQL`-backed remote task store.
#[derive(Debug, Clone)]
pub struct PostgresTaskStore {
    pool: TaskPgPool,
}

impl PostgresTaskStore {
    /// Creates a store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: TaskPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> RemoteStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> RemoteStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool
                .get()
                .map_err(|err| RemoteStoreError::Unavailable(err.to_string()))?;
            f(&mut connection)
        })
        .await
        .map_err(RemoteStoreError::transport)?
    }
}

#[async_trait]
impl RemoteTaskStore for PostgresTaskStore {
    async fn list(&self, owner: UserId) -> RemoteStoreResult<Vec<Task>> {
        self.run_blocking(move |connection| {
            let rows = tasks::table
                .filter(tasks::owner_id.eq(owner.into_inner()))
                .order(tasks::created_at.desc())
                .select(TaskRow::as_select())
                .load::<TaskRow>(connection)
                .map_err(map_diesel_error)?;
            debug!(%owner, count = rows.len(), "loaded task rows");
            rows.into_iter().map(row_to_task).collect()
        })
        .await
    }

    async fn insert(&self, owner: UserId, text: &TaskText) -> RemoteStoreResult<Task> {
        let text = text.as_str().to_owned();
        self.run_blocking(move |connection| {
            let row = diesel::insert_into(tasks::table)
                .values(&NewTaskRow {
                    owner_id: owner.into_inner(),
                    text: &text,
                })
                .returning(TaskRow::as_returning())
                .get_result::<TaskRow>(connection)
                .map_err(map_diesel_error)?;
            row_to_task(row)
        })
        .await
    }

    async fn update_completion(
        &self,
        owner: UserId,
        id: TaskId,
        completion: Completion,
    ) -> RemoteStoreResult<()> {
        self.run_blocking(move |connection| {
            let changeset = CompletionChangeset {
                completed: completion.completed(),
                completed_at: completion.completed_at(),
            };
            let affected = diesel::update(
                tasks::table
                    .filter(tasks::id.eq(id.into_inner()))
                    .filter(tasks::owner_id.eq(owner.into_inner())),
            )
            .set(&changeset)
            .execute(connection)
            .map_err(map_diesel_error)?;
            expect_single_row(affected, id)
        })
        .await
    }

    async fn delete(&self, owner: UserId, id: TaskId) -> RemoteStoreResult<()> {
        self.run_blocking(move |connection| {
            let affected = diesel::delete(
                tasks::table
                    .filter(tasks::id.eq(id.into_inner()))
                    .filter(tasks::owner_id.eq(owner.into_inner())),
            )
            .execute(connection)
            .map_err(map_diesel_error)?;
            expect_single_row(affected, id)
        })
        .await
    }
}

fn expect_single_row(affected: usize, id: TaskId) -> RemoteStoreResult<()> {
    if affected == 0 {
        return Err(RemoteStoreError::NotFound(id));
    }
    Ok(())
}

fn row_to_task(row: TaskRow) -> RemoteStoreResult<Task> {
    let TaskRow {
        id,
        owner_id: _,
        text,
        completed,
        created_at,
        completed_at,
    } = row;

    let text = TaskText::new(text).map_err(RemoteStoreError::transport)?;
    Ok(Task::from_persisted(PersistedTaskData {
        id: TaskId::from_uuid(id),
        text,
        completed,
        created_at,
        completed_at,
    }))
}

fn map_diesel_error(err: DieselError) -> RemoteStoreError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, ref info) => {
            RemoteStoreError::Rejected(info.message().to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, ref info) => {
            RemoteStoreError::Unavailable(info.message().to_owned())
        }
        _ => RemoteStoreError::transport(err),
    }
}
