//! Boundary between the state engine and the remote collection store.

use crate::task::{
    domain::{Completion, Task, TaskId, TaskText, UserId},
    ports::{RemoteStoreError, RemoteTaskStore, SessionProvider},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Errors surfaced by task store operations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// No signed-in session; no request was sent.
    #[error("must sign in before accessing tasks")]
    Unauthorized,
    /// The remote store failed the request.
    #[error(transparent)]
    Remote(#[from] RemoteStoreError),
}

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Translates task intents into remote store calls for the signed-in user.
///
/// Every operation checks for a session first and fails with
/// [`TaskStoreError::Unauthorized`] without contacting the store when there is
/// none. Failed calls are never retried here.
pub struct TaskStoreAdapter<S, P, C>
where
    S: RemoteTaskStore,
    P: SessionProvider,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    sessions: Arc<P>,
    clock: Arc<C>,
}

impl<S, P, C> Clone for TaskStoreAdapter<S, P, C>
where
    S: RemoteTaskStore,
    P: SessionProvider,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            sessions: Arc::clone(&self.sessions),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<S, P, C> TaskStoreAdapter<S, P, C>
where
    S: RemoteTaskStore,
    P: SessionProvider,
    C: Clock + Send + Sync,
{
    /// Creates a new adapter.
    #[must_use]
    pub const fn new(store: Arc<S>, sessions: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            store,
            sessions,
            clock,
        }
    }

    fn owner(&self) -> TaskStoreResult<UserId> {
        self.sessions
            .current_session()
            .map(|session| session.user_id())
            .ok_or(TaskStoreError::Unauthorized)
    }

    /// Fetches all tasks, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Unauthorized`] without a session, or
    /// [`TaskStoreError::Remote`] when the store fails.
    pub async fn list_all(&self) -> TaskStoreResult<Vec<Task>> {
        let owner = self.owner()?;
        let mut tasks = self.store.list(owner).await?;
        tasks.sort_by(|left, right| right.created_at().cmp(&left.created_at()));
        Ok(tasks)
    }

    /// Creates an open task and returns the stored record with its id.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Unauthorized`] without a session, or
    /// [`TaskStoreError::Remote`] when the store rejects the text or the
    /// request fails.
    pub async fn create(&self, text: &TaskText) -> TaskStoreResult<Task> {
        let owner = self.owner()?;
        let task = self.store.insert(owner, text).await?;
        debug!(task_id = %task.id(), "created task");
        Ok(task)
    }

    /// Sets the completion flag, deriving the timestamp from the clock.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Unauthorized`] without a session, or
    /// [`TaskStoreError::Remote`] when the task is missing or the request
    /// fails.
    pub async fn set_completion(&self, id: TaskId, completed: bool) -> TaskStoreResult<()> {
        let completion = Completion::for_state(completed, self.clock.utc());
        self.apply_completion(id, completion).await
    }

    /// Writes an exact completion pair in one remote update.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Unauthorized`] without a session, or
    /// [`TaskStoreError::Remote`] when the task is missing or the request
    /// fails.
    pub async fn apply_completion(
        &self,
        id: TaskId,
        completion: Completion,
    ) -> TaskStoreResult<()> {
        let owner = self.owner()?;
        self.store.update_completion(owner, id, completion).await?;
        debug!(task_id = %id, completed = completion.completed(), "updated completion");
        Ok(())
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Unauthorized`] without a session, or
    /// [`TaskStoreError::Remote`] when the task is missing or the request
    /// fails.
    pub async fn remove(&self, id: TaskId) -> TaskStoreResult<()> {
        let owner = self.owner()?;
        self.store.delete(owner, id).await?;
        debug!(task_id = %id, "removed task");
        Ok(())
    }
}
