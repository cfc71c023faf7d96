//! In-memory remote task store.

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{Completion, Task, TaskId, TaskText, UserId},
    ports::{RemoteStoreError, RemoteStoreResult, RemoteTaskStore},
};

/// Remote store operation, used to target injected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    /// [`RemoteTaskStore::list`].
    List,
    /// [`RemoteTaskStore::insert`].
    Insert,
    /// [`RemoteTaskStore::update_completion`].
    UpdateCompletion,
    /// [`RemoteTaskStore::delete`].
    Delete,
}

/// Thread-safe in-memory stand-in for the remote collection store.
///
/// Records are scoped per owner. Identifiers are random and `created_at`
/// comes from the store's clock, mirroring server-assigned fields. Failures
/// can be queued per operation to exercise error paths.
pub struct InMemoryTaskStore<C = DefaultClock> {
    state: Arc<RwLock<InMemoryStoreState>>,
    clock: Arc<C>,
}

impl<C> Clone for InMemoryTaskStore<C> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            clock: Arc::clone(&self.clock),
        }
    }
}

#[derive(Debug, Default)]
struct InMemoryStoreState {
    // Insertion order; listing reverses it before sorting by `created_at`.
    records: Vec<(UserId, Task)>,
    pending_failures: HashMap<StoreOperation, String>,
    request_count: usize,
}

impl InMemoryTaskStore {
    /// Creates an empty store driven by the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl Default for InMemoryTaskStore {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_error(err: impl ToString) -> RemoteStoreError {
    RemoteStoreError::transport(std::io::Error::other(err.to_string()))
}

impl<C> InMemoryTaskStore<C>
where
    C: Clock + Send + Sync,
{
    /// Creates an empty store driven by the given clock.
    #[must_use]
    pub fn with_clock(clock: Arc<C>) -> Self {
        Self {
            state: Arc::new(RwLock::new(InMemoryStoreState::default())),
            clock,
        }
    }

    /// Stores an existing record for `owner` as-is.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn seed(&self, owner: UserId, task: Task) -> RemoteStoreResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.records.push((owner, task));
        Ok(())
    }

    /// Makes the next call of `operation` fail with
    /// [`RemoteStoreError::Unavailable`] carrying `message`.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn fail_next(
        &self,
        operation: StoreOperation,
        message: impl Into<String>,
    ) -> RemoteStoreResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.pending_failures.insert(operation, message.into());
        Ok(())
    }

    /// Returns the number of requests received, failed ones included.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn request_count(&self) -> RemoteStoreResult<usize> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state.request_count)
    }

    /// Returns the record `id` owned by `owner`, bypassing failure injection
    /// and request counting.
    ///
    /// # Errors
    ///
    /// Returns a transport error when lock acquisition fails.
    pub fn peek(&self, owner: UserId, id: TaskId) -> RemoteStoreResult<Option<Task>> {
        let state = self.state.read().map_err(lock_error)?;
        Ok(state
            .records
            .iter()
            .find(|(record_owner, task)| *record_owner == owner && task.id() == id)
            .map(|(_, task)| task.clone()))
    }

    fn begin(&self, operation: StoreOperation) -> RemoteStoreResult<()> {
        let mut state = self.state.write().map_err(lock_error)?;
        state.request_count += 1;
        match state.pending_failures.remove(&operation) {
            Some(message) => Err(RemoteStoreError::Unavailable(message)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<C> RemoteTaskStore for InMemoryTaskStore<C>
where
    C: Clock + Send + Sync,
{
    async fn list(&self, owner: UserId) -> RemoteStoreResult<Vec<Task>> {
        self.begin(StoreOperation::List)?;
        let state = self.state.read().map_err(lock_error)?;
        let mut tasks: Vec<Task> = state
            .records
            .iter()
            .rev()
            .filter(|(record_owner, _)| *record_owner == owner)
            .map(|(_, task)| task.clone())
            .collect();
        tasks.sort_by(|left, right| right.created_at().cmp(&left.created_at()));
        Ok(tasks)
    }

    async fn insert(&self, owner: UserId, text: &TaskText) -> RemoteStoreResult<Task> {
        self.begin(StoreOperation::Insert)?;
        let task = Task::created(TaskId::new(), text.clone(), self.clock.utc());
        let mut state = self.state.write().map_err(lock_error)?;
        state.records.push((owner, task.clone()));
        Ok(task)
    }

    async fn update_completion(
        &self,
        owner: UserId,
        id: TaskId,
        completion: Completion,
    ) -> RemoteStoreResult<()> {
        self.begin(StoreOperation::UpdateCompletion)?;
        let mut state = self.state.write().map_err(lock_error)?;
        let (_, task) = state
            .records
            .iter_mut()
            .find(|(record_owner, task)| *record_owner == owner && task.id() == id)
            .ok_or(RemoteStoreError::NotFound(id))?;
        task.apply_completion(completion);
        Ok(())
    }

    async fn delete(&self, owner: UserId, id: TaskId) -> RemoteStoreResult<()> {
        self.begin(StoreOperation::Delete)?;
        let mut state = self.state.write().map_err(lock_error)?;
        let position = state
            .records
            .iter()
            .position(|(record_owner, task)| *record_owner == owner && task.id() == id)
            .ok_or(RemoteStoreError::NotFound(id))?;
        state.records.remove(position);
        Ok(())
    }
}
