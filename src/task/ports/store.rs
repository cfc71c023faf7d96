//! Remote collection store port.

use crate::task::domain::{Completion, Task, TaskId, TaskText, UserId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for remote store operations.
pub type RemoteStoreResult<T> = Result<T, RemoteStoreError>;

/// Networked collection of task records keyed by id and scoped per owner.
#[async_trait]
pub trait RemoteTaskStore: Send + Sync {
    /// Fetches every task owned by `owner`, newest first.
    async fn list(&self, owner: UserId) -> RemoteStoreResult<Vec<Task>>;

    /// Inserts an open task. The store assigns `id` and `created_at`.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteStoreError::Rejected`] when the store refuses the text.
    /// Nothing is persisted on failure.
    async fn insert(&self, owner: UserId, text: &TaskText) -> RemoteStoreResult<Task>;

    /// Writes the completion pair of one task atomically.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteStoreError::NotFound`] when `owner` has no task `id`.
    async fn update_completion(
        &self,
        owner: UserId,
        id: TaskId,
        completion: Completion,
    ) -> RemoteStoreResult<()>;

    /// Deletes one task.
    ///
    /// # Errors
    ///
    /// Returns [`RemoteStoreError::NotFound`] when `owner` has no task `id`.
    async fn delete(&self, owner: UserId, id: TaskId) -> RemoteStoreResult<()>;
}

/// Errors returned by remote store implementations.
#[derive(Debug, Clone, Error)]
pub enum RemoteStoreError {
    /// No record with the identifier exists for the owner.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The store refused the request.
    #[error("request rejected by store: {0}")]
    Rejected(String),

    /// The store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Transport or driver failure.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl RemoteStoreError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
