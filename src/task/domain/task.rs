//! Task record and completion state.

use super::{TaskId, TaskText};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The `(completed, completed_at)` pair of a task.
///
/// Values built through [`Completion::open`] and [`Completion::done_at`]
/// always satisfy the invariant that `completed_at` is set exactly when
/// `completed` is true. [`Task::completion`] may return a pair that violates
/// it when the remote store handed back an inconsistent record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Completion {
    completed: bool,
    completed_at: Option<DateTime<Utc>>,
}

impl Completion {
    /// An open (not completed) task.
    #[must_use]
    pub const fn open() -> Self {
        Self {
            completed: false,
            completed_at: None,
        }
    }

    /// A task completed at the given instant.
    #[must_use]
    pub const fn done_at(completed_at: DateTime<Utc>) -> Self {
        Self {
            completed: true,
            completed_at: Some(completed_at),
        }
    }

    /// Derives the pair for setting `completed` at `now`.
    #[must_use]
    pub const fn for_state(completed: bool, now: DateTime<Utc>) -> Self {
        if completed {
            Self::done_at(now)
        } else {
            Self::open()
        }
    }

    /// Returns the pair produced by flipping `completed` at `now`.
    #[must_use]
    pub const fn toggled(self, now: DateTime<Utc>) -> Self {
        Self::for_state(!self.completed, now)
    }

    const fn from_raw(completed: bool, completed_at: Option<DateTime<Utc>>) -> Self {
        Self {
            completed,
            completed_at,
        }
    }

    /// Returns whether the task is completed.
    #[must_use]
    pub const fn completed(self) -> bool {
        self.completed
    }

    /// Returns the completion timestamp, if any.
    #[must_use]
    pub const fn completed_at(self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns whether `completed_at` is set exactly when `completed` is true.
    #[must_use]
    pub const fn is_consistent(self) -> bool {
        self.completed == self.completed_at.is_some()
    }
}

impl Default for Completion {
    fn default() -> Self {
        Self::open()
    }
}

/// A task record mirrored from the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    text: TaskText,
    completed: bool,
    created_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a task from remote storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Remote-assigned identifier.
    pub id: TaskId,
    /// Task text.
    pub text: TaskText,
    /// Persisted completion flag.
    pub completed: bool,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a freshly inserted, open task.
    #[must_use]
    pub const fn created(id: TaskId, text: TaskText, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            text,
            completed: false,
            created_at,
            completed_at: None,
        }
    }

    /// Reconstructs a task from a remote record, verbatim.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            text: data.text,
            completed: data.completed,
            created_at: data.created_at,
            completed_at: data.completed_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task text.
    #[must_use]
    pub const fn text(&self) -> &TaskText {
        &self.text
    }

    /// Returns whether the task is completed.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the completion timestamp, if any.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns the stored completion pair exactly as held.
    #[must_use]
    pub const fn completion(&self) -> Completion {
        Completion::from_raw(self.completed, self.completed_at)
    }

    /// Replaces the completion pair.
    pub const fn apply_completion(&mut self, completion: Completion) {
        self.completed = completion.completed;
        self.completed_at = completion.completed_at;
    }

    /// Returns whether `completed_at` is set exactly when the task is
    /// completed.
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        self.completion().is_consistent()
    }
}
