//! In-memory mirror of the remote task collection.
//!
//! The engine owns the local copy of the signed-in user's tasks, applies
//! toggles optimistically, and reconciles every mutation with the remote
//! result. Buckets are derived on each read.
//!
//! State sits behind a lock that is never held across an `.await`, so the
//! collection can be read while a mutation's remote call is outstanding.
//! Adds and removes only touch local state after the store confirms them.

use super::adapter::{TaskStoreAdapter, TaskStoreError, TaskStoreResult};
use crate::task::{
    domain::{Completion, Task, TaskBuckets, TaskId, TaskText},
    ports::{RemoteTaskStore, SessionProvider},
};
use chrono::{DateTime, TimeZone, Utc};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, trace, warn};

#[derive(Debug)]
struct EngineState {
    tasks: Vec<Task>,
    loading: bool,
    last_error: Option<TaskStoreError>,
    toggles: HashMap<TaskId, ToggleTrack>,
    next_generation: u64,
}

impl EngineState {
    fn new() -> Self {
        Self {
            tasks: Vec::new(),
            loading: true,
            last_error: None,
            toggles: HashMap::new(),
            next_generation: 0,
        }
    }

    fn find_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id() == id)
    }

    fn find(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    fn show(&mut self, id: TaskId, completion: Completion) {
        if let Some(task) = self.find_mut(id) {
            task.apply_completion(completion);
        }
    }
}

/// Toggles in flight for one task.
#[derive(Debug, Clone, Copy)]
struct ToggleTrack {
    // Generation of the latest toggle issued.
    generation: u64,
    // Pair the local record shows and the store should end up holding.
    desired: Completion,
    latest_pending: bool,
    in_flight: usize,
}

/// An optimistic toggle with the record's prior completion captured.
#[derive(Debug, Clone, Copy)]
struct ToggleCommand {
    id: TaskId,
    previous: Completion,
    next: Completion,
    generation: u64,
}

impl ToggleCommand {
    /// Captures the current completion of `id` and applies the flipped pair.
    fn apply(state: &mut EngineState, id: TaskId, now: DateTime<Utc>) -> Option<Self> {
        let generation = state.next_generation;
        let task = state.find_mut(id)?;
        let previous = task.completion();
        let next = previous.toggled(now);
        task.apply_completion(next);
        state.next_generation += 1;
        let track = state.toggles.entry(id).or_insert(ToggleTrack {
            generation,
            desired: next,
            latest_pending: true,
            in_flight: 0,
        });
        track.generation = generation;
        track.desired = next;
        track.latest_pending = true;
        track.in_flight += 1;
        Some(Self {
            id,
            previous,
            next,
            generation,
        })
    }

    fn release(&self, state: &mut EngineState) {
        if let Some(track) = state.toggles.get_mut(&self.id) {
            track.in_flight = track.in_flight.saturating_sub(1);
            if track.in_flight == 0 {
                state.toggles.remove(&self.id);
            }
        }
    }

    /// Records a confirmed write.
    ///
    /// The latest toggle re-applies its pair locally, since a reload may have
    /// replaced the record meanwhile. An older toggle that lands with a pair
    /// other than the desired one returns the desired pair, which must be
    /// written again; the command then stays in flight until
    /// [`Self::finish_resend`].
    fn confirm(&self, state: &mut EngineState) -> Option<Completion> {
        let track = state.toggles.get_mut(&self.id)?;
        if track.generation == self.generation {
            track.latest_pending = false;
            let desired = track.desired;
            state.show(self.id, desired);
            self.release(state);
            return None;
        }
        if track.desired != self.next {
            return Some(track.desired);
        }
        self.release(state);
        None
    }

    /// Records the outcome of writing `desired` after a stale confirmation.
    /// On failure the store still holds this command's pair, so the local
    /// record follows it unless a newer toggle has been issued since.
    fn finish_resend(&self, state: &mut EngineState, desired: Completion, written: bool) {
        let follow = !written
            && state
                .toggles
                .get(&self.id)
                .is_some_and(|track| track.desired == desired && !track.latest_pending);
        if follow {
            if let Some(track) = state.toggles.get_mut(&self.id) {
                track.desired = self.next;
            }
            state.show(self.id, self.next);
        }
        self.release(state);
    }

    /// Restores the captured completion when this toggle's pair is what the
    /// record shows and nothing newer is outstanding. Returns whether
    /// anything was restored.
    fn rollback(&self, state: &mut EngineState) -> bool {
        let Some(track) = state.toggles.get_mut(&self.id) else {
            return false;
        };
        let restore = if track.generation == self.generation {
            track.latest_pending = false;
            true
        } else {
            !track.latest_pending && track.desired == self.next
        };
        if restore {
            track.desired = self.previous;
        }
        self.release(state);
        let shown = state.find(self.id).is_some();
        if restore {
            state.show(self.id, self.previous);
        }
        restore && shown
    }
}

/// Owner of the local task collection for one signed-in session.
///
/// Create one per session and drop it at sign-out.
pub struct TaskStateEngine<S, P, C>
where
    S: RemoteTaskStore,
    P: SessionProvider,
    C: Clock + Send + Sync,
{
    adapter: TaskStoreAdapter<S, P, C>,
    clock: Arc<C>,
    state: RwLock<EngineState>,
}

impl<S, P, C> TaskStateEngine<S, P, C>
where
    S: RemoteTaskStore,
    P: SessionProvider,
    C: Clock + Send + Sync,
{
    /// Creates an engine with an empty collection in the loading state.
    #[must_use]
    pub fn new(store: Arc<S>, sessions: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            adapter: TaskStoreAdapter::new(store, sessions, Arc::clone(&clock)),
            clock,
            state: RwLock::new(EngineState::new()),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, EngineState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, EngineState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn record_failure(&self, operation: &'static str, err: TaskStoreError) -> TaskStoreError {
        warn!(operation, error = %err, "task operation failed");
        self.write().last_error = Some(err.clone());
        err
    }

    /// Loads the collection from the store, replacing the local copy.
    ///
    /// Clears the loading flag whatever the outcome. On failure the local
    /// collection is left as it was.
    ///
    /// # Errors
    ///
    /// Returns the adapter error, which is also recorded as the last error.
    pub async fn initialize(&self) -> TaskStoreResult<()> {
        self.write().loading = true;
        let result = self.adapter.list_all().await;
        self.write().loading = false;
        match result {
            Ok(tasks) => {
                debug!(count = tasks.len(), "task collection loaded");
                let mut state = self.write();
                state.tasks = tasks;
                state.last_error = None;
                Ok(())
            }
            Err(err) => Err(self.record_failure("initialize", err)),
        }
    }

    /// Creates a task and prepends it once the store confirms it.
    ///
    /// Blank text is ignored without contacting the store and yields
    /// `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns the adapter error, which is also recorded as the last error.
    /// The collection is unchanged on failure.
    pub async fn add_task(&self, text: &str) -> TaskStoreResult<Option<Task>> {
        let Ok(text) = TaskText::new(text) else {
            trace!("ignoring blank task text");
            return Ok(None);
        };
        match self.adapter.create(&text).await {
            Ok(task) => {
                let mut state = self.write();
                state.tasks.retain(|existing| existing.id() != task.id());
                state.tasks.insert(0, task.clone());
                state.last_error = None;
                Ok(Some(task))
            }
            Err(err) => Err(self.record_failure("add", err)),
        }
    }

    /// Flips completion of one task, showing the change before the store
    /// confirms it.
    ///
    /// Returns `Ok(None)` when no local task has the id. Overlapping toggles
    /// of one task resolve to the last one issued, locally and remotely: an
    /// older toggle confirmed after a newer one writes the newer pair again.
    /// On failure the task's prior completion is restored, unless a later
    /// toggle of the same task was issued in the meantime.
    ///
    /// # Errors
    ///
    /// Returns the adapter error, which is also recorded as the last error.
    pub async fn toggle_task(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        let now = self.clock.utc();
        let prepared = {
            let mut state = self.write();
            ToggleCommand::apply(&mut state, id, now)
        };
        let Some(command) = prepared else {
            trace!(task_id = %id, "toggle ignored for unknown task");
            return Ok(None);
        };

        if let Err(err) = self.adapter.apply_completion(id, command.next).await {
            let restored = command.rollback(&mut self.write());
            if restored {
                debug!(task_id = %id, "rolled back optimistic toggle");
            }
            return Err(self.record_failure("toggle", err));
        }

        let resend = command.confirm(&mut self.write());
        if let Some(desired) = resend {
            debug!(task_id = %id, "rewriting newer completion after stale toggle");
            let result = self.adapter.apply_completion(id, desired).await;
            command.finish_resend(&mut self.write(), desired, result.is_ok());
            if let Err(err) = result {
                return Err(self.record_failure("toggle", err));
            }
        }

        let mut state = self.write();
        state.last_error = None;
        Ok(state.find(id).cloned())
    }

    /// Deletes a task, removing it locally once the store confirms it.
    ///
    /// Returns the removed local record, if one was held.
    ///
    /// # Errors
    ///
    /// Returns the adapter error, which is also recorded as the last error.
    /// The collection is unchanged on failure.
    pub async fn remove_task(&self, id: TaskId) -> TaskStoreResult<Option<Task>> {
        match self.adapter.remove(id).await {
            Ok(()) => {
                let mut state = self.write();
                let removed = state
                    .tasks
                    .iter()
                    .position(|task| task.id() == id)
                    .map(|index| state.tasks.remove(index));
                state.toggles.remove(&id);
                state.last_error = None;
                Ok(removed)
            }
            Err(err) => Err(self.record_failure("remove", err)),
        }
    }

    /// Partitions the current collection against `now`.
    #[must_use]
    pub fn buckets<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> TaskBuckets {
        let buckets = TaskBuckets::partition(&self.read().tasks, now);
        if buckets.unbucketed > 0 {
            trace!(count = buckets.unbucketed, "tasks outside every bucket");
        }
        buckets
    }

    /// Partitions the current collection against the clock's local time.
    #[must_use]
    pub fn buckets_now(&self) -> TaskBuckets {
        self.buckets(&self.clock.local())
    }

    /// Returns a snapshot of the collection, newest first.
    #[must_use]
    pub fn tasks(&self) -> Vec<Task> {
        self.read().tasks.clone()
    }

    /// Returns the local record for `id`.
    #[must_use]
    pub fn task(&self, id: TaskId) -> Option<Task> {
        self.read().find(id).cloned()
    }

    /// Returns whether a load is pending.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.read().loading
    }

    /// Returns the most recent operation error, if the last operation failed.
    #[must_use]
    pub fn last_error(&self) -> Option<TaskStoreError> {
        self.read().last_error.clone()
    }

    /// Clears the recorded error.
    pub fn clear_error(&self) {
        self.write().last_error = None;
    }
}
