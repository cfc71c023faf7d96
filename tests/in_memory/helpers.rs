//! Shared fixtures for in-memory integration tests.

use crate::test_helpers::{ManualClock, utc_at};
use daylist::task::{
    adapters::memory::{InMemorySessionProvider, InMemoryTaskStore},
    domain::{Task, UserId},
    services::TaskStateEngine,
};
use rstest::fixture;
use std::sync::Arc;

/// Store type shared by the in-memory suites.
pub type TestStore = InMemoryTaskStore<ManualClock>;

/// Engine type shared by the in-memory suites.
pub type TestEngine = TaskStateEngine<TestStore, InMemorySessionProvider, ManualClock>;

/// One signed-in user's view of a store.
pub struct Tracker {
    pub engine: TestEngine,
    pub store: Arc<TestStore>,
    pub sessions: Arc<InMemorySessionProvider>,
    pub clock: Arc<ManualClock>,
    pub owner: UserId,
}

impl Tracker {
    fn open(store: Arc<TestStore>, clock: Arc<ManualClock>) -> Self {
        let owner = UserId::new();
        let sessions = Arc::new(InMemorySessionProvider::signed_in(owner));
        let engine = TaskStateEngine::new(Arc::clone(&store), Arc::clone(&sessions), Arc::clone(&clock));
        Self {
            engine,
            store,
            sessions,
            clock,
            owner,
        }
    }

    /// Opens a tracker for another user on the same store and clock.
    pub fn second_user(&self) -> Self {
        Self::open(Arc::clone(&self.store), Arc::clone(&self.clock))
    }

    /// Moves the clock to a `YYYY-MM-DD HH:MM` UTC instant.
    ///
    /// # Errors
    ///
    /// Returns an error when `timestamp` is malformed.
    pub fn advance_to(&self, timestamp: &str) -> eyre::Result<()> {
        self.clock.set(utc_at(timestamp)?);
        Ok(())
    }
}

/// Returns the texts of `tasks` in order.
pub fn texts(tasks: &[Task]) -> Vec<&str> {
    tasks.iter().map(|task| task.text().as_str()).collect()
}

/// Tracker for a fresh user on an empty store, with the clock at
/// 2026-03-10 09:00 UTC.
#[fixture]
pub fn tracker() -> Tracker {
    let start = utc_at("2026-03-10 09:00").expect("valid start timestamp");
    let clock = Arc::new(ManualClock::at(start));
    let store = Arc::new(InMemoryTaskStore::with_clock(Arc::clone(&clock)));
    Tracker::open(store, clock)
}
