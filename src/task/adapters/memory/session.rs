//! In-memory session provider.

use crate::task::{
    domain::{Session, UserId},
    ports::SessionProvider,
};
use std::sync::{Arc, PoisonError, RwLock};

/// Holds at most one signed-in session.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionProvider {
    session: Arc<RwLock<Option<Session>>>,
}

impl InMemorySessionProvider {
    /// Creates a provider with nobody signed in.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a provider already signed in as `user_id`.
    #[must_use]
    pub fn signed_in(user_id: UserId) -> Self {
        let provider = Self::new();
        provider.sign_in(Session::new(user_id));
        provider
    }

    /// Replaces the current session.
    pub fn sign_in(&self, session: Session) {
        *self
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(session);
    }

    /// Clears the current session.
    pub fn sign_out(&self) {
        *self
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl SessionProvider for InMemorySessionProvider {
    fn current_session(&self) -> Option<Session> {
        *self.session.read().unwrap_or_else(PoisonError::into_inner)
    }
}
