//! Authenticated identity context supplied by the session boundary.

use super::UserId;

/// A signed-in session. Remote task operations require one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    user_id: UserId,
}

impl Session {
    /// Creates a session for the given user.
    #[must_use]
    pub const fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    /// Returns the signed-in user.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }
}
