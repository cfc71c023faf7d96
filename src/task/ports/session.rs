//! Session boundary port.

use crate::task::domain::Session;

/// Supplies the authenticated identity context, if any.
///
/// Acquiring and storing credentials is the provider's concern; task services
/// only check for presence.
pub trait SessionProvider: Send + Sync {
    /// Returns the current session, or `None` when nobody is signed in.
    fn current_session(&self) -> Option<Session>;
}
