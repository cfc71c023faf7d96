//! Port contracts for the task tracker.
//!
//! Ports define infrastructure-agnostic interfaces used by task services.

pub mod session;
pub mod store;

pub use session::SessionProvider;
pub use store::{RemoteStoreError, RemoteStoreResult, RemoteTaskStore};
