//! In-memory adapters for tests and local runs.

mod session;
mod store;

pub use session::InMemorySessionProvider;
pub use store::{InMemoryTaskStore, StoreOperation};
