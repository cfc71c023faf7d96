//! `PostgreSQL` adapter for the remote task collection.

mod models;
mod schema;
mod store;

pub use store::{PostgresTaskStore, TaskPgPool, build_pool};
