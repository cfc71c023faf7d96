//! Application services for the task tracker.

mod adapter;
mod engine;

pub use adapter::{TaskStoreAdapter, TaskStoreError, TaskStoreResult};
pub use engine::TaskStateEngine;
