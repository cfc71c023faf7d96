//! Domain model for the task tracker.
//!
//! Tasks are short text records owned by a signed-in user. Display buckets
//! are derived from task timestamps on every read and never stored.

pub mod bucket;
mod error;
mod ids;
mod session;
mod task;
mod text;

pub use bucket::{Bucket, TaskBuckets, same_local_day};
pub use error::TaskDomainError;
pub use ids::{TaskId, UserId};
pub use session::Session;
pub use task::{Completion, PersistedTaskData, Task};
pub use text::TaskText;
