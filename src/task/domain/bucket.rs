//! Date-derived display buckets.
//!
//! Buckets are a projection of the raw task fields against a reference
//! instant and are never stored. Day equality is evaluated on the calendar
//! date in the reference instant's time zone, not on a rolling 24-hour window.

use super::Task;
use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;

/// Display grouping of a task relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    /// Open task created today.
    TodayOpen,
    /// Task completed today.
    TodayCompleted,
    /// Task completed on an earlier day.
    PastCompleted,
}

impl Bucket {
    /// All buckets in display order.
    pub const ALL: [Self; 3] = [Self::TodayOpen, Self::TodayCompleted, Self::PastCompleted];

    /// Classifies a task against the reference instant.
    ///
    /// Returns `None` for open tasks created on an earlier day and for
    /// completed tasks without a completion timestamp.
    #[must_use]
    pub fn classify<Tz: TimeZone>(task: &Task, now: &DateTime<Tz>) -> Option<Self> {
        if !task.is_completed() {
            return same_local_day(task.created_at(), now).then_some(Self::TodayOpen);
        }
        let completed_at = task.completed_at()?;
        if same_local_day(completed_at, now) {
            Some(Self::TodayCompleted)
        } else {
            Some(Self::PastCompleted)
        }
    }

    /// Human-readable heading.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::TodayOpen => "Today",
            Self::TodayCompleted => "Completed today",
            Self::PastCompleted => "Completed earlier",
        }
    }
}

/// Returns whether `instant` falls on the same calendar date as `now` in
/// `now`'s time zone.
#[must_use]
pub fn same_local_day<Tz: TimeZone>(instant: DateTime<Utc>, now: &DateTime<Tz>) -> bool {
    instant.with_timezone(&now.timezone()).date_naive() == now.date_naive()
}

/// Tasks partitioned into buckets, each preserving collection order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskBuckets {
    /// Open tasks created today.
    pub today_open: Vec<Task>,
    /// Tasks completed today.
    pub today_completed: Vec<Task>,
    /// Tasks completed on an earlier day.
    pub past_completed: Vec<Task>,
    /// Number of tasks that fell in no bucket.
    pub unbucketed: usize,
}

impl TaskBuckets {
    /// Partitions tasks against the reference instant.
    #[must_use]
    pub fn partition<'a, Tz, I>(tasks: I, now: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        I: IntoIterator<Item = &'a Task>,
    {
        let mut buckets = Self::default();
        for task in tasks {
            match Bucket::classify(task, now) {
                Some(Bucket::TodayOpen) => buckets.today_open.push(task.clone()),
                Some(Bucket::TodayCompleted) => buckets.today_completed.push(task.clone()),
                Some(Bucket::PastCompleted) => buckets.past_completed.push(task.clone()),
                None => buckets.unbucketed += 1,
            }
        }
        buckets
    }

    /// Returns the tasks in one bucket.
    #[must_use]
    pub fn bucket(&self, bucket: Bucket) -> &[Task] {
        match bucket {
            Bucket::TodayOpen => &self.today_open,
            Bucket::TodayCompleted => &self.today_completed,
            Bucket::PastCompleted => &self.past_completed,
        }
    }

    /// Number of bucketed tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.today_open.len() + self.today_completed.len() + self.past_completed.len()
    }

    /// Returns whether no task landed in any bucket.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
