//! Shared helpers for integration tests.

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use std::env;
use std::ffi::OsString;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError, RwLock};

static ENV_MUTEX: OnceLock<Mutex<()>> = OnceLock::new();

/// Scoped set of environment variable overrides.
///
/// Holds a process-wide lock for its lifetime and restores every touched
/// variable on drop.
pub struct ScopedEnv {
    previous: Vec<(OsString, Option<OsString>)>,
    _lock: MutexGuard<'static, ()>,
}

impl ScopedEnv {
    /// Acquires the environment lock without changing anything.
    pub fn lock() -> Self {
        Self {
            previous: Vec::new(),
            _lock: ENV_MUTEX
                .get_or_init(|| Mutex::new(()))
                .lock()
                .unwrap_or_else(PoisonError::into_inner),
        }
    }

    /// Sets `key` to `value` until the guard drops.
    pub fn set(mut self, key: &str, value: &str) -> Self {
        self.remember(key);
        unsafe {
            // SAFETY: ENV_MUTEX serialises environment mutation in tests.
            env::set_var(key, value);
        }
        self
    }

    /// Removes `key` until the guard drops.
    pub fn unset(mut self, key: &str) -> Self {
        self.remember(key);
        unsafe {
            // SAFETY: ENV_MUTEX serialises environment mutation in tests.
            env::remove_var(key);
        }
        self
    }

    fn remember(&mut self, key: &str) {
        if !self.previous.iter().any(|(seen, _)| seen == key) {
            self.previous.push((key.into(), env::var_os(key)));
        }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (key, value) in self.previous.drain(..) {
            unsafe {
                // SAFETY: ENV_MUTEX serialises environment mutation in tests.
                match value {
                    Some(previous) => env::set_var(&key, previous),
                    None => env::remove_var(&key),
                }
            }
        }
    }
}

/// Clock that returns a settable instant.
///
/// Mirrors the unit-test clock in `src/task/tests/support.rs`; integration
/// tests cannot reach `cfg(test)` items of the library.
#[derive(Debug)]
pub struct ManualClock {
    now: RwLock<DateTime<Utc>>,
}

impl ManualClock {
    /// Creates a clock stopped at `now`.
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    /// Moves the clock to `now`.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.write().unwrap_or_else(PoisonError::into_inner) = now;
    }
}

impl Clock for ManualClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.read().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Parses a `YYYY-MM-DD HH:MM` UTC timestamp.
///
/// # Errors
///
/// Returns an error when `text` is not in that format.
pub fn utc_at(text: &str) -> eyre::Result<DateTime<Utc>> {
    let naive = chrono::NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M")
        .map_err(|err| eyre::eyre!("invalid timestamp {text:?}: {err}"))?;
    Ok(Utc.from_utc_datetime(&naive))
}
