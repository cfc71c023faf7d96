//! Runtime configuration.
//!
//! Settings are layered from built-in defaults, an optional TOML file, and
//! `DAYLIST_*` environment variables, in increasing precedence:
//!
//! | Key             | Environment variable     | Default  |
//! |-----------------|--------------------------|----------|
//! | `database_url`  | `DAYLIST_DATABASE_URL`   | none     |
//! | `pool_max_size` | `DAYLIST_POOL_MAX_SIZE`  | `4`      |
//! | `user_id`       | `DAYLIST_USER_ID`        | none     |
//! | `log_filter`    | `DAYLIST_LOG_FILTER`     | `info`   |

use ::config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use uuid::Uuid;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "DAYLIST";

/// Default connection pool size.
pub const DEFAULT_POOL_MAX_SIZE: u32 = 4;

/// Default `tracing` filter directive.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum TrackerConfigError {
    /// A source could not be read or deserialised.
    #[error("invalid configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    /// No database URL was configured.
    #[error("database_url is not configured; set DAYLIST_DATABASE_URL")]
    MissingDatabaseUrl,

    /// The pool size is zero.
    #[error("pool_max_size must be at least 1")]
    InvalidPoolSize,
}

/// Settings for the task tracker.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TrackerConfig {
    /// `PostgreSQL` connection string for the remote task store.
    pub database_url: Option<String>,
    /// Maximum pooled connections.
    pub pool_max_size: u32,
    /// User to sign in as; commands fail as unauthorised when unset.
    pub user_id: Option<Uuid>,
    /// `tracing` filter directive.
    pub log_filter: String,
}

impl TrackerConfig {
    /// Loads configuration from defaults, `file` (if given and present) and
    /// the environment.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerConfigError`] when a source is malformed or a value
    /// is out of range.
    pub fn load(file: Option<&Path>) -> Result<Self, TrackerConfigError> {
        let mut builder = Config::builder()
            .set_default("pool_max_size", i64::from(DEFAULT_POOL_MAX_SIZE))?
            .set_default("log_filter", DEFAULT_LOG_FILTER)?;
        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(false));
        }
        let loaded: Self = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?
            .try_deserialize()?;
        loaded.validate()
    }

    fn validate(self) -> Result<Self, TrackerConfigError> {
        if self.pool_max_size == 0 {
            return Err(TrackerConfigError::InvalidPoolSize);
        }
        Ok(self)
    }

    /// Returns the configured database URL.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerConfigError::MissingDatabaseUrl`] when unset or blank.
    pub fn require_database_url(&self) -> Result<&str, TrackerConfigError> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .ok_or(TrackerConfigError::MissingDatabaseUrl)
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            pool_max_size: DEFAULT_POOL_MAX_SIZE,
            user_id: None,
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
        }
    }
}
