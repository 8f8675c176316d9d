//! Runtime configuration.
//!
//! Defaults suit a local run. [`Config::from_env`] overlays:
//!
//! | Variable | Field | Default |
//! |---|---|---|
//! | `BOOKSTORE_SNAPSHOT_PATH` | `snapshot_path` | `database.json` |
//! | `BOOKSTORE_COMMIT_TIMEOUT_MS` | `commit_timeout` | 10 s |
//! | `BOOKSTORE_READ_TIMEOUT_MS` | `read_timeout` | 5 s |
//! | `BOOKSTORE_WRITE_TIMEOUT_MS` | `write_timeout` | 5 s |
//!
//! Log verbosity is controlled separately through `RUST_LOG`.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const SNAPSHOT_PATH_VAR: &str = "BOOKSTORE_SNAPSHOT_PATH";
pub const COMMIT_TIMEOUT_VAR: &str = "BOOKSTORE_COMMIT_TIMEOUT_MS";
pub const READ_TIMEOUT_VAR: &str = "BOOKSTORE_READ_TIMEOUT_MS";
pub const WRITE_TIMEOUT_VAR: &str = "BOOKSTORE_WRITE_TIMEOUT_MS";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} must be a whole number of milliseconds, got {value:?}")]
    InvalidDuration { var: &'static str, value: String },

    #[error("{0} must not be empty")]
    Empty(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Snapshot artifact loaded at start and written at shutdown.
    pub snapshot_path: PathBuf,
    /// Deadline for order creation, validation included.
    pub commit_timeout: Duration,
    /// Deadline for order reads and listings.
    pub read_timeout: Duration,
    /// Deadline for order updates and deletes.
    pub write_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot_path: PathBuf::from("database.json"),
            commit_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(5),
            write_timeout: Duration::from_secs(5),
        }
    }
}

impl Config {
    /// Defaults overlaid with the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overlaid with whatever `lookup` returns for each variable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(path) = lookup(SNAPSHOT_PATH_VAR) {
            if path.trim().is_empty() {
                return Err(ConfigError::Empty(SNAPSHOT_PATH_VAR));
            }
            config.snapshot_path = PathBuf::from(path);
        }
        for (var, slot) in [
            (COMMIT_TIMEOUT_VAR, &mut config.commit_timeout),
            (READ_TIMEOUT_VAR, &mut config.read_timeout),
            (WRITE_TIMEOUT_VAR, &mut config.write_timeout),
        ] {
            if let Some(value) = lookup(var) {
                *slot = parse_millis(var, &value)?;
            }
        }
        Ok(config)
    }
}

fn parse_millis(var: &'static str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::InvalidDuration {
            var,
            value: value.to_string(),
        })
}
