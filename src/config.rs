//! Explicit, injectable configuration for a [crate::TimeSeriesStore].
//!
//! Kept as a plain struct rather than a hidden global so that tests can run
//! many stores side by side with independent retention windows and data
//! directories.

use std::{path::PathBuf, time::Duration};

/// Default retention window: 24 hours, in milliseconds.
pub const DEFAULT_RETENTION_MS: i64 = 86_400_000;

/// Fixed durability log filename within `data_dir`.
pub const DEFAULT_LOG_FILE_NAME: &str = "data_store.log";

/// Configuration for a [crate::TimeSeriesStore].
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Directory holding the durability log. Defaults to the current
    /// working directory, matching a single-process-per-directory install.
    pub data_dir: PathBuf,

    /// Durability log filename, joined onto `data_dir`.
    pub log_file_name: String,

    /// Retention window `R`, in milliseconds. Samples older than
    /// `now - retention_ms` are candidates for eviction at the next sweep.
    pub retention_ms: i64,

    /// When set, [crate::TimeSeriesStore::initialize] additionally spawns a
    /// background thread that re-runs the retention sweep on this interval.
    /// `None` (the default) means retention only ever runs once, at
    /// `initialize` — the behavior the base specification describes.
    pub periodic_sweep: Option<Duration>,
}

impl Default for StoreConfig {
    fn default() -> StoreConfig {
        StoreConfig {
            data_dir: PathBuf::from("."),
            log_file_name: DEFAULT_LOG_FILE_NAME.to_string(),
            retention_ms: DEFAULT_RETENTION_MS,
            periodic_sweep: None,
        }
    }
}

impl StoreConfig {
    /// Start from defaults, rooted at `data_dir`.
    pub fn new(data_dir: impl Into<PathBuf>) -> StoreConfig {
        StoreConfig {
            data_dir: data_dir.into(),
            ..StoreConfig::default()
        }
    }

    pub fn set_retention_ms(mut self, retention_ms: i64) -> Self {
        self.retention_ms = retention_ms;
        self
    }

    pub fn set_periodic_sweep(mut self, interval: Duration) -> Self {
        self.periodic_sweep = Some(interval);
        self
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(&self.log_file_name)
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
