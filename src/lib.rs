//! `tsindex` is an in-process time-series store: ingest timestamped,
//! tagged numeric samples and answer range-plus-tag-filter queries against
//! them without leaving the process.
//!
//! Each metric owns an append-only, time-ordered [Column] and an inverted
//! [bitmap::TagIndex] over its tag key/value pairs. A [dlog::DurabilityLog]
//! makes every acknowledged `insert` survive a restart; [store::TimeSeriesStore]
//! is the coordinator that ties the three together under one reader-writer
//! lock and owns the `initialize` / `insert` / `query` / `shutdown`
//! lifecycle.
//!
//! ```no_run
//! use std::collections::BTreeMap;
//! use tsindex::{Sample, StoreConfig, TimeSeriesStore};
//!
//! let store = TimeSeriesStore::new(StoreConfig::new("./data"));
//! store.initialize().unwrap();
//! store.insert(Sample::new(1_700_000_000_000, "cpu", 45.2, BTreeMap::new())).unwrap();
//! let rows = store.query("cpu", 1_700_000_000_000, 1_700_000_000_001, &BTreeMap::new()).unwrap();
//! assert_eq!(rows.len(), 1);
//! store.shutdown().unwrap();
//! ```

mod bitmap;
mod column;
mod config;
mod dlog;
mod error;
mod sample;
mod store;
mod sweep;

pub use crate::bitmap::TagIndex;
pub use crate::column::Column;
pub use crate::config::{StoreConfig, DEFAULT_LOG_FILE_NAME, DEFAULT_RETENTION_MS};
pub use crate::dlog::DurabilityLog;
pub use crate::error::{Error, Result};
pub use crate::sample::Sample;
pub use crate::store::TimeSeriesStore;
pub use crate::sweep::SweepHandle;
