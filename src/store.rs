//! [TimeSeriesStore]: the index coordinator tying together [crate::Column],
//! [crate::TagIndex], and [crate::DurabilityLog] under the single `RwLock`
//! discipline specified for this crate (§5): readers for `query`, writers
//! for `insert`, `initialize`, the retention sweep, and `shutdown`.

use std::{
    collections::{BTreeMap, HashMap},
    sync::{Arc, Mutex, RwLock},
    time::Duration,
};

use chrono::Utc;
use log::{debug, error, warn};

use crate::{
    bitmap::{self, TagIndex},
    column::Column,
    config::StoreConfig,
    dlog::DurabilityLog,
    err_at,
    sweep::SweepHandle,
    Error, Result, Sample,
};

/// Lifecycle state, per §4.4 of the store's state machine. `Uninitialized`
/// is the only state `initialize` may run from; `Failed` and `Terminated`
/// are both terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LifecycleState {
    Uninitialized,
    Running,
    Failed,
    Terminated,
}

/// Everything guarded by the single `RwLock`: the per-metric columns, the
/// per-metric bitmap indices, and the durability log writer. Grouped into
/// one struct so a single lock covers all three, preserving the "bit `i`
/// corresponds to column position `i`" invariant across append + index
/// update + log write.
#[derive(Default)]
struct Inner {
    columns: HashMap<String, Column>,
    bitmaps: HashMap<String, TagIndex>,
    log: Option<DurabilityLog>,
}

/// An in-process time-series store: per-metric time-ordered columns, an
/// inverted tag bitmap index per metric, and a durable append log.
///
/// Construct with [TimeSeriesStore::new], call [TimeSeriesStore::initialize]
/// exactly once before any `insert`/`query`, and [TimeSeriesStore::shutdown]
/// exactly once when done.
pub struct TimeSeriesStore {
    config: StoreConfig,
    state: Mutex<LifecycleState>,
    inner: Arc<RwLock<Inner>>,
    sweep_handle: Mutex<Option<SweepHandle>>,
}

impl TimeSeriesStore {
    pub fn new(config: StoreConfig) -> TimeSeriesStore {
        TimeSeriesStore {
            config,
            state: Mutex::new(LifecycleState::Uninitialized),
            inner: Arc::new(RwLock::new(Inner::default())),
            sweep_handle: Mutex::new(None),
        }
    }

    /// Open the durability log, replay it into the in-memory index, run one
    /// retention sweep, then leave the log open for append.
    ///
    /// Must be called exactly once, from `Uninitialized`. On I/O or replay
    /// failure the store transitions to `Failed` and every subsequent
    /// operation returns `Error::InvalidState`.
    pub fn initialize(&self) -> Result<()> {
        {
            let mut state = self.lock_state()?;
            if *state != LifecycleState::Uninitialized {
                return err_at!(InvalidState, msg: "initialize called from {:?}", *state);
            }
            *state = LifecycleState::Running;
        }

        match self.do_initialize() {
            Ok(()) => {
                if let Some(interval) = self.config.periodic_sweep {
                    self.start_periodic_sweep(interval);
                }
                Ok(())
            }
            Err(err) => {
                error!(target: "tsindex::store", "initialize failed: {}", err);
                *self.lock_state()? = LifecycleState::Failed;
                Err(err)
            }
        }
    }

    fn do_initialize(&self) -> Result<()> {
        let log_path = self.config.log_path();
        let replayed = DurabilityLog::replay(&log_path)?;
        debug!(target: "tsindex::store", "replayed {} records from {:?}", replayed.len(), log_path);

        let mut inner = self.lock_write()?;
        for sample in replayed {
            insert_in_place(&mut inner, sample);
        }
        run_sweep(&mut inner, self.config.retention_ms);

        let log = DurabilityLog::open(&log_path)?;
        inner.log = Some(log);
        Ok(())
    }

    /// Spawn the opt-in periodic sweep thread. Holds its own `Arc` clone of
    /// `inner` so it can keep running safely even if it outlives a single
    /// call stack frame; `shutdown`/`Drop` always stop and join it before
    /// the store itself goes away.
    fn start_periodic_sweep(&self, interval: Duration) {
        let inner = Arc::clone(&self.inner);
        let retention_ms = self.config.retention_ms;
        let handle = SweepHandle::spawn(interval, move || match inner.write() {
            Ok(mut guard) => run_sweep(&mut guard, retention_ms),
            Err(_) => warn!(target: "tsindex::store", "periodic sweep skipped: lock poisoned"),
        });
        *self.sweep_handle.lock().unwrap_or_else(|p| p.into_inner()) = Some(handle);
    }

    /// Append `sample` to its metric's column, set its tags' bits, and
    /// durably log it.
    ///
    /// Precondition: `timestamp` should be non-decreasing relative to prior
    /// inserts for the same metric. The column is never reordered — a
    /// violation silently degrades later binary searches rather than being
    /// rejected (see this crate's design notes on out-of-order inserts).
    ///
    /// On log-write failure the in-memory append and bitmap update are
    /// already visible to subsequent queries; this matches the documented
    /// no-rollback policy.
    pub fn insert(&self, sample: Sample) -> Result<()> {
        self.require_running()?;
        if sample.metric.is_empty() {
            return err_at!(InvalidInput, msg: "empty metric name");
        }

        let mut inner = self.lock_write()?;
        insert_in_place(&mut inner, sample.clone());

        let result = match inner.log.as_mut() {
            Some(log) => log.append(&sample),
            None => err_at!(InvalidState, msg: "log not open"),
        };
        if let Err(ref err) = result {
            error!(target: "tsindex::store", "log append failed: {}", err);
        }
        result
    }

    /// Half-open range query `[t_start, t_end)` over `metric`, narrowed by
    /// an optional conjunction of exact-match tag filters.
    ///
    /// An empty range (`t_end <= t_start`), an unknown metric, or a filter
    /// whose key/value was never seen all yield an empty result, not an
    /// error.
    pub fn query(
        &self,
        metric: &str,
        t_start: i64,
        t_end: i64,
        filters: &BTreeMap<String, String>,
    ) -> Result<Vec<Sample>> {
        self.require_running()?;
        if t_end <= t_start {
            return Ok(Vec::new());
        }

        let inner = self.lock_read()?;
        let column = match inner.columns.get(metric) {
            Some(column) => column,
            None => return Ok(Vec::new()),
        };

        let lo = column.lower_bound(t_start);
        let hi = column.lower_bound(t_end);
        if lo >= hi {
            return Ok(Vec::new());
        }

        if filters.is_empty() {
            return Ok(column.as_slice()[lo..hi].to_vec());
        }

        let tag_index = match inner.bitmaps.get(metric) {
            Some(tag_index) => tag_index,
            None => return Ok(Vec::new()),
        };
        let bitsets = filters
            .iter()
            .map(|(k, v)| tag_index.bitset(k, v))
            .collect::<Vec<_>>();
        let combined = match bitmap::intersect(bitsets) {
            Some(combined) => combined,
            None => return Ok(Vec::new()),
        };

        Ok(bitmap::set_bits_in_range(&combined, lo, hi)
            .into_iter()
            .filter_map(|pos| column.get(pos).cloned())
            .collect())
    }

    /// Stop any periodic sweep thread and close the durability log.
    ///
    /// After this, every operation on this instance returns
    /// `Error::InvalidState`.
    pub fn shutdown(&self) -> Result<()> {
        {
            let state = self.lock_state()?;
            if *state != LifecycleState::Running {
                return err_at!(InvalidState, msg: "shutdown called from {:?}", *state);
            }
        }

        if let Some(mut handle) = self
            .sweep_handle
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .take()
        {
            handle.stop();
        }

        let result = {
            let mut inner = self.lock_write()?;
            match inner.log.as_mut() {
                Some(log) => log.close(),
                None => Ok(()),
            }
        };
        if let Err(ref err) = result {
            error!(target: "tsindex::store", "shutdown failed: {}", err);
        }
        *self.lock_state()? = LifecycleState::Terminated;
        result
    }

    /// Total number of retained samples across every metric. Read-only
    /// convenience for the CLI demo; not part of the core state machine.
    pub fn len(&self) -> Result<usize> {
        let inner = self.lock_read()?;
        Ok(inner.columns.values().map(Column::len).sum())
    }

    /// Known metric names. Read-only convenience for the CLI demo.
    pub fn metrics(&self) -> Result<Vec<String>> {
        let inner = self.lock_read()?;
        Ok(inner.columns.keys().cloned().collect())
    }

    fn require_running(&self) -> Result<()> {
        if *self.lock_state()? != LifecycleState::Running {
            return err_at!(InvalidState, msg: "store is not running");
        }
        Ok(())
    }

    fn lock_state(&self) -> Result<std::sync::MutexGuard<'_, LifecycleState>> {
        self.state
            .lock()
            .map_err(|_| Error::PoisonedLock(format!("{}:{} state mutex poisoned", file!(), line!())))
    }

    fn lock_read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|_| Error::PoisonedLock(format!("{}:{} index lock poisoned", file!(), line!())))
    }

    fn lock_write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|_| Error::PoisonedLock(format!("{}:{} index lock poisoned", file!(), line!())))
    }
}

impl Drop for TimeSeriesStore {
    fn drop(&mut self) {
        if let Some(mut handle) = self
            .sweep_handle
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .take()
        {
            handle.stop();
        }
    }
}

/// Append `sample` into `inner`'s column and bitmap index for its metric,
/// without touching the log. Shared by `insert` and log replay.
fn insert_in_place(inner: &mut Inner, sample: Sample) {
    let metric = sample.metric.clone();
    let tags = sample.tags.clone();

    let column = inner.columns.entry(metric.clone()).or_default();
    let pos = column.len();
    column.push(sample);

    inner.bitmaps.entry(metric).or_default().set(pos, &tags);
}

fn run_sweep(inner: &mut Inner, retention_ms: i64) {
    let cutoff = Utc::now().timestamp_millis() - retention_ms;
    for (metric, column) in inner.columns.iter_mut() {
        let cutoff_pos = column.lower_bound(cutoff);
        if cutoff_pos == 0 {
            continue;
        }
        let dropped = column.evict_before(cutoff_pos);
        debug!(target: "tsindex::store", "sweep: evicted {} samples from {}", dropped, metric);
        if let Some(tag_index) = inner.bitmaps.get_mut(metric) {
            tag_index.rebuild(column.as_slice());
        }
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;
