//! Statistics wrapper.
//!
//! Decorates another wrapper and accumulates counters and durations per
//! hook and per callback. Keep an `Arc` to the wrapper to read a
//! [`StatsSnapshot`] while it is installed in a registry.

use super::DefaultWrapper;
use hookline_core::{CallbackError, CallbackMeta, CallbackWrapper, Invocation};
use parking_lot::Mutex;
use std::{
    collections::{BTreeMap, HashMap},
    time::{Duration, Instant},
};

/// Aggregates for one hook's chained runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookStats {
    /// Number of chain runs.
    pub runs: u64,
    /// Chain runs that returned an error.
    pub failures: u64,
    /// Accumulated wall-clock time.
    pub total: Duration,
    /// Callback count seen on the latest run.
    pub callback_count: usize,
}

/// Aggregates for one callback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackStats {
    /// Number of invocations, chained and detached.
    pub calls: u64,
    /// Invocations that failed or panicked.
    pub failures: u64,
    /// Accumulated wall-clock time.
    pub total: Duration,
}

/// A point-in-time copy of the collected statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Per-hook chain statistics, keyed by hook name.
    pub hooks: BTreeMap<String, HookStats>,
    /// Per-callback statistics, keyed by `(hook, id)`.
    pub callbacks: BTreeMap<(String, String), CallbackStats>,
}

impl StatsSnapshot {
    /// Statistics for one callback.
    pub fn callback(&self, hook: &str, id: &str) -> Option<&CallbackStats> {
        self.callbacks.get(&(hook.to_string(), id.to_string()))
    }
}

#[derive(Default)]
struct Tables {
    hooks: HashMap<String, HookStats>,
    callbacks: HashMap<(String, String), CallbackStats>,
}

/// A wrapper collecting statistics around an inner wrapper.
///
/// # Example
///
/// ```rust
/// use hookline_std::wrappers::{StatsWrapper, TimedWrapper};
/// use std::sync::Arc;
///
/// let stats = Arc::new(StatsWrapper::new(TimedWrapper::new()));
/// // install `stats.clone()` in a registry, then later:
/// let snapshot = stats.snapshot();
/// assert!(snapshot.hooks.is_empty());
/// ```
pub struct StatsWrapper<W = DefaultWrapper> {
    inner: W,
    tables: Mutex<Tables>,
}

impl Default for StatsWrapper {
    fn default() -> Self {
        Self::new(DefaultWrapper)
    }
}

impl<W: CallbackWrapper> StatsWrapper<W> {
    /// Wrap `inner`.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            tables: Mutex::new(Tables::default()),
        }
    }

    /// Copy the current statistics.
    pub fn snapshot(&self) -> StatsSnapshot {
        let tables = self.tables.lock();
        StatsSnapshot {
            hooks: tables
                .hooks
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            callbacks: tables
                .callbacks
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    /// Drop all collected statistics.
    pub fn reset(&self) {
        *self.tables.lock() = Tables::default();
    }

    fn record_callback(&self, meta: &CallbackMeta, elapsed: Duration, failed: bool) {
        let mut tables = self.tables.lock();
        let entry = tables
            .callbacks
            .entry((meta.hook.to_string(), meta.id.to_string()))
            .or_default();
        entry.calls += 1;
        entry.total += elapsed;
        if failed {
            entry.failures += 1;
        }
    }
}

impl<W: CallbackWrapper> CallbackWrapper for StatsWrapper<W> {
    fn wrap(
        &self,
        hook: &str,
        callback_count: usize,
        chain: Invocation<'_>,
    ) -> Result<(), CallbackError> {
        let start = Instant::now();
        let result = self.inner.wrap(hook, callback_count, chain);
        let elapsed = start.elapsed();

        let mut tables = self.tables.lock();
        let entry = tables.hooks.entry(hook.to_string()).or_default();
        entry.runs += 1;
        entry.total += elapsed;
        entry.callback_count = callback_count;
        if result.is_err() {
            entry.failures += 1;
        }
        result
    }

    fn wrap_one(&self, meta: &CallbackMeta, call: Invocation<'_>) -> Result<(), CallbackError> {
        let start = Instant::now();
        let result = self.inner.wrap_one(meta, call);
        self.record_callback(meta, start.elapsed(), result.is_err());
        result
    }

    fn report_detached(&self, meta: &CallbackMeta, error: &CallbackError) {
        // Returned errors were already counted by `wrap_one`; panics unwind past it.
        if matches!(error, CallbackError::Panicked { .. }) {
            self.record_callback(meta, Duration::ZERO, true);
        }
        self.inner.report_detached(meta, error);
    }
}
