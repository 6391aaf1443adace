//! Testing utilities for hookline.
//!
//! This module provides utilities to make testing callbacks, wrappers and
//! detached dispatch easier.
//!
//! # Features
//!
//! - [`ManualScheduler`]: Queues detached tasks until the test runs them
//! - [`Gate`]: A latch a callback can block on until the test opens it
//! - [`RecordingSink`]: A diagnostic sink that keeps every message
//! - [`RecordingWrapper`]: A wrapper that records what it decorated
//! - [`CallCounter`]: Counts callback invocations

use crate::sink::{DiagnosticSink, error_chain};
use hookline_core::{CallbackError, CallbackMeta, CallbackWrapper, Invocation, Scheduler, Task};
use parking_lot::{Condvar, Mutex};
use std::{
    collections::VecDeque,
    fmt,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use tracing::Level;

// ============================================================================
// Manual Scheduler
// ============================================================================

/// A scheduler that queues tasks until they are run explicitly.
///
/// # Example
///
/// ```rust
/// use hookline_core::Scheduler;
/// use hookline_std::testing::ManualScheduler;
///
/// let scheduler = ManualScheduler::new();
/// scheduler.schedule(Box::new(|| {}));
/// assert_eq!(scheduler.pending(), 1);
/// assert_eq!(scheduler.run_pending(), 1);
/// ```
#[derive(Clone, Default)]
pub struct ManualScheduler {
    queue: Arc<Mutex<VecDeque<Task>>>,
}

impl ManualScheduler {
    /// Create an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of queued tasks.
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    /// Run the oldest queued task. Returns false when the queue was empty.
    pub fn run_next(&self) -> bool {
        // Released before running so tasks may schedule more work.
        let task = self.queue.lock().pop_front();
        match task {
            Some(task) => {
                task();
                true
            }
            None => false,
        }
    }

    /// Run tasks until the queue is empty, returning how many ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while self.run_next() {
            ran += 1;
        }
        ran
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, task: Task) {
        self.queue.lock().push_back(task);
    }
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("pending", &self.pending())
            .finish()
    }
}

// ============================================================================
// Gate
// ============================================================================

/// A one-way latch. Waiters block until [`Gate::open`] is called.
#[derive(Clone, Default)]
pub struct Gate {
    inner: Arc<(Mutex<bool>, Condvar)>,
}

impl Gate {
    /// Create a closed gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the gate, releasing all current and future waiters.
    pub fn open(&self) {
        let (open, cvar) = &*self.inner;
        *open.lock() = true;
        cvar.notify_all();
    }

    /// Whether the gate has been opened.
    pub fn is_open(&self) -> bool {
        *self.inner.0.lock()
    }

    /// Block until the gate opens.
    pub fn wait(&self) {
        let (open, cvar) = &*self.inner;
        let mut guard = open.lock();
        while !*guard {
            cvar.wait(&mut guard);
        }
    }

    /// Block until the gate opens or `timeout` elapses. Returns whether it opened.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let (open, cvar) = &*self.inner;
        let mut guard = open.lock();
        if !*guard {
            let _ = cvar.wait_while_for(&mut guard, |open| !*open, timeout);
        }
        *guard
    }
}

// ============================================================================
// Recording Sink
// ============================================================================

/// A diagnostic sink that records every message.
#[derive(Clone, Default)]
pub struct RecordingSink {
    records: Arc<Mutex<Vec<(Level, String)>>>,
}

impl RecordingSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded messages in emission order.
    pub fn records(&self) -> Vec<(Level, String)> {
        self.records.lock().clone()
    }

    /// Messages recorded at exactly `level`.
    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.records
            .lock()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    /// Clear all recorded messages.
    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl DiagnosticSink for RecordingSink {
    fn emit(&self, level: Level, message: fmt::Arguments<'_>) {
        self.records.lock().push((level, message.to_string()));
    }
}

// ============================================================================
// Recording Wrapper
// ============================================================================

/// What a [`RecordingWrapper`] observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WrapperEvent {
    /// A chain run was decorated.
    Chain {
        /// Hook name.
        hook: String,
        /// Callbacks in the chain.
        callback_count: usize,
    },
    /// A single callback invocation was decorated.
    Callback {
        /// Hook name.
        hook: String,
        /// Callback id.
        id: String,
    },
    /// A detached failure was reported.
    Detached {
        /// Hook name.
        hook: String,
        /// Callback id.
        id: String,
        /// Rendered error chain.
        error: String,
    },
}

/// A pass-through wrapper that records every decoration.
#[derive(Clone, Default)]
pub struct RecordingWrapper {
    events: Arc<Mutex<Vec<WrapperEvent>>>,
}

impl RecordingWrapper {
    /// Create a new recording wrapper.
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of the recorded events.
    pub fn events(&self) -> Vec<WrapperEvent> {
        self.events.lock().clone()
    }

    /// Recorded detached failures only.
    pub fn detached(&self) -> Vec<WrapperEvent> {
        self.events
            .lock()
            .iter()
            .filter(|e| matches!(e, WrapperEvent::Detached { .. }))
            .cloned()
            .collect()
    }

    /// Clear all recorded events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl CallbackWrapper for RecordingWrapper {
    fn wrap(
        &self,
        hook: &str,
        callback_count: usize,
        chain: Invocation<'_>,
    ) -> Result<(), CallbackError> {
        self.events.lock().push(WrapperEvent::Chain {
            hook: hook.to_string(),
            callback_count,
        });
        chain.proceed()
    }

    fn wrap_one(&self, meta: &CallbackMeta, call: Invocation<'_>) -> Result<(), CallbackError> {
        self.events.lock().push(WrapperEvent::Callback {
            hook: meta.hook.to_string(),
            id: meta.id.to_string(),
        });
        call.proceed()
    }

    fn report_detached(&self, meta: &CallbackMeta, error: &CallbackError) {
        self.events.lock().push(WrapperEvent::Detached {
            hook: meta.hook.to_string(),
            id: meta.id.to_string(),
            error: error_chain(error),
        });
    }
}

// ============================================================================
// Call Counter
// ============================================================================

/// Counts invocations of the callbacks it hands out.
///
/// # Example
///
/// ```rust
/// use hookline_std::testing::CallCounter;
///
/// let counter = CallCounter::new();
/// let callback = counter.callback::<u32, ()>();
/// callback(&1, &());
/// assert_eq!(counter.count(), 1);
/// ```
#[derive(Clone, Default)]
pub struct CallCounter {
    count: Arc<AtomicUsize>,
}

impl CallCounter {
    /// Create a new counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the current count.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Reset the counter.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
    }

    /// An observer callback that increments this counter.
    pub fn callback<I: 'static, C: 'static>(&self) -> impl Fn(&I, &C) + Send + Sync + 'static {
        let count = self.count.clone();
        move |_: &I, _: &C| {
            count.fetch_add(1, Ordering::SeqCst);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn manual_scheduler_runs_nested_tasks() {
        let scheduler = ManualScheduler::new();
        let counter = CallCounter::new();

        let inner = scheduler.clone();
        let callback = counter.callback::<(), ()>();
        scheduler.schedule(Box::new(move || {
            inner.schedule(Box::new(move || callback(&(), &())));
        }));

        assert_eq!(scheduler.run_pending(), 2);
        assert_eq!(counter.count(), 1);
        assert!(!scheduler.run_next());
    }

    #[test]
    fn gate_releases_waiters() {
        let gate = Gate::new();
        assert!(!gate.wait_timeout(Duration::from_millis(10)));

        let waiter = {
            let gate = gate.clone();
            thread::spawn(move || gate.wait())
        };
        gate.open();
        waiter.join().unwrap();
        assert!(gate.is_open());
        assert!(gate.wait_timeout(Duration::ZERO));
    }
}
