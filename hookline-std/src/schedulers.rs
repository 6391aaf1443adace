//! Deferred schedulers for detached dispatch.
//!
//! - [`ThreadScheduler`]: a fresh named OS thread per task
//! - [`PoolScheduler`]: a `futures` thread pool, the registry default
//! - [`TokioScheduler`]: the blocking pool of a tokio runtime (feature `tokio`)

use futures::executor::ThreadPool;
use hookline_core::{Scheduler, Task};
use std::{io, sync::OnceLock, thread};

/// Spawns one OS thread per task.
///
/// Thread count grows with hook fan-out times call rate, so prefer
/// [`PoolScheduler`] unless every detached callback may block indefinitely.
#[derive(Debug, Clone)]
pub struct ThreadScheduler {
    name: String,
}

impl ThreadScheduler {
    /// Create a scheduler naming its threads `hookline-deferred`.
    pub fn new() -> Self {
        Self::named("hookline-deferred")
    }

    /// Create a scheduler with a custom thread name.
    pub fn named(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for ThreadScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler for ThreadScheduler {
    fn schedule(&self, task: Task) {
        let spawned = thread::Builder::new().name(self.name.clone()).spawn(task);
        if let Err(err) = spawned {
            tracing::error!(
                target: "hookline",
                error = %err,
                "failed to spawn deferred callback thread"
            );
        }
    }
}

/// Runs tasks on a `futures` thread pool.
#[derive(Clone)]
pub struct PoolScheduler {
    pool: ThreadPool,
}

impl PoolScheduler {
    /// Create a pool with one thread per CPU.
    pub fn new() -> io::Result<Self> {
        Ok(Self {
            pool: ThreadPool::builder().name_prefix("hookline-pool-").create()?,
        })
    }

    /// Create a pool with a fixed number of threads.
    pub fn with_threads(threads: usize) -> io::Result<Self> {
        Ok(Self {
            pool: ThreadPool::builder()
                .pool_size(threads)
                .name_prefix("hookline-pool-")
                .create()?,
        })
    }

    /// The process-wide pool, created on first use with one thread per CPU.
    ///
    /// Returns `None` when the pool cannot be created.
    pub fn shared() -> Option<Self> {
        static SHARED: OnceLock<Option<ThreadPool>> = OnceLock::new();
        SHARED
            .get_or_init(|| match Self::new() {
                Ok(scheduler) => Some(scheduler.pool),
                Err(err) => {
                    tracing::warn!(
                        target: "hookline",
                        error = %err,
                        "failed to create shared callback pool"
                    );
                    None
                }
            })
            .clone()
            .map(Self::from_pool)
    }

    /// Use an existing pool.
    pub fn from_pool(pool: ThreadPool) -> Self {
        Self { pool }
    }
}

impl Scheduler for PoolScheduler {
    fn schedule(&self, task: Task) {
        self.pool.spawn_ok(async move { task() });
    }
}

/// Runs tasks on the blocking pool of a tokio runtime.
#[cfg(feature = "tokio")]
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    handle: tokio::runtime::Handle,
}

#[cfg(feature = "tokio")]
impl TokioScheduler {
    /// Use the given runtime.
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self { handle }
    }

    /// Use the runtime the caller is running on, if any.
    pub fn current() -> Option<Self> {
        tokio::runtime::Handle::try_current().ok().map(Self::new)
    }
}

#[cfg(feature = "tokio")]
impl Scheduler for TokioScheduler {
    fn schedule(&self, task: Task) {
        // Dropping the JoinHandle detaches the task.
        drop(self.handle.spawn_blocking(task));
    }
}
