//! Deferred execution primitive used by `run_async`.

/// A unit of deferred work.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs tasks later, independently of the submitting call.
///
/// Implementations must not run the task on the caller's stack before
/// `schedule` returns, except where documented (test schedulers).
pub trait Scheduler: Send + Sync + 'static {
    /// Submit a task.
    fn schedule(&self, task: Task);
}

impl<S: Scheduler + ?Sized> Scheduler for std::sync::Arc<S> {
    fn schedule(&self, task: Task) {
        (**self).schedule(task)
    }
}
