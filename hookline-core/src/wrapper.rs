//! # Instrumentation Wrappers
//!
//! A wrapper decorates execution without the callbacks knowing about it.
//! It sees two levels:
//!
//! - [`CallbackWrapper::wrap_one`]: around every single callback invocation
//! - [`CallbackWrapper::wrap`]: around the whole composed chain of a hook
//!
//! Both receive an [`Invocation`], a one-shot handle that runs the wrapped
//! step when [`Invocation::proceed`] is called. A wrapper that never proceeds
//! skips the step and the item flows on unchanged.
//!
//! Wrappers are captured when a hook's dispatchers are built, so replacing
//! the active wrapper means rebuilding every hook.

use crate::{callback::CallbackMeta, error::CallbackError};

/// A one-shot handle to the step a wrapper decorates.
pub struct Invocation<'a> {
    step: &'a mut dyn FnMut() -> Result<(), CallbackError>,
}

impl<'a> Invocation<'a> {
    /// Wrap a step.
    pub fn new(step: &'a mut dyn FnMut() -> Result<(), CallbackError>) -> Self {
        Self { step }
    }

    /// Run the wrapped step.
    pub fn proceed(self) -> Result<(), CallbackError> {
        (self.step)()
    }
}

/// Cross-cutting decorator applied uniformly to callback execution.
///
/// All methods default to plain pass-through, so an empty `impl` is the
/// identity wrapper.
pub trait CallbackWrapper: Send + Sync + 'static {
    /// Decorate one run of the composed chain for `hook`.
    fn wrap(
        &self,
        hook: &str,
        callback_count: usize,
        chain: Invocation<'_>,
    ) -> Result<(), CallbackError> {
        let _ = (hook, callback_count);
        chain.proceed()
    }

    /// Decorate one invocation of a single callback.
    fn wrap_one(&self, meta: &CallbackMeta, call: Invocation<'_>) -> Result<(), CallbackError> {
        let _ = meta;
        call.proceed()
    }

    /// Receives failures of callbacks run detached by `run_async`.
    ///
    /// Nothing propagates these to the submitter; the default swallows them.
    fn report_detached(&self, meta: &CallbackMeta, error: &CallbackError) {
        let _ = (meta, error);
    }
}

impl<W: CallbackWrapper + ?Sized> CallbackWrapper for std::sync::Arc<W> {
    fn wrap(
        &self,
        hook: &str,
        callback_count: usize,
        chain: Invocation<'_>,
    ) -> Result<(), CallbackError> {
        (**self).wrap(hook, callback_count, chain)
    }

    fn wrap_one(&self, meta: &CallbackMeta, call: Invocation<'_>) -> Result<(), CallbackError> {
        (**self).wrap_one(meta, call)
    }

    fn report_detached(&self, meta: &CallbackMeta, error: &CallbackError) {
        (**self).report_detached(meta, error)
    }
}
