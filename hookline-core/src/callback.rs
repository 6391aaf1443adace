//! # Callback Records
//!
//! A callback is a plain function attached to a named hook. It borrows the
//! item flowing through the hook together with a constant context, and may
//! hand back a replacement item.
//!
//! # Outcomes
//!
//! The return value is interpreted through [`IntoOutcome`]:
//!
//! - `Option<I>`: `Some(next)` replaces the item, `None` passes it through
//! - `()`: always passes the item through (observers)
//! - `Result<T, E>`: `Ok` delegates to `T`, `Err` fails the callback
//!
//! Returning a copy of the unchanged item and returning `None` are
//! indistinguishable to the pipeline.

use crate::{error::BoxError, error::CallbackError, priority::Priority};
use std::{fmt, panic::Location, sync::Arc};

/// Conversion from a callback's return value into its pipeline outcome.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be returned from a callback over `{I}`",
    label = "not a callback outcome",
    note = "Return `Option<{I}>`, `()`, or a `Result` wrapping one of them."
)]
pub trait IntoOutcome<I> {
    /// `Ok(Some(item))` replaces the item, `Ok(None)` passes it through.
    fn into_outcome(self) -> Result<Option<I>, BoxError>;
}

impl<I> IntoOutcome<I> for Option<I> {
    fn into_outcome(self) -> Result<Option<I>, BoxError> {
        Ok(self)
    }
}

impl<I> IntoOutcome<I> for () {
    fn into_outcome(self) -> Result<Option<I>, BoxError> {
        Ok(None)
    }
}

impl<I, T, E> IntoOutcome<I> for Result<T, E>
where
    T: IntoOutcome<I>,
    E: Into<BoxError>,
{
    fn into_outcome(self) -> Result<Option<I>, BoxError> {
        match self {
            Ok(t) => t.into_outcome(),
            Err(e) => Err(e.into()),
        }
    }
}

/// A function registered under a hook.
///
/// Implemented for every `Fn(&I, &C) -> R` closure or function whose return
/// type implements [`IntoOutcome`].
pub trait Callback<I, C>: Send + Sync + 'static {
    /// Run the callback against the current item.
    fn call(&self, item: &I, ctx: &C) -> Result<Option<I>, BoxError>;
}

impl<F, I, C, R> Callback<I, C> for F
where
    F: Fn(&I, &C) -> R + Send + Sync + 'static,
    R: IntoOutcome<I>,
{
    fn call(&self, item: &I, ctx: &C) -> Result<Option<I>, BoxError> {
        (self)(item, ctx).into_outcome()
    }
}

/// Identity and diagnostics of a registered callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackMeta {
    /// The hook the callback is registered under.
    pub hook: Arc<str>,
    /// Unique id within the hook.
    pub id: Arc<str>,
    /// Execution priority.
    pub priority: Priority,
    /// Call site of the registration, for diagnostics only.
    pub origin: Option<&'static Location<'static>>,
}

impl CallbackMeta {
    /// Create metadata for a callback.
    pub fn new(
        hook: impl Into<Arc<str>>,
        id: impl Into<Arc<str>>,
        priority: Priority,
        origin: Option<&'static Location<'static>>,
    ) -> Self {
        Self {
            hook: hook.into(),
            id: id.into(),
            priority,
            origin,
        }
    }

    /// Abbreviated registration site (`file:line`).
    pub fn origin_short(&self) -> Option<String> {
        self.origin.map(|loc| format!("{}:{}", loc.file(), loc.line()))
    }
}

impl fmt::Display for CallbackMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.hook, self.id)
    }
}

/// A callback together with its metadata.
pub struct CallbackRecord<I, C> {
    meta: CallbackMeta,
    callback: Arc<dyn Callback<I, C>>,
}

impl<I: 'static, C: 'static> CallbackRecord<I, C> {
    /// Create a record.
    pub fn new(meta: CallbackMeta, callback: Arc<dyn Callback<I, C>>) -> Self {
        Self { meta, callback }
    }

    /// The record's metadata.
    pub fn meta(&self) -> &CallbackMeta {
        &self.meta
    }

    /// Invoke the callback, attributing failures to this record.
    pub fn invoke(&self, item: &I, ctx: &C) -> Result<Option<I>, CallbackError> {
        self.callback
            .call(item, ctx)
            .map_err(|source| CallbackError::failed(&self.meta, source))
    }
}

impl<I, C> Clone for CallbackRecord<I, C> {
    fn clone(&self) -> Self {
        Self {
            meta: self.meta.clone(),
            callback: self.callback.clone(),
        }
    }
}

impl<I, C> fmt::Debug for CallbackRecord<I, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackRecord")
            .field("meta", &self.meta)
            .finish_non_exhaustive()
    }
}

/// Registration options for a callback.
///
/// # Example
/// ```
/// use hookline_core::{CallbackOptions, Priority};
///
/// let options = CallbackOptions::new()
///     .with_priority(Priority::HIGH)
///     .with_id("strip-markdown");
/// assert_eq!(options.id.as_deref(), Some("strip-markdown"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallbackOptions {
    /// Priority (lower = executed first). Defaults to [`Priority::MEDIUM`].
    pub priority: Priority,
    /// Explicit id. A random id is generated when absent.
    pub id: Option<String>,
}

impl CallbackOptions {
    /// Default options: medium priority, generated id.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set priority.
    pub fn with_priority(mut self, priority: impl Into<Priority>) -> Self {
        self.priority = priority.into();
        self
    }

    /// Set id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record<F, R>(f: F) -> CallbackRecord<i32, i32>
    where
        F: Fn(&i32, &i32) -> R + Send + Sync + 'static,
        R: IntoOutcome<i32>,
    {
        let meta = CallbackMeta::new("h", "cb", Priority::MEDIUM, None);
        CallbackRecord::new(meta, Arc::new(f))
    }

    #[test]
    fn option_outcomes() {
        let replace = record(|item: &i32, ctx: &i32| Some(item + ctx));
        assert_eq!(replace.invoke(&1, &2).unwrap(), Some(3));

        let pass = record(|_: &i32, _: &i32| None);
        assert_eq!(pass.invoke(&1, &2).unwrap(), None);
    }

    #[test]
    fn unit_outcome_passes_through() {
        let observer = record(|_: &i32, _: &i32| {});
        assert_eq!(observer.invoke(&7, &0).unwrap(), None);
    }

    #[test]
    fn result_errors_are_attributed() {
        let failing = record(|_: &i32, _: &i32| -> Result<Option<i32>, &'static str> {
            Err("rejected")
        });
        let err = failing.invoke(&1, &1).unwrap_err();
        assert!(matches!(
            err,
            CallbackError::Failed { ref hook, ref id, .. } if &**hook == "h" && &**id == "cb"
        ));
    }

    #[test]
    fn origin_is_abbreviated() {
        let meta = CallbackMeta::new("h", "cb", Priority::LOW, Some(Location::caller()));
        let origin = meta.origin_short().unwrap();
        assert!(origin.starts_with(file!()));
        assert_eq!(meta.to_string(), "h#cb");
    }
}
