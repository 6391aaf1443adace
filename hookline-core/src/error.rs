//! Error types for hookline.
//!
//! - [`CallbackError`] - Errors raised while registering or dispatching callbacks
//! - [`BoxError`] - Opaque failures returned by user callbacks

use crate::callback::CallbackMeta;
use std::any::Any;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while registering or dispatching callbacks.
#[derive(Error, Debug)]
pub enum CallbackError {
    /// A callback returned an error. The rest of the chain did not run.
    #[error("callback `{id}` on hook `{hook}` failed")]
    Failed {
        /// Hook the callback is registered under.
        hook: String,
        /// Id of the failing callback.
        id: String,
        /// The error returned by the callback.
        #[source]
        source: BoxError,
    },

    /// A detached callback panicked.
    #[error("callback `{id}` on hook `{hook}` panicked: {message}")]
    Panicked {
        /// Hook the callback is registered under.
        hook: String,
        /// Id of the panicking callback.
        id: String,
        /// Panic payload, when it was a string.
        message: String,
    },

    /// The hook is bound to a different item/context type pair.
    #[error("hook `{hook}` carries `{registered}`, not `{requested}`")]
    TypeMismatch {
        /// The hook name.
        hook: String,
        /// Payload types the hook was first registered with.
        registered: &'static str,
        /// Payload types of the rejected call.
        requested: &'static str,
    },

    /// A wrapper swallowed a chain failure after the item had been consumed.
    #[error("chain for hook `{hook}` finished without producing an item")]
    Interrupted {
        /// The hook name.
        hook: String,
    },

    /// A custom error raised by a wrapper.
    #[error(transparent)]
    Custom(BoxError),
}

impl CallbackError {
    /// Wrap a callback failure with the identity of the failing callback.
    pub fn failed(meta: &CallbackMeta, source: impl Into<BoxError>) -> Self {
        CallbackError::Failed {
            hook: meta.hook.to_string(),
            id: meta.id.to_string(),
            source: source.into(),
        }
    }

    /// Convert a panic payload caught with `catch_unwind`.
    pub fn panicked(meta: &CallbackMeta, payload: Box<dyn Any + Send>) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&'static str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        CallbackError::Panicked {
            hook: meta.hook.to_string(),
            id: meta.id.to_string(),
            message,
        }
    }

    /// Id of the callback this error originates from, if any.
    pub fn callback_id(&self) -> Option<&str> {
        match self {
            CallbackError::Failed { id, .. } | CallbackError::Panicked { id, .. } => Some(id),
            _ => None,
        }
    }
}

impl From<BoxError> for CallbackError {
    fn from(err: BoxError) -> Self {
        CallbackError::Custom(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Priority;

    #[test]
    fn failed_keeps_source_and_identity() {
        let meta = CallbackMeta::new("beforeSaveMessage", "markdown", Priority::MEDIUM, None);
        let err = CallbackError::failed(&meta, "boom");

        assert_eq!(err.callback_id(), Some("markdown"));
        assert_eq!(
            err.to_string(),
            "callback `markdown` on hook `beforeSaveMessage` failed"
        );
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("boom"));
    }

    #[test]
    fn panicked_reads_string_payloads() {
        let meta = CallbackMeta::new("afterSaveMessage", "notify", Priority::LOW, None);

        let err = CallbackError::panicked(&meta, Box::new("static str"));
        assert!(matches!(
            err,
            CallbackError::Panicked { ref message, .. } if message == "static str"
        ));

        let err = CallbackError::panicked(&meta, Box::new(String::from("owned")));
        assert!(matches!(err, CallbackError::Panicked { ref message, .. } if message == "owned"));

        let err = CallbackError::panicked(&meta, Box::new(42_u32));
        assert!(matches!(
            err,
            CallbackError::Panicked { ref message, .. } if message == "non-string panic payload"
        ));
    }
}
