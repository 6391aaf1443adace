//! # hookline-core
//!
//! Core traits for the hookline callback dispatch engine.
//!
//! This crate has minimal dependencies and is meant to be imported by
//! features that only need to define callbacks or wrappers, not the
//! registry itself.
//!
//! # Building Blocks
//!
//! ## [`Callback`]
//!
//! A function `(&item, &context) -> outcome` registered under a hook. The
//! outcome either replaces the item or passes it through (see
//! [`IntoOutcome`]).
//!
//! ## [`CallbackRecord`] / [`CallbackMeta`]
//!
//! A callback plus its hook name, id, [`Priority`], and registration site.
//!
//! ## [`CallbackWrapper`]
//!
//! Instrumentation strategy decorating each callback and each composed chain.
//!
//! ## [`Scheduler`]
//!
//! "Run this later" primitive behind detached dispatch.
//!
//! # Error Types
//!
//! - [`CallbackError`] - Registration and dispatch errors
//! - [`BoxError`] - Failures returned by callbacks

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod callback;
mod error;
mod payload;
mod priority;
mod scheduler;
mod wrapper;

// Re-exports
pub use callback::{Callback, CallbackMeta, CallbackOptions, CallbackRecord, IntoOutcome};
pub use error::{BoxError, CallbackError};
pub use payload::Payload;
pub use priority::Priority;
pub use scheduler::{Scheduler, Task};
pub use wrapper::{CallbackWrapper, Invocation};
