//! # hookline - Priority-Ordered Hook Callbacks
//!
//! `hookline` lets independent features attach callbacks to named hooks and
//! dispatch them in two ways:
//!
//! - **Chained** ([`Callbacks::run`]): callbacks run in priority order and
//!   each one may replace the item the next one sees.
//! - **Detached** ([`Callbacks::run_async`]): every callback is handed to a
//!   [`Scheduler`] and the caller returns immediately.
//!
//! Both paths are decorated by a swappable [`CallbackWrapper`] for logging,
//! timing or statistics.
//!
//! ## Quick Start
//!
//! ```rust
//! use hookline::{Callbacks, CallbackOptions, Priority};
//!
//! let callbacks = Callbacks::new();
//! callbacks
//!     .add_with_options(
//!         "beforeSaveMessage",
//!         |msg: &String, _: &()| Some(msg.replace("**", "")),
//!         CallbackOptions::new().with_id("strip-bold").with_priority(Priority::HIGH),
//!     )
//!     .unwrap();
//! callbacks
//!     .add("beforeSaveMessage", |msg: &String, _: &()| {
//!         (msg.len() > 5).then(|| format!("{}...", &msg[..5]))
//!     })
//!     .unwrap();
//!
//! let msg = callbacks.run("beforeSaveMessage", "**hello** world".to_string(), &()).unwrap();
//! assert_eq!(msg, "hello...");
//! ```
//!
//! ## Instrumentation
//!
//! ```rust
//! use hookline::{Callbacks, CallbacksConfig, Instrumentation};
//!
//! let config = CallbacksConfig::default().with_instrumentation(Instrumentation::Timing);
//! let callbacks = Callbacks::from_config(&config);
//! callbacks.set_instrumentation(Instrumentation::Logging);
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

#[cfg(feature = "inventory")]
mod collect;
mod config;
mod orchestrator;

pub use hookline_core::{
    // Errors
    BoxError,
    // Callbacks
    Callback,
    CallbackError,
    CallbackMeta,
    CallbackOptions,
    CallbackRecord,
    // Wrappers
    CallbackWrapper,
    IntoOutcome,
    Invocation,
    Payload,
    Priority,
    // Schedulers
    Scheduler,
    Task,
};

pub use config::{
    CallbacksConfig, ConfigError, ENV_DEBUG, ENV_INSTRUMENTATION, ENV_TIMED_CALLBACKS,
    Instrumentation,
};
pub use orchestrator::{Callbacks, CallbacksBuilder};

#[cfg(feature = "inventory")]
pub use collect::{CallbackRegistration, RegisterFn};

/// Instrumentation wrappers.
pub mod wrappers {
    pub use hookline_std::wrappers::{
        CallbackStats, DefaultWrapper, HookStats, LoggingWrapper, StatsSnapshot, StatsWrapper,
        TimedWrapper,
    };
}

/// Schedulers for detached dispatch.
pub mod schedulers {
    #[cfg(feature = "tokio")]
    pub use hookline_std::schedulers::TokioScheduler;
    pub use hookline_std::schedulers::{PoolScheduler, ThreadScheduler};
}

/// Diagnostic sinks used by the logging and timing wrappers.
pub mod sink {
    pub use hookline_std::sink::{DiagnosticSink, TracingSink, error_chain};
}

/// Testing utilities.
pub mod testing {
    #![allow(clippy::wildcard_imports)]
    pub use hookline_std::testing::*;
}

/// Prelude module - common imports for hookline.
///
/// ```rust
/// use hookline::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        CallbackError, CallbackOptions, CallbackWrapper, Callbacks, Instrumentation, Priority,
    };
}

#[cfg(feature = "macros")]
pub use hookline_macros::callback;

#[cfg(feature = "inventory")]
pub use inventory;
