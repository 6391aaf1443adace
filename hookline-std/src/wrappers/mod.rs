//! Standard instrumentation wrappers.
//!
//! - [`DefaultWrapper`]: no instrumentation
//! - [`LoggingWrapper`]: a debug line before every callback
//! - [`TimedWrapper`]: per-callback and per-chain wall-clock timings
//! - [`StatsWrapper`]: aggregated counters around another wrapper

pub mod default;
pub mod logging;
pub mod stats;
pub mod timed;

pub use default::DefaultWrapper;
pub use logging::LoggingWrapper;
pub use stats::{CallbackStats, HookStats, StatsSnapshot, StatsWrapper};
pub use timed::TimedWrapper;
