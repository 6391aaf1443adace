//! # hookline-std
//!
//! Standard implementations for the hookline callback dispatch engine.
//!
//! This crate provides:
//! - **Wrappers**: [`DefaultWrapper`], [`LoggingWrapper`], [`TimedWrapper`], [`StatsWrapper`]
//! - **Diagnostic sinks**: [`TracingSink`] and the [`DiagnosticSink`] trait
//! - **Schedulers**: [`ThreadScheduler`], [`PoolScheduler`], `TokioScheduler` (feature `tokio`)
//! - **Testing utilities**: [`testing`]
//!
//! [`DefaultWrapper`]: wrappers::DefaultWrapper
//! [`LoggingWrapper`]: wrappers::LoggingWrapper
//! [`TimedWrapper`]: wrappers::TimedWrapper
//! [`StatsWrapper`]: wrappers::StatsWrapper
//! [`TracingSink`]: sink::TracingSink
//! [`DiagnosticSink`]: sink::DiagnosticSink
//! [`ThreadScheduler`]: schedulers::ThreadScheduler
//! [`PoolScheduler`]: schedulers::PoolScheduler

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use hookline_core;

// Modules
pub mod schedulers;
pub mod sink;
pub mod testing;
pub mod wrappers;
