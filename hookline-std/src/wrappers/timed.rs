//! Timing wrapper for per-callback and per-chain durations.

use crate::sink::{DiagnosticSink, TracingSink, error_chain};
use hookline_core::{CallbackError, CallbackMeta, CallbackWrapper, Invocation};
use std::time::Instant;
use tracing::Level;

/// A wrapper that measures wall-clock time.
///
/// Emits one info record per callback invocation
/// (`<elapsed> <hook> <id> <origin>`) and one per chain run
/// (`<hook>: <elapsed>`). Timings are emitted even when the step fails.
pub struct TimedWrapper<S = TracingSink> {
    sink: S,
}

impl TimedWrapper {
    /// Create a new `TimedWrapper` writing to `tracing`.
    pub fn new() -> Self {
        Self { sink: TracingSink }
    }
}

impl Default for TimedWrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: DiagnosticSink> TimedWrapper<S> {
    /// Create a new `TimedWrapper` writing to a custom sink.
    pub fn with_sink(sink: S) -> Self {
        Self { sink }
    }
}

impl<S: DiagnosticSink> CallbackWrapper for TimedWrapper<S> {
    fn wrap(
        &self,
        hook: &str,
        callback_count: usize,
        chain: Invocation<'_>,
    ) -> Result<(), CallbackError> {
        let start = Instant::now();
        let result = chain.proceed();
        let elapsed = start.elapsed();
        self.sink.emit(
            Level::INFO,
            format_args!("{hook}: {elapsed:?} ({callback_count} callbacks)"),
        );
        result
    }

    fn wrap_one(&self, meta: &CallbackMeta, call: Invocation<'_>) -> Result<(), CallbackError> {
        let start = Instant::now();
        let result = call.proceed();
        let elapsed = start.elapsed();
        let origin = meta.origin_short().unwrap_or_else(|| "-".to_string());
        self.sink.emit(
            Level::INFO,
            format_args!("{elapsed:?} {} {} {origin}", meta.hook, meta.id),
        );
        result
    }

    fn report_detached(&self, meta: &CallbackMeta, error: &CallbackError) {
        self.sink.emit(
            Level::WARN,
            format_args!(
                "Detached callback with id {} for hook {} failed: {}",
                meta.id,
                meta.hook,
                error_chain(error)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingSink;
    use hookline_core::Priority;
    use std::panic::Location;

    #[test]
    fn records_callback_timing_with_origin() {
        let sink = RecordingSink::new();
        let wrapper = TimedWrapper::with_sink(sink.clone());
        let meta = CallbackMeta::new(
            "beforeSaveMessage",
            "emoji",
            Priority::MEDIUM,
            Some(Location::caller()),
        );

        let mut step = || -> Result<(), CallbackError> { Ok(()) };
        wrapper.wrap_one(&meta, Invocation::new(&mut step)).unwrap();

        let records = sink.messages_at(Level::INFO);
        assert_eq!(records.len(), 1);
        assert!(records[0].contains(" beforeSaveMessage emoji "));
        assert!(records[0].contains(file!()));
    }

    #[test]
    fn records_chain_total_even_on_failure() {
        let sink = RecordingSink::new();
        let wrapper = TimedWrapper::with_sink(sink.clone());
        let meta = CallbackMeta::new("beforeSaveMessage", "emoji", Priority::MEDIUM, None);

        let mut step = || -> Result<(), CallbackError> { Err(CallbackError::failed(&meta, "bad")) };
        let result = wrapper.wrap("beforeSaveMessage", 2, Invocation::new(&mut step));

        assert!(result.is_err());
        let records = sink.messages_at(Level::INFO);
        assert_eq!(records.len(), 1);
        assert!(records[0].starts_with("beforeSaveMessage: "));
        assert!(records[0].ends_with("(2 callbacks)"));
    }
}
