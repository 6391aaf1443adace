//! Logging wrapper for callback observation.

use crate::sink::{DiagnosticSink, TracingSink, error_chain};
use hookline_core::{CallbackError, CallbackMeta, CallbackWrapper, Invocation};
use tracing::Level;

/// A wrapper that logs every callback invocation at debug level.
///
/// The chain-level `wrap` is left as identity. Failures of detached
/// callbacks are logged at warn level.
///
/// # Example
///
/// ```rust
/// use hookline_std::wrappers::LoggingWrapper;
///
/// // Logs through `tracing`
/// let logging = LoggingWrapper::new();
/// ```
pub struct LoggingWrapper<S = TracingSink> {
    sink: S,
}

impl LoggingWrapper {
    /// Create a new `LoggingWrapper` writing to `tracing`.
    pub fn new() -> Self {
        Self { sink: TracingSink }
    }
}

impl Default for LoggingWrapper {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: DiagnosticSink> LoggingWrapper<S> {
    /// Create a new `LoggingWrapper` writing to a custom sink.
    pub fn with_sink(sink: S) -> Self {
        Self { sink }
    }
}

impl<S: DiagnosticSink> CallbackWrapper for LoggingWrapper<S> {
    fn wrap_one(&self, meta: &CallbackMeta, call: Invocation<'_>) -> Result<(), CallbackError> {
        self.sink.emit(
            Level::DEBUG,
            format_args!("Executing callback with id {} for hook {}", meta.id, meta.hook),
        );
        call.proceed()
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

    #[test]
    fn logs_before_invoking() {
        let sink = RecordingSink::new();
        let wrapper = LoggingWrapper::with_sink(sink.clone());
        let meta = CallbackMeta::new("afterCreateUser", "welcome-email", Priority::MEDIUM, None);

        let mut seen_before_call = 0;
        let mut step = || -> Result<(), CallbackError> {
            seen_before_call = sink.records().len();
            Ok(())
        };
        wrapper.wrap_one(&meta, Invocation::new(&mut step)).unwrap();

        assert_eq!(seen_before_call, 1);
        assert_eq!(
            sink.records(),
            vec![(
                Level::DEBUG,
                "Executing callback with id welcome-email for hook afterCreateUser".to_string()
            )]
        );
    }

    #[test]
    fn chain_wrap_is_silent() {
        let sink = RecordingSink::new();
        let wrapper = LoggingWrapper::with_sink(sink.clone());
        let mut step = || -> Result<(), CallbackError> { Ok(()) };
        wrapper.wrap("afterCreateUser", 3, Invocation::new(&mut step)).unwrap();
        assert!(sink.records().is_empty());
    }

    #[test]
    fn detached_failures_are_warned() {
        let sink = RecordingSink::new();
        let wrapper = LoggingWrapper::with_sink(sink.clone());
        let meta = CallbackMeta::new("afterCreateUser", "welcome-email", Priority::MEDIUM, None);
        let error = CallbackError::failed(&meta, "smtp down");

        wrapper.report_detached(&meta, &error);

        let warnings = sink.messages_at(Level::WARN);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].ends_with("smtp down"));
    }
}
