//! Diagnostic sinks for wrapper output.

use std::{error::Error, fmt};
use tracing::Level;

/// Destination for leveled diagnostic messages emitted by wrappers.
pub trait DiagnosticSink: Send + Sync + 'static {
    /// Emit one message.
    fn emit(&self, level: Level, message: fmt::Arguments<'_>);
}

/// Forwards diagnostics to `tracing` under the `hookline` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, level: Level, message: fmt::Arguments<'_>) {
        if level == Level::ERROR {
            tracing::error!(target: "hookline", "{message}");
        } else if level == Level::WARN {
            tracing::warn!(target: "hookline", "{message}");
        } else if level == Level::INFO {
            tracing::info!(target: "hookline", "{message}");
        } else if level == Level::DEBUG {
            tracing::debug!(target: "hookline", "{message}");
        } else {
            tracing::trace!(target: "hookline", "{message}");
        }
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for std::sync::Arc<S> {
    fn emit(&self, level: Level, message: fmt::Arguments<'_>) {
        (**self).emit(level, message)
    }
}

/// Render an error with its full source chain, `outer: inner: root`.
pub fn error_chain(err: &dyn Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        out.push_str(": ");
        out.push_str(&inner.to_string());
        source = inner.source();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookline_core::{CallbackError, CallbackMeta, Priority};

    #[test]
    fn error_chain_includes_sources() {
        let meta = CallbackMeta::new("beforeSaveMessage", "spam", Priority::MEDIUM, None);
        let err = CallbackError::failed(&meta, "message flagged");
        assert_eq!(
            error_chain(&err),
            "callback `spam` on hook `beforeSaveMessage` failed: message flagged"
        );
    }
}
