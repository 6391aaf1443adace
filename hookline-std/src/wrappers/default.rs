//! Identity wrapper.

use hookline_core::CallbackWrapper;

/// A wrapper that adds nothing. Callbacks and chains run as composed, and
/// detached failures are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultWrapper;

impl CallbackWrapper for DefaultWrapper {}
