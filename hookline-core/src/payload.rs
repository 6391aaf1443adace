//! Payload marker trait for hook items and contexts.

/// A marker trait for items and contexts flowing through hooks.
///
/// Payloads must be `Send + Sync + 'static`: items are shared with detached
/// callbacks by `run_async`, and hooks are stored type-erased in the registry.
/// Every type meeting those bounds is a payload.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a valid hook payload",
    label = "must be `Send + Sync + 'static`",
    note = "Hook items and contexts are shared across threads by `run_async`."
)]
pub trait Payload: Send + Sync + 'static {}

impl<T: Send + Sync + 'static> Payload for T {}
