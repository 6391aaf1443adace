//! Startup registration via `inventory`.
//!
//! Callbacks declared with `#[hookline::callback]` (or submitted by hand)
//! are collected at link time and applied with
//! [`Callbacks::register_collected`].
//!
//! ```rust,ignore
//! fn register_audit(callbacks: &hookline::Callbacks) -> Result<(), hookline::CallbackError> {
//!     callbacks.add("afterSaveMessage", |msg: &Message, _: &()| audit(msg)).map(|_| ())
//! }
//!
//! hookline::inventory::submit! {
//!     hookline::CallbackRegistration::new("afterSaveMessage", "audit", register_audit)
//! }
//! ```

use crate::Callbacks;
use hookline_core::CallbackError;

/// Registers one callback on a registry.
pub type RegisterFn = fn(&Callbacks) -> Result<(), CallbackError>;

/// A callback registration submitted to `inventory`.
#[derive(Debug)]
pub struct CallbackRegistration {
    hook: &'static str,
    id: &'static str,
    register: RegisterFn,
}

impl CallbackRegistration {
    /// Create a registration. `register` must add the callback under
    /// `hook` with id `id`.
    pub const fn new(hook: &'static str, id: &'static str, register: RegisterFn) -> Self {
        Self { hook, id, register }
    }

    /// The hook the callback is registered under.
    pub fn hook(&self) -> &'static str {
        self.hook
    }

    /// The id the callback is registered with.
    pub fn id(&self) -> &'static str {
        self.id
    }
}

inventory::collect!(CallbackRegistration);

impl Callbacks {
    /// Apply every collected [`CallbackRegistration`].
    ///
    /// Registrations whose id is already present are skipped. Returns how
    /// many callbacks were newly added. Callbacks sharing a priority on one
    /// hook run in link order, which is unspecified.
    pub fn register_collected(&self) -> Result<usize, CallbackError> {
        let mut added = 0;
        for registration in inventory::iter::<CallbackRegistration> {
            if self.contains(registration.hook, registration.id) {
                continue;
            }
            (registration.register)(self)?;
            added += 1;
        }
        tracing::debug!(target: "hookline", added, "collected callbacks registered");
        Ok(added)
    }
}
