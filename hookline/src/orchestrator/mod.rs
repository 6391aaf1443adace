//! Registry and dispatcher construction.
//!
//! - [`registry`]: the [`Callbacks`](registry::Callbacks) registry and its builder
//! - `table`: per-hook storage, type-erased across item/context pairs
//! - `combine`: chained and parallel dispatcher composition

mod combine;
pub mod registry;
mod table;

pub use registry::{Callbacks, CallbacksBuilder};
