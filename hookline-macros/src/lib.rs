//! Procedural macros for hookline.
//!
//! Use through the `hookline` crate with the `macros` feature enabled.

use proc_macro::TokenStream;
use syn::{ItemFn, parse_macro_input};

mod callback;

/// Register a function as a callback on a hook at startup.
///
/// The function takes `(&Item)` or `(&Item, &Context)` and returns anything
/// a closure passed to `Callbacks::add` may return. Registrations are
/// collected with `inventory` and applied by
/// `Callbacks::register_collected`.
///
/// # Arguments
///
/// - `hook = "..."`: hook name (required)
/// - `priority = high | medium | low | <integer>`: defaults to `medium`
/// - `id = "..."`: defaults to the function name
/// - `context = Type`: context type of a single-argument function, so it can
///   join a hook whose other callbacks take a context. Defaults to `()`
///
/// # Example
///
/// ```rust,ignore
/// #[hookline::callback(hook = "beforeSaveMessage", priority = high)]
/// fn strip_whitespace(message: &Message) -> Option<Message> {
///     Some(message.trimmed())
/// }
///
/// #[hookline::callback(hook = "afterSaveMessage", id = "notify-room")]
/// fn notify(message: &Message, room: &Room) {
///     room.notify(message);
/// }
/// ```
#[proc_macro_attribute]
pub fn callback(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as callback::CallbackArgs);
    let input = parse_macro_input!(item as ItemFn);

    match callback::expand(args, input) {
        Ok(expanded) => TokenStream::from(expanded),
        Err(err) => err.to_compile_error().into(),
    }
}
