//! `#[callback]` expansion.
//!
//! The annotated function is kept as is. Next to it the macro emits a hidden
//! registration function and submits it to `inventory`, so
//! `Callbacks::register_collected` can pick it up at startup.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{
    Expr, FnArg, Ident, ItemFn, LitStr, Token, Type,
    parse::{Parse, ParseStream},
};

/// Arguments for the `#[callback]` macro.
pub(crate) struct CallbackArgs {
    /// Hook name (required).
    hook: LitStr,
    /// `high`, `medium`, `low`, or any expression convertible into `Priority`.
    priority: Option<Expr>,
    /// Explicit id. Defaults to the function name.
    id: Option<LitStr>,
    /// Context type for single-argument functions. Defaults to `()`.
    context: Option<Type>,
}

impl Parse for CallbackArgs {
    fn parse(input: ParseStream) -> syn::Result<Self> {
        let mut hook = None;
        let mut priority = None;
        let mut id = None;
        let mut context = None;

        while !input.is_empty() {
            let key: Ident = input.parse()?;
            input.parse::<Token![=]>()?;

            match key.to_string().as_str() {
                "hook" if hook.is_none() => hook = Some(input.parse()?),
                "priority" if priority.is_none() => priority = Some(input.parse()?),
                "id" if id.is_none() => id = Some(input.parse()?),
                "context" if context.is_none() => context = Some(input.parse()?),
                "hook" | "priority" | "id" | "context" => {
                    return Err(syn::Error::new(
                        key.span(),
                        format!("duplicate attribute: {key}"),
                    ));
                }
                other => {
                    return Err(syn::Error::new(
                        key.span(),
                        format!("unknown attribute: {other}"),
                    ));
                }
            }

            if input.is_empty() {
                break;
            }
            input.parse::<Token![,]>()?;
        }

        let hook = hook.ok_or_else(|| {
            syn::Error::new(input.span(), "missing `hook = \"...\"` argument")
        })?;
        Ok(CallbackArgs {
            hook,
            priority,
            id,
            context,
        })
    }
}

/// Map the priority argument onto `::hookline::Priority`.
fn priority_tokens(priority: Option<&Expr>) -> syn::Result<TokenStream> {
    let Some(expr) = priority else {
        return Ok(quote! { ::hookline::Priority::MEDIUM });
    };
    if let Expr::Path(path) = expr {
        if let Some(ident) = path.path.get_ident() {
            return match ident.to_string().as_str() {
                "high" => Ok(quote! { ::hookline::Priority::HIGH }),
                "medium" => Ok(quote! { ::hookline::Priority::MEDIUM }),
                "low" => Ok(quote! { ::hookline::Priority::LOW }),
                _ => Err(syn::Error::new_spanned(
                    ident,
                    "expected `high`, `medium`, `low` or an integer",
                )),
            };
        }
    }
    Ok(quote! { ::hookline::Priority::from(#expr) })
}

/// Item type of each argument, which must all be shared references.
fn argument_types(input: &ItemFn) -> syn::Result<Vec<&Type>> {
    input
        .sig
        .inputs
        .iter()
        .map(|arg| match arg {
            FnArg::Receiver(receiver) => Err(syn::Error::new_spanned(
                receiver,
                "callback functions cannot take `self`",
            )),
            FnArg::Typed(pat_type) => match &*pat_type.ty {
                Type::Reference(reference) if reference.mutability.is_none() => {
                    Ok(&*reference.elem)
                }
                other => Err(syn::Error::new_spanned(
                    other,
                    "callback arguments must be shared references (`&T`)",
                )),
            },
        })
        .collect()
}

pub(crate) fn expand(args: CallbackArgs, input: ItemFn) -> syn::Result<TokenStream> {
    let sig = &input.sig;
    if let Some(asyncness) = &sig.asyncness {
        return Err(syn::Error::new_spanned(
            asyncness,
            "callbacks run synchronously; `async fn` is not supported",
        ));
    }
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(
            &sig.generics,
            "callback functions cannot be generic",
        ));
    }

    let fn_name = &sig.ident;
    let callback = match argument_types(&input)?.as_slice() {
        [_, _] if args.context.is_some() => {
            return Err(syn::Error::new_spanned(
                &sig.inputs,
                "`context` only applies to single-argument callbacks",
            ));
        }
        [_, _] => quote! { #fn_name },
        [item] => {
            let context = match &args.context {
                Some(context) => quote! { #context },
                None => quote! { () },
            };
            quote! { |__item: &#item, _: &#context| #fn_name(__item) }
        }
        _ => {
            return Err(syn::Error::new_spanned(
                &sig.inputs,
                "callback functions take `(&Item)` or `(&Item, &Context)`",
            ));
        }
    };

    let hook = &args.hook;
    let id = args
        .id
        .as_ref()
        .map(LitStr::value)
        .unwrap_or_else(|| fn_name.to_string());
    let priority = priority_tokens(args.priority.as_ref())?;
    let register = format_ident!("__hookline_register_{}", fn_name);

    Ok(quote! {
        #input

        #[doc(hidden)]
        #[allow(non_snake_case)]
        fn #register(
            callbacks: &::hookline::Callbacks,
        ) -> ::core::result::Result<(), ::hookline::CallbackError> {
            callbacks
                .add_with_options(
                    #hook,
                    #callback,
                    ::hookline::CallbackOptions::new()
                        .with_priority(#priority)
                        .with_id(#id),
                )
                .map(|_| ())
        }

        ::hookline::inventory::submit! {
            ::hookline::CallbackRegistration::new(#hook, #id, #register)
        }
    })
}
