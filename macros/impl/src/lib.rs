//! Procedural macro implementations backing `fastseq-macros`.
//!
//! Import these through `fastseq-macros` (which also re-exports the `tracing`
//! crates the generated code refers to) rather than depending on this crate directly.

use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{parse_macro_input, Ident, ItemFn, LitStr};

/// Levels accepted by [macro@test_traced].
const LEVELS: [&str; 5] = ["TRACE", "DEBUG", "INFO", "WARN", "ERROR"];

/// Run a test function with a `tracing` subscriber installed for its duration.
///
/// The subscriber writes to the test harness output (so logs are only shown for
/// failing tests or with `--nocapture`). The maximum level defaults to `DEBUG`
/// and can be overridden with a string literal, e.g. `#[test_traced("INFO")]`.
///
/// The subscriber is installed as the thread-local default of the test thread, so
/// events emitted from other threads (e.g. a rayon pool) are not captured.
#[proc_macro_attribute]
pub fn test_traced(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);

    // Parse the requested level
    let level = if attr.is_empty() {
        "DEBUG".to_string()
    } else {
        let literal = parse_macro_input!(attr as LitStr);
        let value = literal.value().to_uppercase();
        if !LEVELS.contains(&value.as_str()) {
            return syn::Error::new(
                literal.span(),
                format!(
                    "invalid log level `{}`; expected one of {}",
                    literal.value(),
                    LEVELS.join(", ")
                ),
            )
            .to_compile_error()
            .into();
        }
        value
    };
    let level = Ident::new(&level, Span::call_site());

    // Rebuild the function with the subscriber wrapped around its body
    let attrs = &input.attrs;
    let vis = &input.vis;
    let sig = &input.sig;
    let block = &input.block;
    let expanded = quote! {
        #[test]
        #(#attrs)*
        #vis #sig {
            let subscriber = ::fastseq_macros::tracing_subscriber::fmt()
                .with_test_writer()
                .with_max_level(::fastseq_macros::tracing::Level::#level)
                .with_line_number(true)
                .finish();
            let dispatch = ::fastseq_macros::tracing::Dispatch::new(subscriber);
            ::fastseq_macros::tracing::dispatcher::with_default(&dispatch, || #block)
        }
    };
    TokenStream::from(expanded)
}
