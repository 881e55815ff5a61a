//! Compile-time front end for `drizzle-lambda`'s query compiler.
//!
//! `drizzle-core` is a pure function from an already-built operation tree to
//! `{ sql, params }`; it has no parser of its own. The five macros here are
//! that parser: each receives the unevaluated token stream of a builder
//! chain (or a table declaration list, for `schema!`) and expands it into
//! calls against `drizzle_core::generated`, so a grammar violation is a
//! `compile_error!` rather than a runtime `ParseFailure`.

mod boolean;
mod ctx;
mod dml;
mod schema;
mod select;
mod value;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;

fn run(input: TokenStream, f: impl FnOnce(TokenStream2) -> syn::Result<TokenStream2>) -> TokenStream {
    match f(TokenStream2::from(input)) {
        Ok(ts) => TokenStream::from(ts),
        Err(e) => TokenStream::from(e.to_compile_error()),
    }
}

/// Builds the phantom-typed `Schema` handle for a set of named table shapes.
///
/// ```ignore
/// schema! {
///     AppSchema {
///         users { id: Number, name: String, email: String },
///     }
/// }
/// ```
#[proc_macro]
pub fn schema(input: TokenStream) -> TokenStream {
    run(input, schema::expand)
}

/// Expands `|q, params?| q.from(...)....build()` (or any chain ending in a
/// terminal) into a `drizzle_core::generated::Queryable` call sequence.
#[proc_macro]
pub fn define_select(input: TokenStream) -> TokenStream {
    run(input, select::expand)
}

/// Expands `|q, params?| q.insert("table", Row { col: expr, ... })
/// .returning(...).build()` into an `Insertable` call sequence.
#[proc_macro]
pub fn define_insert(input: TokenStream) -> TokenStream {
    run(input, dml::expand_insert)
}

/// Expands `|q, params?| q.update("table").set("col", expr)....build()`
/// into an `Updatable` call sequence.
#[proc_macro]
pub fn define_update(input: TokenStream) -> TokenStream {
    run(input, dml::expand_update)
}

/// Expands `|q, params?| q.delete("table").where_(...).build()` into a
/// `Deletable` call sequence.
#[proc_macro]
pub fn define_delete(input: TokenStream) -> TokenStream {
    run(input, dml::expand_delete)
}
