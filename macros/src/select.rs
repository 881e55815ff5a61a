//! `define_select!` — parses the one chained expression of a
//! `|q, params?| q.from(...)....build()` (or `...first(...)`, etc.) input
//! into a call sequence against `drizzle_core::generated::Queryable`.
//!
//! The DSL mirrors `drizzle_core::builder::Queryable`'s own method names
//! one-for-one: since the input is real (never type-checked) Rust syntax
//! rather than a bespoke grammar, there is nothing to gain from inventing
//! different spellings, and every builder method is already the exact
//! shape this converter needs to emit.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Expr, Pat};

use crate::boolean::convert_bool;
use crate::ctx::{err, unwrap_expr, Scope, Side, TableParam};
use crate::value::{convert_projection, convert_value};

pub fn expand(input: TokenStream) -> syn::Result<TokenStream> {
    let closure: syn::ExprClosure = syn::parse2(input)?;
    let mut inputs = closure.inputs.iter();

    let q_ident = pat_ident(inputs.next().ok_or_else(|| err(&closure, "expected at least a `q` parameter"))?)?;
    let query_params: Vec<syn::Ident> = inputs.map(pat_ident).collect::<syn::Result<_>>()?;

    let body = unwrap_block(&closure.body)?;
    let tokens = lower_chain(body, &q_ident, &query_params)?;
    Ok(quote! { { #tokens } })
}

fn pat_ident(pat: &Pat) -> syn::Result<syn::Ident> {
    match pat {
        Pat::Ident(p) => Ok(p.ident.clone()),
        other => Err(syn::Error::new_spanned(other, "expected a plain identifier parameter")),
    }
}

/// `ExprClosure::body` is always a `Box<Expr>`, but for a `{ ... }` body
/// that's an `Expr::Block` wrapping a single trailing expression — unwrap
/// that one layer of statement-body so callers only ever see the chain.
fn unwrap_block(body: &Expr) -> syn::Result<&Expr> {
    match unwrap_expr(body) {
        Expr::Block(b) => match b.block.stmts.as_slice() {
            [syn::Stmt::Expr(e, None)] => Ok(e),
            _ => Err(err(body, "a macro body must be a single chained expression, not a statement sequence")),
        },
        other => Ok(other),
    }
}

fn extract_simple_column(expr: &Expr) -> syn::Result<String> {
    let Expr::Closure(c) = unwrap_expr(expr) else {
        return Err(err(expr, "expected a `|row| row.column` key selector"));
    };
    let mut inputs = c.inputs.iter();
    let ident = pat_ident(inputs.next().ok_or_else(|| err(expr, "expected one row parameter"))?)?;
    if inputs.next().is_some() {
        return Err(err(expr, "a key selector takes exactly one row parameter"));
    }
    let body = unwrap_expr(&c.body);
    let (root, segments) = crate::ctx::flatten_field_chain(body)
        .ok_or_else(|| err(body, "a key selector must be a simple column reference"))?;
    if root != ident || segments.len() != 1 {
        return Err(err(body, "a key selector must be a simple column reference"));
    }
    Ok(segments.into_iter().next().unwrap())
}

fn row_closure(expr: &Expr, side: Option<Side>) -> syn::Result<(TableParam, &Expr)> {
    let Expr::Closure(c) = unwrap_expr(expr) else {
        return Err(err(expr, "expected a `|row| ...` lambda"));
    };
    let mut inputs = c.inputs.iter();
    let ident = pat_ident(inputs.next().ok_or_else(|| err(expr, "expected one row parameter"))?)?;
    if inputs.next().is_some() {
        return Err(err(expr, "expected exactly one row parameter"));
    }
    Ok((TableParam { ident, side }, &c.body))
}

fn two_row_closure(expr: &Expr) -> syn::Result<(TableParam, TableParam, &Expr)> {
    let Expr::Closure(c) = unwrap_expr(expr) else {
        return Err(err(expr, "expected a `|outer, inner| ...` join-result lambda"));
    };
    let mut inputs = c.inputs.iter();
    let outer = pat_ident(inputs.next().ok_or_else(|| err(expr, "expected two row parameters"))?)?;
    let inner = pat_ident(inputs.next().ok_or_else(|| err(expr, "expected two row parameters"))?)?;
    if inputs.next().is_some() {
        return Err(err(expr, "expected exactly two row parameters"));
    }
    Ok((
        TableParam { ident: outer, side: Some(Side::Outer) },
        TableParam { ident: inner, side: Some(Side::Inner) },
        &c.body,
    ))
}

/// `None` ⇒ no predicate; `Some(|row| pred)` ⇒ a predicate. Written out
/// longhand so the DSL input is exactly the `Option<BoolExpr>` shape the
/// builder methods already expect.
fn option_predicate(expr: &Expr, query_params: &[syn::Ident]) -> syn::Result<TokenStream> {
    match unwrap_expr(expr) {
        Expr::Path(p) if p.path.is_ident("None") => Ok(quote! { None }),
        Expr::Call(c) if matches!(unwrap_expr(&c.func), Expr::Path(p) if p.path.is_ident("Some")) => {
            if c.args.len() != 1 {
                return Err(err(expr, "expected `Some(|row| predicate)`"));
            }
            let (table_param, body) = row_closure(&c.args[0], None)?;
            let scope = Scope { table_params: &[table_param], query_params };
            let pred = convert_bool(body, &scope)?;
            Ok(quote! { Some(#pred) })
        }
        _ => Err(err(expr, "expected `None` or `Some(|row| predicate)`")),
    }
}

fn lower_chain(expr: &Expr, q_ident: &syn::Ident, query_params: &[syn::Ident]) -> syn::Result<TokenStream> {
    let expr = unwrap_expr(expr);
    let Expr::MethodCall(mc) = expr else {
        return Err(err(expr, "expected a chained builder call"));
    };
    let method = mc.method.to_string();

    if method == "from" {
        let Expr::Path(recv) = unwrap_expr(&mc.receiver) else {
            return Err(err(&mc.receiver, "expected the query-root parameter"));
        };
        if !recv.path.is_ident(q_ident) {
            return Err(err(&mc.receiver, "`from` must be called on the query-root parameter"));
        }
        if mc.args.len() != 1 {
            return Err(err(expr, "`from` takes exactly one table-name argument"));
        }
        let table = &mc.args[0];
        return Ok(quote! { ::drizzle_core::generated::Queryable::from(#table) });
    }

    let prev = lower_chain(&mc.receiver, q_ident, query_params)?;

    match method.as_str() {
        "where_" => {
            let (table_param, body) = row_closure(&mc.args[0], None)?;
            let scope = Scope { table_params: &[table_param], query_params };
            let pred = convert_bool(body, &scope)?;
            Ok(quote! { #prev.where_(#pred) })
        }
        "select" => {
            let (table_param, body) = row_closure(&mc.args[0], None)?;
            let scope = Scope { table_params: &[table_param], query_params };
            let proj = convert_projection(body, &scope)?;
            Ok(quote! { #prev.select(#proj) })
        }
        "order_by" | "order_by_descending" => {
            let (table_param, body) = row_closure(&mc.args[0], None)?;
            let scope = Scope { table_params: &[table_param], query_params };
            let key = convert_value(body, &scope)?;
            let call = quote::format_ident!("{}", method);
            Ok(quote! { #prev.#call(#key) })
        }
        "then_by" | "then_by_descending" => {
            let (table_param, body) = row_closure(&mc.args[0], None)?;
            let scope = Scope { table_params: &[table_param], query_params };
            let key = convert_value(body, &scope)?;
            let call = quote::format_ident!("{}", method);
            Ok(quote! { ::drizzle_core::generated::ThenByExt::#call(#prev, #key) })
        }
        "group_by" => {
            let col = extract_simple_column(&mc.args[0])?;
            Ok(quote! { #prev.group_by(#col) })
        }
        "take" | "skip" => {
            let count = count_expr(&mc.args[0], query_params)?;
            let call = quote::format_ident!("{}", method);
            Ok(quote! { #prev.#call(#count) })
        }
        "distinct" => Ok(quote! { #prev.distinct() }),
        "reverse" => Ok(quote! { #prev.reverse() }),
        "union" => {
            let other = lower_chain(&mc.args[0], q_ident, query_params)?;
            Ok(quote! { #prev.union(#other) })
        }
        "join" => {
            if mc.args.len() != 4 {
                return Err(err(expr, "`join` takes (inner, outer_key, inner_key, result)"));
            }
            let inner = lower_chain(&mc.args[0], q_ident, query_params)?;
            let outer_key = extract_simple_column(&mc.args[1])?;
            let inner_key = extract_simple_column(&mc.args[2])?;
            let result = match unwrap_expr(&mc.args[3]) {
                Expr::Path(p) if p.path.is_ident("None") => quote! { None },
                Expr::Call(c) if matches!(unwrap_expr(&c.func), Expr::Path(p) if p.path.is_ident("Some")) => {
                    let (outer, inner_p, body) = two_row_closure(&c.args[0])?;
                    let table_params = [outer, inner_p];
                    let scope = Scope { table_params: &table_params, query_params };
                    let proj = convert_projection(body, &scope)?;
                    quote! { Some(#proj) }
                }
                _ => return Err(err(&mc.args[3], "expected `None` or `Some(|outer, inner| projection)`")),
            };
            Ok(quote! { #prev.join(#inner, #outer_key, #inner_key, #result) })
        }
        "first" | "first_or_default" | "single" | "single_or_default" | "last" | "last_or_default" | "count" | "any" => {
            let pred = option_predicate(&mc.args[0], query_params)?;
            let call = quote::format_ident!("{}", method);
            Ok(quote! { #prev.#call(#pred) })
        }
        "all" => {
            let (table_param, body) = row_closure(&mc.args[0], None)?;
            let scope = Scope { table_params: &[table_param], query_params };
            let pred = convert_bool(body, &scope)?;
            Ok(quote! { #prev.all(#pred) })
        }
        "sum" | "average" | "min" | "max" => {
            let (table_param, body) = row_closure(&mc.args[0], None)?;
            let scope = Scope { table_params: &[table_param], query_params };
            let sel = convert_value(body, &scope)?;
            let call = quote::format_ident!("{}", method);
            Ok(quote! { #prev.#call(#sel) })
        }
        "contains" => {
            let scope = Scope { table_params: &[], query_params };
            let value = convert_value(&mc.args[0], &scope)?;
            Ok(quote! { #prev.contains(#value) })
        }
        "to_array" => Ok(quote! { #prev.to_array() }),
        "build" => Ok(quote! { #prev.build() }),
        other => Err(err(expr, format!("unsupported builder method `{other}`"))),
    }
}

/// `take`/`skip`'s count: a bare integer literal is `CountExpr::Literal`;
/// anything else (a parameter, or an arithmetic expression over parameters)
/// is `CountExpr::Expr`.
fn count_expr(expr: &Expr, query_params: &[syn::Ident]) -> syn::Result<TokenStream> {
    if let Expr::Lit(l) = unwrap_expr(expr) {
        if let syn::Lit::Int(i) = &l.lit {
            let v: i64 = i.base10_parse()?;
            return Ok(quote! { ::drizzle_core::generated::CountExpr::Literal(#v) });
        }
    }
    let scope = Scope { table_params: &[], query_params };
    let value = convert_value(expr, &scope)?;
    Ok(quote! { ::drizzle_core::generated::CountExpr::Expr(#value) })
}
