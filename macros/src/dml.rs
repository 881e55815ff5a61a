//! `define_insert!` / `define_update!` / `define_delete!` — the non-chained
//! sibling surface. Each parses one `|q, params?| q.insert("t", Row {
//! ... }).returning(...).build()`-shaped expression (respectively `.update`,
//! `.delete`) into a call sequence against `drizzle_core::generated`'s
//! `Insertable` / `Updatable` / `Deletable`.
//!
//! Unlike `SELECT`, these don't project through a row closure for their own
//! leaf call — the struct-literal shorthand (`Row { col: expr, ... }`) plays
//! that role for `INSERT`; `UPDATE`/`DELETE` predicates still take a `|row|`
//! closure the same way `where_` does on the `SELECT` side.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Expr, Pat};

use crate::boolean::convert_bool;
use crate::ctx::{err, unwrap_expr, Scope, TableParam};
use crate::value::convert_value;

fn pat_ident(pat: &Pat) -> syn::Result<syn::Ident> {
    match pat {
        Pat::Ident(p) => Ok(p.ident.clone()),
        other => Err(syn::Error::new_spanned(other, "expected a plain identifier parameter")),
    }
}

fn unwrap_block(body: &Expr) -> syn::Result<&Expr> {
    match unwrap_expr(body) {
        Expr::Block(b) => match b.block.stmts.as_slice() {
            [syn::Stmt::Expr(e, None)] => Ok(e),
            _ => Err(err(body, "a macro body must be a single chained expression, not a statement sequence")),
        },
        other => Ok(other),
    }
}

fn row_predicate(expr: &Expr, query_params: &[syn::Ident]) -> syn::Result<TokenStream> {
    let Expr::Closure(c) = unwrap_expr(expr) else {
        return Err(err(expr, "expected a `|row| predicate` lambda"));
    };
    let mut inputs = c.inputs.iter();
    let ident = pat_ident(inputs.next().ok_or_else(|| err(expr, "expected one row parameter"))?)?;
    if inputs.next().is_some() {
        return Err(err(expr, "expected exactly one row parameter"));
    }
    let table_param = TableParam { ident, side: None };
    let scope = Scope { table_params: &[table_param], query_params };
    convert_bool(&c.body, &scope)
}

fn struct_columns(expr: &Expr, query_params: &[syn::Ident]) -> syn::Result<Vec<TokenStream>> {
    let Expr::Struct(s) = unwrap_expr(expr) else {
        return Err(err(expr, "expected a `Row { column: value, ... }` literal"));
    };
    if s.rest.is_some() {
        return Err(err(expr, "spread is not supported; list every column explicitly"));
    }
    let scope = Scope { table_params: &[], query_params };
    s.fields
        .iter()
        .map(|field| {
            let name = match &field.member {
                syn::Member::Named(ident) => ident.to_string(),
                syn::Member::Unnamed(_) => return Err(err(expr, "columns must be named")),
            };
            let value = convert_value(&field.expr, &scope)?;
            Ok(quote! { .value(#name, #value) })
        })
        .collect()
}

/// `None` ⇒ the chain is left unchanged (no `RETURNING`). `Some(Star)` /
/// `Some(|row| row.col)` / `Some(|row| Row { ... })` ⇒ a `.returning(...)`
/// call is appended.
fn returning_call(prev: TokenStream, expr: &Expr, query_params: &[syn::Ident]) -> syn::Result<TokenStream> {
    match unwrap_expr(expr) {
        Expr::Path(p) if p.path.is_ident("None") => Ok(prev),
        Expr::Call(c) if matches!(unwrap_expr(&c.func), Expr::Path(p) if p.path.is_ident("Some")) => {
            if c.args.len() != 1 {
                return Err(err(expr, "expected `Some(...)`"));
            }
            let inner = match unwrap_expr(&c.args[0]) {
                Expr::Path(p) if p.path.is_ident("Star") => {
                    Ok(quote! { ::drizzle_core::generated::Returning::Star })
                }
                Expr::Closure(closure) => {
                    let mut inputs = closure.inputs.iter();
                    let ident = pat_ident(inputs.next().ok_or_else(|| err(expr, "expected one row parameter"))?)?;
                    let table_param = TableParam { ident: ident.clone(), side: None };
                    let scope = Scope { table_params: &[table_param], query_params };
                    match unwrap_expr(&closure.body) {
                        Expr::Struct(s) => {
                            if s.rest.is_some() {
                                return Err(err(expr, "spread is not supported in RETURNING"));
                            }
                            let fields = s
                                .fields
                                .iter()
                                .map(|field| {
                                    let name = match &field.member {
                                        syn::Member::Named(ident) => ident.to_string(),
                                        syn::Member::Unnamed(_) => return Err(err(expr, "columns must be named")),
                                    };
                                    let value = convert_value(&field.expr, &scope)?;
                                    Ok(quote! { (#name.into(), #value) })
                                })
                                .collect::<syn::Result<Vec<_>>>()?;
                            Ok(quote! { ::drizzle_core::generated::Returning::Object(::std::vec![#(#fields),*]) })
                        }
                        body => {
                            let (root, segments) = crate::ctx::flatten_field_chain(body)
                                .ok_or_else(|| err(body, "expected a simple column reference"))?;
                            if root != ident || segments.len() != 1 {
                                return Err(err(body, "expected a simple column reference"));
                            }
                            let name = &segments[0];
                            Ok(quote! { ::drizzle_core::generated::Returning::Column(#name.into()) })
                        }
                    }
                }
                _ => Err(err(expr, "expected `Star` or a `|row| ...` lambda")),
            }?;
            Ok(quote! { #prev.returning(#inner) })
        }
        _ => Err(err(expr, "expected `None` or `Some(...)`")),
    }
}

fn signature(closure: &syn::ExprClosure) -> syn::Result<(syn::Ident, Vec<syn::Ident>)> {
    let mut inputs = closure.inputs.iter();
    let q_ident = pat_ident(inputs.next().ok_or_else(|| err(closure, "expected at least a `q` parameter"))?)?;
    let query_params = inputs.map(pat_ident).collect::<syn::Result<_>>()?;
    Ok((q_ident, query_params))
}

pub fn expand_insert(input: TokenStream) -> syn::Result<TokenStream> {
    let closure: syn::ExprClosure = syn::parse2(input)?;
    let (q_ident, query_params) = signature(&closure)?;
    let body = unwrap_block(&closure.body)?;

    let table: core::cell::RefCell<Option<TokenStream>> = core::cell::RefCell::new(None);
    let tokens = lower_dml(body, &q_ident, "insert", &mut |base, args| {
        if args.len() != 2 {
            return Err(err(base, "`insert` takes (table, Row { ... })"));
        }
        *table.borrow_mut() = Some(args[0].clone().into_token_stream());
        let columns = struct_columns(&args[1], &query_params)?;
        Ok(quote! { ::drizzle_core::generated::Insertable::new() #(#columns)* })
    }, &mut |method, mc, prev| match method {
        "returning" => returning_call(prev, &mc.args[0], &query_params),
        "build" => {
            let table = table.borrow().clone().ok_or_else(|| err(mc, "missing table name"))?;
            Ok(quote! { #prev.build(#table) })
        }
        other => Err(err(&mc.method, format!("unsupported method `{other}` on an INSERT chain"))),
    })?;
    Ok(quote! { { #tokens } })
}

pub fn expand_update(input: TokenStream) -> syn::Result<TokenStream> {
    let closure: syn::ExprClosure = syn::parse2(input)?;
    let (q_ident, query_params) = signature(&closure)?;
    let body = unwrap_block(&closure.body)?;

    let table: core::cell::RefCell<Option<TokenStream>> = core::cell::RefCell::new(None);
    let tokens = lower_dml(body, &q_ident, "update", &mut |base, args| {
        if args.len() != 1 {
            return Err(err(base, "`update` takes (table)"));
        }
        *table.borrow_mut() = Some(args[0].clone().into_token_stream());
        Ok(quote! { ::drizzle_core::generated::Updatable::new() })
    }, &mut |method, mc, prev| match method {
        "set" => {
            if mc.args.len() != 2 {
                return Err(err(mc, "`set` takes (column, value)"));
            }
            let Expr::Lit(syn::ExprLit { lit: syn::Lit::Str(col), .. }) = unwrap_expr(&mc.args[0]) else {
                return Err(err(&mc.args[0], "expected a string column name"));
            };
            let col = col.value();
            let scope = Scope { table_params: &[], query_params: &query_params };
            let value = convert_value(&mc.args[1], &scope)?;
            Ok(quote! { #prev.set(#col, #value) })
        }
        "where_" => {
            let pred = row_predicate(&mc.args[0], &query_params)?;
            Ok(quote! { #prev.where_(#pred) })
        }
        "allow_full_table_update" => Ok(quote! { #prev.allow_full_table_update() }),
        "build" => {
            let table = table.borrow().clone().ok_or_else(|| err(mc, "missing table name"))?;
            Ok(quote! { #prev.build(#table) })
        }
        other => Err(err(&mc.method, format!("unsupported method `{other}` on an UPDATE chain"))),
    })?;
    Ok(quote! { { #tokens } })
}

pub fn expand_delete(input: TokenStream) -> syn::Result<TokenStream> {
    let closure: syn::ExprClosure = syn::parse2(input)?;
    let (q_ident, query_params) = signature(&closure)?;
    let body = unwrap_block(&closure.body)?;

    let table: core::cell::RefCell<Option<TokenStream>> = core::cell::RefCell::new(None);
    let tokens = lower_dml(body, &q_ident, "delete", &mut |base, args| {
        if args.len() != 1 {
            return Err(err(base, "`delete` takes (table)"));
        }
        *table.borrow_mut() = Some(args[0].clone().into_token_stream());
        Ok(quote! { ::drizzle_core::generated::Deletable::new() })
    }, &mut |method, mc, prev| match method {
        "where_" => {
            let pred = row_predicate(&mc.args[0], &query_params)?;
            Ok(quote! { #prev.where_(#pred) })
        }
        "allow_full_table_delete" => Ok(quote! { #prev.allow_full_table_delete() }),
        "build" => {
            let table = table.borrow().clone().ok_or_else(|| err(mc, "missing table name"))?;
            Ok(quote! { #prev.build(#table) })
        }
        other => Err(err(&mc.method, format!("unsupported method `{other}` on a DELETE chain"))),
    })?;
    Ok(quote! { { #tokens } })
}

use quote::ToTokens;

/// Walks a method-call chain generically: `base_method` recognizes the
/// leaf call (`insert`/`update`/`delete`) and builds the starting
/// `Insertable`/`Updatable`/`Deletable`; `step` handles every call after it.
fn lower_dml(
    expr: &Expr,
    q_ident: &syn::Ident,
    base_method: &str,
    on_base: &mut dyn FnMut(&Expr, &syn::punctuated::Punctuated<Expr, syn::token::Comma>) -> syn::Result<TokenStream>,
    step: &mut dyn FnMut(&str, &syn::ExprMethodCall, TokenStream) -> syn::Result<TokenStream>,
) -> syn::Result<TokenStream> {
    let expr_unwrapped = unwrap_expr(expr);
    let Expr::MethodCall(mc) = expr_unwrapped else {
        return Err(err(expr, "expected a chained builder call"));
    };
    let method = mc.method.to_string();

    if method == base_method {
        let Expr::Path(recv) = unwrap_expr(&mc.receiver) else {
            return Err(err(&mc.receiver, "expected the query-root parameter"));
        };
        if !recv.path.is_ident(q_ident) {
            return Err(err(&mc.receiver, "expected the query-root parameter"));
        }
        return on_base(expr_unwrapped, &mc.args);
    }

    let prev = lower_dml(&mc.receiver, q_ident, base_method, on_base, step)?;
    step(&method, mc, prev)
}
