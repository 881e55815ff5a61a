//! Converts a restricted `syn::Expr` into tokens that construct a
//! `drizzle_core::generated::ValueExpr` (or `Projection`), the value half of
//! the expression-tree conversion this crate performs at macro-expansion
//! time instead of at runtime.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{BinOp, Expr, Lit};

use crate::ctx::{err, flatten_field_chain, unwrap_expr, Scope, Side};

fn side_tokens(side: Side) -> TokenStream {
    match side {
        Side::Outer => quote! { ::drizzle_core::generated::JoinSide::Outer },
        Side::Inner => quote! { ::drizzle_core::generated::JoinSide::Inner },
    }
}

/// A syntactic best-effort at the string-valued-identifier heuristic: looks
/// at the expression's own shape rather than any runtime type, since this
/// whole pass runs before the row type is known.
fn looks_stringy(expr: &Expr, scope: &Scope) -> bool {
    let expr = unwrap_expr(expr);
    match expr {
        Expr::Lit(l) => matches!(l.lit, Lit::Str(_)),
        Expr::Binary(b) if matches!(b.op, BinOp::Add(_)) => true,
        _ => {
            if let Some((root, segments)) = flatten_field_chain(expr) {
                let name = segments.last().cloned().unwrap_or_else(|| root.to_string());
                drizzle_types::looks_like_string_column(&name)
            } else {
                false
            }
        }
    }
}

pub fn convert_value(expr: &Expr, scope: &Scope) -> syn::Result<TokenStream> {
    let expr = unwrap_expr(expr);

    if let Some(ts) = try_convert_window(expr, scope)? {
        return Ok(ts);
    }

    match expr {
        Expr::Lit(l) => convert_literal(l),

        Expr::Path(p) if p.path.is_ident("None") => Ok(quote! { ::drizzle_core::generated::ValueExpr::null() }),

        Expr::Field(_) | Expr::Path(_) => convert_member(expr, scope),

        Expr::Binary(b) => {
            let left = convert_value(&b.left, scope)?;
            let right = convert_value(&b.right, scope)?;
            match b.op {
                BinOp::Add(_) => {
                    if looks_stringy(&b.left, scope) || looks_stringy(&b.right, scope) {
                        Ok(quote! {
                            ::drizzle_core::generated::ValueExpr::Concat {
                                left: ::std::boxed::Box::new(#left),
                                right: ::std::boxed::Box::new(#right),
                            }
                        })
                    } else {
                        arithmetic(quote! { ::drizzle_core::generated::ArithOp::Add }, left, right)
                    }
                }
                BinOp::Sub(_) => arithmetic(quote! { ::drizzle_core::generated::ArithOp::Sub }, left, right),
                BinOp::Mul(_) => arithmetic(quote! { ::drizzle_core::generated::ArithOp::Mul }, left, right),
                BinOp::Div(_) => arithmetic(quote! { ::drizzle_core::generated::ArithOp::Div }, left, right),
                BinOp::Rem(_) => arithmetic(quote! { ::drizzle_core::generated::ArithOp::Mod }, left, right),
                _ => Err(err(expr, "unsupported operator in a value position")),
            }
        }

        Expr::MethodCall(mc) => {
            let method = mc.method.to_string();
            match method.as_str() {
                "unwrap_or" if mc.args.len() == 1 => {
                    let value = convert_value(&mc.receiver, scope)?;
                    let default = convert_value(&mc.args[0], scope)?;
                    Ok(quote! {
                        ::drizzle_core::generated::ValueExpr::Coalesce {
                            value: ::std::boxed::Box::new(#value),
                            default: ::std::boxed::Box::new(#default),
                        }
                    })
                }
                "to_lowercase" | "to_uppercase" | "trim" if mc.args.is_empty() => {
                    let object = convert_value(&mc.receiver, scope)?;
                    let variant = match method.as_str() {
                        "to_lowercase" => quote! { ToLowerCase },
                        "to_uppercase" => quote! { ToUpperCase },
                        _ => quote! { Trim },
                    };
                    Ok(quote! {
                        ::drizzle_core::generated::ValueExpr::StringMethodCall {
                            object: ::std::boxed::Box::new(#object),
                            method: ::drizzle_core::generated::StringMethod::#variant,
                        }
                    })
                }
                other => Err(err(expr, format!("unsupported method call `{other}` in a value position"))),
            }
        }

        _ => Err(err(expr, "unsupported construct in a value position")),
    }
}

fn arithmetic(op: TokenStream, left: TokenStream, right: TokenStream) -> syn::Result<TokenStream> {
    Ok(quote! {
        ::drizzle_core::generated::ValueExpr::Arithmetic {
            op: #op,
            left: ::std::boxed::Box::new(#left),
            right: ::std::boxed::Box::new(#right),
        }
    })
}

fn convert_literal(lit: &syn::ExprLit) -> syn::Result<TokenStream> {
    match &lit.lit {
        Lit::Int(i) => {
            let v: f64 = i.base10_parse::<i64>().map_err(|e| syn::Error::new_spanned(i, e))? as f64;
            Ok(quote! { ::drizzle_core::generated::ValueExpr::number(#v) })
        }
        Lit::Float(f) => {
            let v: f64 = f.base10_parse().map_err(|e| syn::Error::new_spanned(f, e))?;
            Ok(quote! { ::drizzle_core::generated::ValueExpr::number(#v) })
        }
        Lit::Str(s) => {
            let v = s.value();
            Ok(quote! { ::drizzle_core::generated::ValueExpr::string(#v) })
        }
        Lit::Bool(b) => {
            let v = b.value;
            Ok(quote! { ::drizzle_core::generated::ValueExpr::boolean(#v) })
        }
        other => Err(syn::Error::new_spanned(other, "unsupported literal kind")),
    }
}

/// Resolves a bare identifier or field-access chain against the two name
/// sets in scope: a table parameter's member access is a `Column`, a query
/// parameter's is a `Parameter`. Anything else is the one hard error every
/// free-identifier reference reduces to.
fn convert_member(expr: &Expr, scope: &Scope) -> syn::Result<TokenStream> {
    let (root, segments) = flatten_field_chain(expr)
        .ok_or_else(|| err(expr, "expected a field access on a table row or query parameter"))?;

    if let Some(table_param) = scope.table_param(&root) {
        if segments.is_empty() {
            return Err(err(expr, "a bare table-row identifier is not a value; access a field on it"));
        }
        let name = segments.join(".");
        return Ok(match table_param.side {
            Some(side) => {
                let side = side_tokens(side);
                quote! { ::drizzle_core::generated::ValueExpr::JoinColumn { side: #side, name: #name.into() } }
            }
            None => quote! { ::drizzle_core::generated::ValueExpr::column(#name) },
        });
    }

    if scope.is_query_param(&root) {
        return Ok(match segments.as_slice() {
            [] => quote! { ::drizzle_core::generated::ValueExpr::param(stringify!(#root)) },
            [prop] => quote! { ::drizzle_core::generated::ValueExpr::param_prop(stringify!(#root), #prop) },
            _ => return Err(err(expr, "query parameters support at most one property level")),
        });
    }

    Err(err(
        expr,
        format!(
            "free identifier `{root}` is neither a table row nor a declared query parameter"
        ),
    ))
}

/// `helpers.window(row).partition_by(...).order_by(...).row_number()` and
/// siblings — recognized by walking the method-call chain from the
/// outermost aggregate kind back down to the `helpers.window(...)` root.
/// Returns `Ok(None)` when `expr` isn't shaped like a window chain at all,
/// so the caller falls through to the ordinary conversion rules.
fn try_convert_window(expr: &Expr, scope: &Scope) -> syn::Result<Option<TokenStream>> {
    let Expr::MethodCall(agg) = expr else { return Ok(None) };
    let kind = match agg.method.to_string().as_str() {
        "row_number" => quote! { ::drizzle_core::generated::WindowKind::RowNumber },
        "rank" => quote! { ::drizzle_core::generated::WindowKind::Rank },
        "dense_rank" => quote! { ::drizzle_core::generated::WindowKind::DenseRank },
        _ => return Ok(None),
    };

    let mut partition_by = Vec::new();
    let mut order_by = Vec::new();
    let mut cursor: &Expr = &agg.receiver;
    loop {
        match unwrap_expr(cursor) {
            Expr::MethodCall(mc) if mc.method == "partition_by" => {
                for arg in &mc.args {
                    partition_by.push(convert_value(arg, scope)?);
                }
                cursor = &mc.receiver;
            }
            Expr::MethodCall(mc) if mc.method == "order_by" => {
                for arg in &mc.args {
                    let Expr::Tuple(t) = unwrap_expr(arg) else {
                        return Err(err(arg, "window order_by expects (key, Direction) tuples"));
                    };
                    if t.elems.len() != 2 {
                        return Err(err(arg, "window order_by expects (key, Direction) tuples"));
                    }
                    let key = convert_value(&t.elems[0], scope)?;
                    let Expr::Path(dir_path) = unwrap_expr(&t.elems[1]) else {
                        return Err(err(&t.elems[1], "expected `Asc` or `Desc`"));
                    };
                    let dir_ident = dir_path
                        .path
                        .get_ident()
                        .ok_or_else(|| err(&t.elems[1], "expected `Asc` or `Desc`"))?;
                    order_by.push(quote! { (#key, ::drizzle_core::generated::Direction::#dir_ident) });
                }
                cursor = &mc.receiver;
            }
            Expr::MethodCall(mc) if mc.method == "window" => {
                let Expr::Path(root) = unwrap_expr(&mc.receiver) else {
                    return Err(err(&mc.receiver, "expected `helpers.window(...)`"));
                };
                if !root.path.is_ident("helpers") {
                    return Err(err(&mc.receiver, "window functions are only reachable via `helpers.window(...)`"));
                }
                break;
            }
            other => return Err(err(other, "malformed window-function chain")),
        }
    }

    Ok(Some(quote! {
        ::drizzle_core::generated::ValueExpr::Window {
            kind: #kind,
            partition_by: ::std::vec![#(#partition_by),*],
            order_by: ::std::vec![#(#order_by),*],
        }
    }))
}

/// `select(|u| ({ a: u.a, b: u.b }))` ⇒ `Projection::Object`; any other
/// expression ⇒ `Projection::Value`. Spread (`..row`) is not supported:
/// every column that should appear in the projection must be named.
pub fn convert_projection(expr: &Expr, scope: &Scope) -> syn::Result<TokenStream> {
    let expr = unwrap_expr(expr);
    match expr {
        Expr::Struct(s) => {
            if s.rest.is_some() {
                return Err(err(expr, "spread projections are not supported; list every column explicitly"));
            }
            let mut fields = Vec::new();
            for field in &s.fields {
                let name = match &field.member {
                    syn::Member::Named(ident) => ident.to_string(),
                    syn::Member::Unnamed(_) => return Err(err(expr, "projection fields must be named")),
                };
                let value = convert_value(&field.expr, scope)?;
                fields.push(quote! { (#name.into(), #value) });
            }
            Ok(quote! { ::drizzle_core::generated::Projection::Object(::std::vec![#(#fields),*]) })
        }
        _ => {
            let value = convert_value(expr, scope)?;
            Ok(quote! { ::drizzle_core::generated::Projection::Value(#value) })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ctx::TableParam;
    use syn::parse_quote;
    use syn::Ident;

    fn table_scope(name: &str) -> (Vec<TableParam>, Vec<Ident>) {
        let params = vec![TableParam { ident: syn::parse_str(name).unwrap(), side: None }];
        (params, Vec::new())
    }

    fn param_scope(name: &str) -> (Vec<TableParam>, Vec<Ident>) {
        (Vec::new(), vec![syn::parse_str(name).unwrap()])
    }

    #[test]
    fn table_member_access_resolves_to_a_column() {
        let (table_params, query_params) = table_scope("u");
        let scope = Scope { table_params: &table_params, query_params: &query_params };
        let expr: Expr = parse_quote!(u.age);

        let got = convert_value(&expr, &scope).unwrap();
        let want = quote! { ::drizzle_core::generated::ValueExpr::column("age") };
        assert_eq!(got.to_string(), want.to_string());
    }

    #[test]
    fn query_param_member_access_resolves_to_a_bound_parameter() {
        let (table_params, query_params) = param_scope("p");
        let scope = Scope { table_params: &table_params, query_params: &query_params };
        let expr: Expr = parse_quote!(p.min_age);

        let got = convert_value(&expr, &scope).unwrap();
        let want = quote! { ::drizzle_core::generated::ValueExpr::param_prop(stringify!(p), "min_age") };
        assert_eq!(got.to_string(), want.to_string());
    }

    #[test]
    fn bare_query_param_resolves_without_a_property() {
        let (table_params, query_params) = param_scope("p");
        let scope = Scope { table_params: &table_params, query_params: &query_params };
        let expr: Expr = parse_quote!(p);

        let got = convert_value(&expr, &scope).unwrap();
        let want = quote! { ::drizzle_core::generated::ValueExpr::param(stringify!(p)) };
        assert_eq!(got.to_string(), want.to_string());
    }

    #[test]
    fn string_concatenation_lowers_to_concat_not_arithmetic() {
        let (table_params, query_params) = table_scope("u");
        let scope = Scope { table_params: &table_params, query_params: &query_params };
        let expr: Expr = parse_quote!(u.firstName + u.lastName);

        let got = convert_value(&expr, &scope).unwrap().to_string();
        assert!(got.contains("Concat"));
        assert!(!got.contains("Arithmetic"));
    }

    #[test]
    fn numeric_addition_lowers_to_arithmetic() {
        let (table_params, query_params) = table_scope("u");
        let scope = Scope { table_params: &table_params, query_params: &query_params };
        let expr: Expr = parse_quote!(u.age + 1);

        let got = convert_value(&expr, &scope).unwrap().to_string();
        assert!(got.contains("Arithmetic"));
        assert!(got.contains("ArithOp") && got.contains("Add"));
    }

    #[test]
    fn struct_projection_rejects_spread() {
        let (table_params, query_params) = table_scope("u");
        let scope = Scope { table_params: &table_params, query_params: &query_params };
        let expr: Expr = parse_quote!(Row { age: u.age, ..base });

        assert!(convert_projection(&expr, &scope).is_err());
    }
}
