//! Converts a restricted `syn::Expr` into tokens that construct a
//! `drizzle_core::generated::BoolExpr` — the predicate half of the
//! expression-tree conversion. A `where` body, and every operand of
//! `&&`/`||`/`!`, always lands here rather than in `value::convert_value`.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{BinOp, Expr, Lit, UnOp};

use crate::ctx::{err, flatten_field_chain, unwrap_expr, Scope};
use crate::value::convert_value;

fn is_null_literal(expr: &Expr) -> bool {
    matches!(unwrap_expr(expr), Expr::Path(p) if p.path.is_ident("None"))
}

pub fn convert_bool(expr: &Expr, scope: &Scope) -> syn::Result<TokenStream> {
    let expr = unwrap_expr(expr);

    match expr {
        Expr::Lit(l) => match &l.lit {
            Lit::Bool(b) => {
                let v = b.value;
                Ok(quote! { ::drizzle_core::generated::BoolExpr::BooleanConstant(#v) })
            }
            _ => Err(err(expr, "only a boolean literal is valid in a predicate position")),
        },

        Expr::Field(_) | Expr::Path(_) => convert_boolean_member(expr, scope),

        Expr::Unary(u) if matches!(u.op, UnOp::Not(_)) => {
            let inner = convert_bool(&u.expr, scope)?;
            Ok(quote! { ::drizzle_core::generated::BoolExpr::Not(::std::boxed::Box::new(#inner)) })
        }

        Expr::Binary(b) => convert_binary(b, scope),

        Expr::MethodCall(mc) => convert_boolean_method(mc, scope),

        _ => Err(err(expr, "unsupported construct in a predicate position")),
    }
}

fn convert_binary(b: &syn::ExprBinary, scope: &Scope) -> syn::Result<TokenStream> {
    match b.op {
        BinOp::And(_) => {
            let left = convert_bool(&b.left, scope)?;
            let right = convert_bool(&b.right, scope)?;
            Ok(quote! { ::drizzle_core::generated::BoolExpr::Logical {
                op: ::drizzle_core::generated::LogicalOp::And,
                left: ::std::boxed::Box::new(#left),
                right: ::std::boxed::Box::new(#right),
            }})
        }
        BinOp::Or(_) => {
            let left = convert_bool(&b.left, scope)?;
            let right = convert_bool(&b.right, scope)?;
            Ok(quote! { ::drizzle_core::generated::BoolExpr::Logical {
                op: ::drizzle_core::generated::LogicalOp::Or,
                left: ::std::boxed::Box::new(#left),
                right: ::std::boxed::Box::new(#right),
            }})
        }
        BinOp::Eq(_) | BinOp::Ne(_) => {
            let negated = matches!(b.op, BinOp::Ne(_));
            if is_null_literal(&b.right) {
                let value = convert_value(&b.left, scope)?;
                return Ok(quote! { ::drizzle_core::generated::BoolExpr::IsNull { value: #value, negated: #negated } });
            }
            if is_null_literal(&b.left) {
                let value = convert_value(&b.right, scope)?;
                return Ok(quote! { ::drizzle_core::generated::BoolExpr::IsNull { value: #value, negated: #negated } });
            }
            let op = if negated {
                quote! { ::drizzle_core::generated::CmpOp::Ne }
            } else {
                quote! { ::drizzle_core::generated::CmpOp::Eq }
            };
            let left = convert_value(&b.left, scope)?;
            let right = convert_value(&b.right, scope)?;
            Ok(quote! { ::drizzle_core::generated::BoolExpr::Comparison { op: #op, left: #left, right: #right } })
        }
        BinOp::Gt(_) | BinOp::Ge(_) | BinOp::Lt(_) | BinOp::Le(_) => {
            let op = match b.op {
                BinOp::Gt(_) => quote! { ::drizzle_core::generated::CmpOp::Gt },
                BinOp::Ge(_) => quote! { ::drizzle_core::generated::CmpOp::Ge },
                BinOp::Lt(_) => quote! { ::drizzle_core::generated::CmpOp::Lt },
                _ => quote! { ::drizzle_core::generated::CmpOp::Le },
            };
            let left = convert_value(&b.left, scope)?;
            let right = convert_value(&b.right, scope)?;
            Ok(quote! { ::drizzle_core::generated::BoolExpr::Comparison { op: #op, left: #left, right: #right } })
        }
        _ => Err(err(&b.left, "unsupported operator in a predicate position")),
    }
}

/// A bare table column or query parameter appearing where a predicate is
/// expected is upcast to `BooleanColumn` / `BooleanParam`.
fn convert_boolean_member(expr: &Expr, scope: &Scope) -> syn::Result<TokenStream> {
    let (root, segments) = flatten_field_chain(expr)
        .ok_or_else(|| err(expr, "expected a field access on a table row or query parameter"))?;

    if let Some(_table_param) = scope.table_param(&root) {
        if segments.is_empty() {
            return Err(err(expr, "a bare table-row identifier is not a predicate; access a field on it"));
        }
        let name = segments.join(".");
        return Ok(quote! { ::drizzle_core::generated::BoolExpr::BooleanColumn { name: #name.into() } });
    }

    if scope.is_query_param(&root) {
        return Ok(match segments.as_slice() {
            [] => quote! { ::drizzle_core::generated::BoolExpr::BooleanParam { param: stringify!(#root).into(), property: None } },
            [prop] => quote! { ::drizzle_core::generated::BoolExpr::BooleanParam { param: stringify!(#root).into(), property: Some(#prop.into()) } },
            _ => return Err(err(expr, "query parameters support at most one property level")),
        });
    }

    Err(err(
        expr,
        format!("free identifier `{root}` is neither a table row nor a declared query parameter"),
    ))
}

fn convert_boolean_method(mc: &syn::ExprMethodCall, scope: &Scope) -> syn::Result<TokenStream> {
    let method = mc.method.to_string();
    match method.as_str() {
        "starts_with" | "ends_with" if mc.args.len() == 1 => {
            let object = convert_value(&mc.receiver, scope)?;
            let arg = convert_value(&mc.args[0], scope)?;
            let variant = if method == "starts_with" { quote! { StartsWith } } else { quote! { EndsWith } };
            Ok(quote! {
                ::drizzle_core::generated::BoolExpr::BooleanMethodCall {
                    object: #object,
                    method: ::drizzle_core::generated::BooleanMethod::#variant,
                    args: ::std::vec![#arg],
                }
            })
        }
        "icontains" if mc.args.len() == 1 => {
            let object = convert_value(&mc.receiver, scope)?;
            let arg = convert_value(&mc.args[0], scope)?;
            Ok(quote! {
                ::drizzle_core::generated::BoolExpr::BooleanMethodCall {
                    object: #object,
                    method: ::drizzle_core::generated::BooleanMethod::IContains,
                    args: ::std::vec![#arg],
                }
            })
        }
        "contains" if mc.args.len() == 1 => {
            let object = convert_value(&mc.receiver, scope)?;
            let arg = convert_value(&mc.args[0], scope)?;
            Ok(quote! {
                ::drizzle_core::generated::BoolExpr::BooleanMethodCall {
                    object: #object,
                    method: ::drizzle_core::generated::BooleanMethod::Contains,
                    args: ::std::vec![#arg],
                }
            })
        }
        "includes" if mc.args.len() == 1 => convert_includes(mc, scope),
        other => Err(err(&mc.method, format!("unsupported method call `{other}` in a predicate position"))),
    }
}

/// `array.includes(x)` is an `In` list when the receiver is an array literal
/// or a declared (array-valued) query parameter; otherwise the receiver is a
/// table column and this is substring containment (`BooleanMethod::Includes`).
fn convert_includes(mc: &syn::ExprMethodCall, scope: &Scope) -> syn::Result<TokenStream> {
    let receiver = unwrap_expr(&mc.receiver);
    let arg = convert_value(&mc.args[0], scope)?;

    match receiver {
        Expr::Array(arr) => {
            if arr.elems.is_empty() {
                return Ok(quote! { ::drizzle_core::generated::BoolExpr::BooleanConstant(false) });
            }
            let values = arr
                .elems
                .iter()
                .map(|e| convert_value(e, scope))
                .collect::<syn::Result<Vec<_>>>()?;
            Ok(quote! {
                ::drizzle_core::generated::BoolExpr::In {
                    value: #arg,
                    list: ::drizzle_core::generated::InList::Values(::std::vec![#(#values),*]),
                    negated: false,
                }
            })
        }
        _ => {
            if let Some((root, segments)) = flatten_field_chain(receiver) {
                if scope.is_query_param(&root) {
                    let key = match segments.as_slice() {
                        [] => quote! { ::drizzle_core::generated::param_bag_key(stringify!(#root), None) },
                        [prop] => quote! { ::drizzle_core::generated::param_bag_key(stringify!(#root), Some(#prop)) },
                        _ => return Err(err(receiver, "query parameters support at most one property level")),
                    };
                    return Ok(quote! {
                        ::drizzle_core::generated::BoolExpr::In {
                            value: #arg,
                            list: ::drizzle_core::generated::InList::Parameter(#key),
                            negated: false,
                        }
                    });
                }
            }
            let object = convert_value(receiver, scope)?;
            Ok(quote! {
                ::drizzle_core::generated::BoolExpr::BooleanMethodCall {
                    object: #object,
                    method: ::drizzle_core::generated::BooleanMethod::Includes,
                    args: ::std::vec![#arg],
                }
            })
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
        let params = vec![TableParam {
            ident: syn::parse_str(name).unwrap(),
            side: None,
        }];
        (params, Vec::new())
    }

    #[test]
    fn null_equality_lowers_to_is_null_without_negation() {
        let (table_params, query_params) = table_scope("u");
        let scope = Scope { table_params: &table_params, query_params: &query_params };
        let expr: Expr = parse_quote!(u.email == None);

        let got = convert_bool(&expr, &scope).unwrap();
        let want = quote! {
            ::drizzle_core::generated::BoolExpr::IsNull {
                value: ::drizzle_core::generated::ValueExpr::column("email"),
                negated: false
            }
        };
        assert_eq!(got.to_string(), want.to_string());
    }

    #[test]
    fn null_inequality_lowers_to_negated_is_null() {
        let (table_params, query_params) = table_scope("u");
        let scope = Scope { table_params: &table_params, query_params: &query_params };
        let expr: Expr = parse_quote!(u.email != None);

        let got = convert_bool(&expr, &scope).unwrap();
        let want = quote! {
            ::drizzle_core::generated::BoolExpr::IsNull {
                value: ::drizzle_core::generated::ValueExpr::column("email"),
                negated: true
            }
        };
        assert_eq!(got.to_string(), want.to_string());
    }

    #[test]
    fn null_on_left_hand_side_is_also_lowered() {
        let (table_params, query_params) = table_scope("u");
        let scope = Scope { table_params: &table_params, query_params: &query_params };
        let expr: Expr = parse_quote!(None == u.email);

        let got = convert_bool(&expr, &scope).unwrap();
        let want = quote! {
            ::drizzle_core::generated::BoolExpr::IsNull {
                value: ::drizzle_core::generated::ValueExpr::column("email"),
                negated: false
            }
        };
        assert_eq!(got.to_string(), want.to_string());
    }

    #[test]
    fn ordinary_equality_is_not_affected() {
        let (table_params, query_params) = table_scope("u");
        let scope = Scope { table_params: &table_params, query_params: &query_params };
        let expr: Expr = parse_quote!(u.age == 18);

        let got = convert_bool(&expr, &scope).unwrap();
        let text = got.to_string();
        assert!(text.contains("CmpOp") && text.contains("Eq"));
        assert!(!text.contains("IsNull"));
    }

    #[test]
    fn empty_array_includes_short_circuits_to_constant_false() {
        let (table_params, query_params) = table_scope("u");
        let scope = Scope { table_params: &table_params, query_params: &query_params };
        let expr: Expr = parse_quote!([].includes(u.id));

        let got = convert_bool(&expr, &scope).unwrap();
        let want = quote! { ::drizzle_core::generated::BoolExpr::BooleanConstant(false) };
        assert_eq!(got.to_string(), want.to_string());
    }
}
