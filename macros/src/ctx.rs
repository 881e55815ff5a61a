//! Shared bookkeeping for the lambda-body converters: which identifiers are
//! table parameters (member access ⇒ a column) versus declared query
//! parameters (member access ⇒ a bound parameter), mirroring the two name
//! sets a `ConversionContext` tracks at runtime in the source system this
//! crate's sibling `drizzle-core` implements — here resolved once, at macro
//! expansion, instead of on every call.

use syn::{Expr, Ident};

/// Which side of a `join` a table parameter belongs to, if any. `None` for
/// every non-join context (a bare `Column`, not a `JoinColumn`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Outer,
    Inner,
}

/// A table parameter in scope for the lambda currently being converted,
/// e.g. `u` in `|u| u.age >= 18`.
#[derive(Debug, Clone)]
pub struct TableParam {
    pub ident: Ident,
    pub side: Option<Side>,
}

/// The two name sets in scope while converting one lambda body.
pub struct Scope<'a> {
    pub table_params: &'a [TableParam],
    pub query_params: &'a [Ident],
}

impl<'a> Scope<'a> {
    pub fn table_param(&self, ident: &Ident) -> Option<&TableParam> {
        self.table_params.iter().find(|p| &p.ident == ident)
    }

    pub fn is_query_param(&self, ident: &Ident) -> bool {
        self.query_params.iter().any(|p| p == ident)
    }
}

/// Flattens a (possibly nested) field-access chain rooted at a plain
/// identifier into `(root, ["a", "b", ...])`, e.g. `x.a.b` ⇒ `(x, [a, b])`.
/// Returns `None` for anything else (indexed access, method calls, ...).
pub fn flatten_field_chain(expr: &Expr) -> Option<(Ident, Vec<String>)> {
    match expr {
        Expr::Path(p) => {
            let ident = p.path.get_ident()?.clone();
            Some((ident, Vec::new()))
        }
        Expr::Field(f) => {
            let (root, mut segments) = flatten_field_chain(&f.base)?;
            let name = match &f.member {
                syn::Member::Named(ident) => ident.to_string(),
                syn::Member::Unnamed(_) => return None,
            };
            segments.push(name);
            Some((root, segments))
        }
        Expr::Paren(p) => flatten_field_chain(&p.expr),
        Expr::Group(g) => flatten_field_chain(&g.expr),
        _ => None,
    }
}

/// Unwraps `(...)` / token-group wrapping that `syn` sometimes preserves
/// around a sub-expression, so every converter can match on the expression's
/// real shape without repeating this case everywhere.
pub fn unwrap_expr(mut expr: &Expr) -> &Expr {
    loop {
        expr = match expr {
            Expr::Paren(p) => &p.expr,
            Expr::Group(g) => &g.expr,
            _ => return expr,
        };
    }
}

pub fn err(expr: impl quote::ToTokens, message: impl core::fmt::Display) -> syn::Error {
    syn::Error::new_spanned(expr, message)
}
