//! Expression-to-SQL rendering, shared by every clause and every dialect.

use super::{Emitter, JOIN_INNER_ALIAS, JOIN_OUTER_ALIAS};
use crate::error::{DrizzleError, Result};
use crate::ir::{
    param_bag_key, ArithOp, BoolExpr, BooleanMethod, CastType, CmpOp, InList, JoinSide,
    LiteralValue, LogicalOp, StringMethod, ValueExpr, WindowKind,
};
use crate::prelude::*;

/// Rendering context threaded through every expression. `join_sides` is
/// `Some` only while rendering a `join`'s result projection, where a bare
/// [`ValueExpr::Column`] resolves to the outer side and
/// [`ValueExpr::JoinColumn`] picks explicitly.
pub struct ExprCtx<'e, E: Emitter> {
    pub emitter: &'e E,
    pub join_sides: bool,
}

impl<'e, E: Emitter> ExprCtx<'e, E> {
    pub fn new(emitter: &'e E) -> Self {
        ExprCtx {
            emitter,
            join_sides: false,
        }
    }

    pub fn in_join(emitter: &'e E) -> Self {
        ExprCtx {
            emitter,
            join_sides: true,
        }
    }
}

fn qualify(alias: &str, name: &str, emitter: &impl Emitter, out: &mut String) {
    out.push('"');
    out.push_str(alias);
    out.push_str("\".");
    emitter.quote_ident(name, out);
}

pub fn render_value<E: Emitter>(expr: &ValueExpr, ctx: &ExprCtx<E>, out: &mut String) -> Result<()> {
    match expr {
        ValueExpr::Column { name } => {
            if ctx.join_sides {
                qualify(JOIN_OUTER_ALIAS, name, ctx.emitter, out);
            } else {
                ctx.emitter.quote_ident(name, out);
            }
        }
        ValueExpr::JoinColumn { side, name } => {
            if !ctx.join_sides {
                return Err(DrizzleError::semantic(
                    "join-column-outside-join",
                    "a join-side column reference only resolves inside a join's result projection",
                ));
            }
            let alias = match side {
                JoinSide::Outer => JOIN_OUTER_ALIAS,
                JoinSide::Inner => JOIN_INNER_ALIAS,
            };
            qualify(alias, name, ctx.emitter, out);
        }
        ValueExpr::Constant { value, .. } => render_literal(value, out),
        ValueExpr::Parameter { param, property } => {
            let key = param_bag_key(param, property.as_deref());
            ctx.emitter.write_placeholder(&key, out);
        }
        ValueExpr::Arithmetic { op, left, right } => {
            out.push('(');
            render_value(left, ctx, out)?;
            out.push_str(match op {
                ArithOp::Add => " + ",
                ArithOp::Sub => " - ",
                ArithOp::Mul => " * ",
                ArithOp::Div => " / ",
                ArithOp::Mod => " % ",
            });
            render_value(right, ctx, out)?;
            out.push(')');
        }
        ValueExpr::Concat { left, right } => {
            out.push('(');
            render_value(left, ctx, out)?;
            out.push_str(" || ");
            render_value(right, ctx, out)?;
            out.push(')');
        }
        ValueExpr::Coalesce { value, default } => {
            out.push_str("COALESCE(");
            render_value(value, ctx, out)?;
            out.push_str(", ");
            render_value(default, ctx, out)?;
            out.push(')');
        }
        ValueExpr::Case { when, then, els } => {
            out.push_str("CASE WHEN ");
            render_bool(when, ctx, out)?;
            out.push_str(" THEN ");
            render_value(then, ctx, out)?;
            out.push_str(" ELSE ");
            render_value(els, ctx, out)?;
            out.push_str(" END");
        }
        ValueExpr::Cast { value, target } => {
            out.push_str("CAST(");
            render_value(value, ctx, out)?;
            out.push_str(" AS ");
            out.push_str(cast_type_sql(*target));
            out.push(')');
        }
        ValueExpr::StringMethodCall { object, method } => {
            let func = match method {
                StringMethod::ToLowerCase => "LOWER",
                StringMethod::ToUpperCase => "UPPER",
                StringMethod::Trim => "TRIM",
            };
            out.push_str(func);
            out.push('(');
            render_value(object, ctx, out)?;
            out.push(')');
        }
        ValueExpr::Window {
            kind,
            partition_by,
            order_by,
        } => {
            out.push_str(match kind {
                WindowKind::RowNumber => "ROW_NUMBER()",
                WindowKind::Rank => "RANK()",
                WindowKind::DenseRank => "DENSE_RANK()",
            });
            out.push_str(" OVER (");
            if !partition_by.is_empty() {
                out.push_str("PARTITION BY ");
                for (i, p) in partition_by.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    render_value(p, ctx, out)?;
                }
            }
            if !order_by.is_empty() {
                if !partition_by.is_empty() {
                    out.push(' ');
                }
                out.push_str("ORDER BY ");
                for (i, (key, dir)) in order_by.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    render_value(key, ctx, out)?;
                    out.push_str(match dir {
                        crate::ir::Direction::Asc => " ASC",
                        crate::ir::Direction::Desc => " DESC",
                    });
                }
            }
            out.push(')');
        }
    }
    Ok(())
}

fn cast_type_sql(target: CastType) -> &'static str {
    match target {
        CastType::Integer => "INTEGER",
        CastType::Real => "REAL",
        CastType::Text => "TEXT",
        CastType::Boolean => "BOOLEAN",
    }
}

/// Renders a literal inline. Past the auto-parameterization pass the only
/// literal that should reach here is `null`; the others are rendered
/// defensively for an `Operation` tree built by hand and emitted without
/// running `paramize` first.
fn render_literal(value: &LiteralValue, out: &mut String) {
    match value {
        LiteralValue::Null => out.push_str("NULL"),
        LiteralValue::Boolean(b) => out.push_str(if *b { "TRUE" } else { "FALSE" }),
        LiteralValue::Number(n) => out.push_str(&format!("{n}")),
        LiteralValue::String(s) => {
            out.push('\'');
            out.push_str(&s.replace('\'', "''"));
            out.push('\'');
        }
    }
}

pub fn render_bool<E: Emitter>(expr: &BoolExpr, ctx: &ExprCtx<E>, out: &mut String) -> Result<()> {
    match expr {
        BoolExpr::Comparison { op, left, right } => {
            render_value(left, ctx, out)?;
            out.push_str(match op {
                CmpOp::Eq => " = ",
                CmpOp::Ne => " <> ",
                CmpOp::Gt => " > ",
                CmpOp::Ge => " >= ",
                CmpOp::Lt => " < ",
                CmpOp::Le => " <= ",
            });
            render_value(right, ctx, out)?;
        }
        BoolExpr::Logical { op, left, right } => {
            out.push('(');
            render_bool(left, ctx, out)?;
            out.push_str(match op {
                LogicalOp::And => " AND ",
                LogicalOp::Or => " OR ",
            });
            render_bool(right, ctx, out)?;
            out.push(')');
        }
        BoolExpr::Not(inner) => {
            out.push_str("NOT (");
            render_bool(inner, ctx, out)?;
            out.push(')');
        }
        BoolExpr::BooleanColumn { name } => {
            if ctx.join_sides {
                qualify(JOIN_OUTER_ALIAS, name, ctx.emitter, out);
            } else {
                ctx.emitter.quote_ident(name, out);
            }
        }
        BoolExpr::BooleanConstant(b) => out.push_str(if *b { "TRUE" } else { "FALSE" }),
        BoolExpr::BooleanParam { param, property } => {
            let key = param_bag_key(param, property.as_deref());
            ctx.emitter.write_placeholder(&key, out);
        }
        BoolExpr::BooleanMethodCall { object, method, args } => render_boolean_method(object, *method, args, ctx, out)?,
        BoolExpr::In { value, list, negated } => {
            render_value(value, ctx, out)?;
            out.push_str(if *negated { " NOT IN (" } else { " IN (" });
            match list {
                InList::Values(values) => {
                    for (i, v) in values.iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        render_value(v, ctx, out)?;
                    }
                }
                InList::Parameter(name) => {
                    // The array's per-element slots (`name_0`, `name_1`, …)
                    // were allocated by `ParamCtx::expand_array` when this
                    // node's count was known; the emitter just
                    // needs that count, carried alongside in the bag by the
                    // caller of `compile_select`.
                    return Err(DrizzleError::unsupported(
                        "In::Parameter",
                        format!(
                            "emitting a parameter-bound `In` list (`{name}`) requires its expanded element count; call `expand_in_list` before `compile_select`"
                        ),
                    ));
                }
            }
            out.push(')');
        }
        BoolExpr::IsNull { value, negated } => {
            render_value(value, ctx, out)?;
            out.push_str(if *negated { " IS NOT NULL" } else { " IS NULL" });
        }
    }
    Ok(())
}

fn render_boolean_method<E: Emitter>(
    object: &ValueExpr,
    method: BooleanMethod,
    args: &[ValueExpr],
    ctx: &ExprCtx<E>,
    out: &mut String,
) -> Result<()> {
    match method {
        BooleanMethod::StartsWith => {
            render_value(object, ctx, out)?;
            out.push_str(" LIKE ");
            render_like_pattern(args, ctx, out, "", "%")
        }
        BooleanMethod::EndsWith => {
            render_value(object, ctx, out)?;
            out.push_str(" LIKE ");
            render_like_pattern(args, ctx, out, "%", "")
        }
        BooleanMethod::Includes => {
            render_value(object, ctx, out)?;
            out.push_str(" LIKE ");
            render_like_pattern(args, ctx, out, "%", "%")
        }
        BooleanMethod::IContains => {
            out.push_str("LOWER(");
            render_value(object, ctx, out)?;
            out.push_str(") LIKE LOWER(");
            render_like_pattern(args, ctx, out, "%", "%")?;
            out.push(')');
            return Ok(());
        }
        BooleanMethod::Contains => {
            render_value(
                args.first().ok_or_else(|| {
                    DrizzleError::semantic("boolean-method-arity", "contains(...) takes exactly one argument")
                })?,
                ctx,
                out,
            )?;
            out.push_str(" IN (SELECT ");
            // `collection.contains(item)` only reaches here for a column or
            // subquery collection, never a literal array (those lower to
            // `In` at conversion time) — emitted as a correlated membership
            // test against the object expression.
            render_value(object, ctx, out)?;
            out.push(')');
            return Ok(());
        }
    }
}

/// Renders `LIKE 'prefix' || ? || 'suffix'` for the allowlisted
/// string-containment helpers, concatenating the literal wildcard markers
/// around the (already-parameterized) needle argument rather than baking
/// `%` into the bound value.
fn render_like_pattern<E: Emitter>(
    args: &[ValueExpr],
    ctx: &ExprCtx<E>,
    out: &mut String,
    prefix: &str,
    suffix: &str,
) -> Result<()> {
    let needle = args
        .first()
        .ok_or_else(|| DrizzleError::semantic("boolean-method-arity", "string predicate takes exactly one argument"))?;
    if prefix.is_empty() {
        render_value(needle, ctx, out)?;
        out.push_str(" || '");
        out.push_str(suffix);
        out.push('\'');
    } else if suffix.is_empty() {
        out.push('\'');
        out.push_str(prefix);
        out.push_str("' || ");
        render_value(needle, ctx, out)?;
    } else {
        out.push('\'');
        out.push_str(prefix);
        out.push_str("' || ");
        render_value(needle, ctx, out)?;
        out.push_str(" || '");
        out.push_str(suffix);
        out.push('\'');
    }
    Ok(())
}
