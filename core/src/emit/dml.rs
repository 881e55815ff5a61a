//! `INSERT` / `UPDATE` / `DELETE` emission. These statements
//! aren't operation-tree chains, so each gets its own small, direct
//! lowering rather than going through [`super::select`]'s `Stage`.

use super::expr::{render_bool, render_value, ExprCtx};
use super::Emitter;
use crate::error::{DrizzleError, Result};
use crate::ir::{param_bag_key, DeleteStatement, InsertStatement, ParamBag, ParamValue, Returning, UpdateStatement, ValueExpr};
use crate::paramize::{check_bool_params_bound, check_value_params_bound, merge_params, parameterize_bool, parameterize_value, ParamCtx};
use crate::prelude::*;

/// Whether a column's value, once parameters are known, is
/// [`ParamValue::Undefined`] — such a column is omitted from the statement
/// entirely rather than set to SQL `NULL`.
fn resolves_to_undefined(expr: &ValueExpr, bag: &ParamBag) -> bool {
    match expr {
        ValueExpr::Parameter { param, property } => {
            let key = param_bag_key(param, property.as_deref());
            matches!(bag.get(key.as_str()), Some(ParamValue::Undefined))
        }
        _ => false,
    }
}

fn render_returning<E: Emitter>(returning: &Returning, ectx: &ExprCtx<E>, emitter: &E, sql: &mut String) -> Result<()> {
    sql.push_str(" RETURNING ");
    match returning {
        Returning::Star => sql.push('*'),
        Returning::Column(name) => emitter.quote_ident(name, sql),
        Returning::Object(fields) => {
            for (i, (alias, expr)) in fields.iter().enumerate() {
                if i > 0 {
                    sql.push_str(", ");
                }
                render_value(expr, ectx, sql)?;
                sql.push_str(" AS ");
                emitter.quote_ident(alias, sql);
            }
        }
    }
    Ok(())
}

/// Compiles an `INSERT INTO ... VALUES (...) [RETURNING ...]`.
pub fn compile_insert<E: Emitter>(stmt: &InsertStatement, caller_params: ParamBag, emitter: &E) -> Result<(String, ParamBag)> {
    let mut ctx = ParamCtx::new();
    let mut columns: Vec<(compact_str::CompactString, ValueExpr)> = stmt.columns.clone();
    for (_, value) in columns.iter_mut() {
        parameterize_value(value, &mut ctx);
    }
    let bag = merge_params(&caller_params, ctx.generated)?;

    for (_, value) in &columns {
        check_value_params_bound(value, &bag)?;
    }

    let included: Vec<&(compact_str::CompactString, ValueExpr)> = columns
        .iter()
        .filter(|(_, value)| !resolves_to_undefined(value, &bag))
        .collect();

    if included.is_empty() {
        return Err(DrizzleError::semantic(
            "insert-empty-values",
            "every column's value resolved to undefined; nothing to insert",
        ));
    }

    let ectx = ExprCtx::new(emitter);
    let mut sql = String::from("INSERT INTO ");
    emitter.quote_ident(&stmt.table, &mut sql);
    sql.push_str(" (");
    for (i, (col, _)) in included.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        emitter.quote_ident(col, &mut sql);
    }
    sql.push_str(") VALUES (");
    for (i, (_, value)) in included.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        render_value(value, &ectx, &mut sql)?;
    }
    sql.push(')');

    if let Some(returning) = &stmt.returning {
        render_returning(returning, &ectx, emitter, &mut sql)?;
    }

    crate::drizzle_trace_query!(&sql, bag.len());
    Ok((sql, bag))
}

/// Compiles an `UPDATE ... SET ... WHERE ...`.
pub fn compile_update<E: Emitter>(stmt: &UpdateStatement, caller_params: ParamBag, emitter: &E) -> Result<(String, ParamBag)> {
    if stmt.predicate.is_none() && !stmt.allow_full_table {
        return Err(DrizzleError::semantic(
            "missing-where",
            "update has no WHERE clause; call allowFullTableUpdate() to update every row intentionally",
        ));
    }

    let mut ctx = ParamCtx::new();
    let mut assignments = stmt.assignments.clone();
    for (_, value) in assignments.iter_mut() {
        parameterize_value(value, &mut ctx);
    }
    let mut predicate = stmt.predicate.clone();
    if let Some(p) = predicate.as_mut() {
        parameterize_bool(p, &mut ctx);
    }
    let bag = merge_params(&caller_params, ctx.generated)?;

    for (_, value) in &assignments {
        check_value_params_bound(value, &bag)?;
    }
    if let Some(p) = &predicate {
        check_bool_params_bound(p, &bag)?;
    }

    let ectx = ExprCtx::new(emitter);
    let mut sql = String::from("UPDATE ");
    emitter.quote_ident(&stmt.table, &mut sql);
    sql.push_str(" SET ");
    for (i, (col, value)) in assignments.iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        emitter.quote_ident(col, &mut sql);
        sql.push_str(" = ");
        render_value(value, &ectx, &mut sql)?;
    }

    if let Some(p) = &predicate {
        sql.push_str(" WHERE ");
        render_bool(p, &ectx, &mut sql)?;
    }

    crate::drizzle_trace_query!(&sql, bag.len());
    Ok((sql, bag))
}

/// Compiles a `DELETE FROM ... WHERE ...`.
pub fn compile_delete<E: Emitter>(stmt: &DeleteStatement, caller_params: ParamBag, emitter: &E) -> Result<(String, ParamBag)> {
    if stmt.predicate.is_none() && !stmt.allow_full_table {
        return Err(DrizzleError::semantic(
            "missing-where",
            "delete has no WHERE clause; call allowFullTableDelete() to delete every row intentionally",
        ));
    }

    let mut ctx = ParamCtx::new();
    let mut predicate = stmt.predicate.clone();
    if let Some(p) = predicate.as_mut() {
        parameterize_bool(p, &mut ctx);
    }
    let bag = merge_params(&caller_params, ctx.generated)?;

    if let Some(p) = &predicate {
        check_bool_params_bound(p, &bag)?;
    }

    let ectx = ExprCtx::new(emitter);
    let mut sql = String::from("DELETE FROM ");
    emitter.quote_ident(&stmt.table, &mut sql);
    if let Some(p) = &predicate {
        sql.push_str(" WHERE ");
        render_bool(p, &ectx, &mut sql)?;
    }

    crate::drizzle_trace_query!(&sql, bag.len());
    Ok((sql, bag))
}
