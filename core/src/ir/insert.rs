//! Statement shapes for the `INSERT` / `UPDATE` / `DELETE` sibling surface
//!. These are not operation-tree chains like `SELECT` — each is
//! a small, flat record the emitter lowers directly.

use alloc::vec::Vec;
use compact_str::CompactString;

use super::expr::{BoolExpr, ValueExpr};

/// What a `RETURNING` clause projects.
#[derive(Debug, Clone, PartialEq)]
pub enum Returning {
    /// `returning(u => u.id)` ⇒ `RETURNING "id"`.
    Column(CompactString),
    /// An object projection ⇒ `RETURNING "id" AS "id", "name" AS "name"`.
    Object(Vec<(CompactString, ValueExpr)>),
    /// `RETURNING *`.
    Star,
}

/// `INSERT INTO "t" (...) VALUES (...) [RETURNING ...]`.
///
/// Columns are carried in caller-specified insertion order.
/// Whether a column is ultimately emitted depends on whether its bound
/// parameter resolves to [`crate::ir::ParamValue::Undefined`] once the
/// caller's parameter bag is known — that decision is made
/// by the emitter, not here, since this struct is built before the bag is
/// merged in.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertStatement {
    pub table: CompactString,
    pub columns: Vec<(CompactString, ValueExpr)>,
    pub returning: Option<Returning>,
}

/// `UPDATE "t" SET ... WHERE ...`.
///
/// `allow_full_table` opts out of the missing-`WHERE` safety check
/// (symmetric with [`DeleteStatement::allow_full_table`]): an update with
/// no predicate is rejected unless the caller explicitly allows it.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateStatement {
    pub table: CompactString,
    pub assignments: Vec<(CompactString, ValueExpr)>,
    pub predicate: Option<BoolExpr>,
    pub allow_full_table: bool,
}

/// `DELETE FROM "t" [WHERE ...]`.
///
/// `allow_full_table` is set by `allowFullTableDelete()`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteStatement {
    pub table: CompactString,
    pub predicate: Option<BoolExpr>,
    pub allow_full_table: bool,
}
