//! The fluent builder surface. Method names correspond 1:1 to
//! operation nodes. Builder calls do not execute
//! anything; they wrap the predecessor in a fresh, immutable node.
//!
//! `drizzle-macros`-generated code is the only intended caller of most of
//! these methods — a hand lambda body is converted into a chain of these
//! calls at macro-expansion time (see crate docs). The
//! surface is public so a caller can also build an operation tree directly,
//! bypassing the macro's parsing stage entirely.
//!
//! `thenBy` without a prior `orderBy` is rejected at compile time by typing
//! [`Queryable`] over an `Ordering` marker: [`ThenByExt`] is only
//! implemented for `Queryable<Ordered>`.

use crate::ir::{BoolExpr, CountExpr, Direction, Operation, Projection, Terminal, ValueExpr};
use crate::prelude::*;
use core::marker::PhantomData;

/// Type-state marker: no ordering has been established yet.
#[derive(Debug, Clone, Copy)]
pub struct Unordered;
/// Type-state marker: an `orderBy`/`orderByDescending` is in scope, so
/// `thenBy`/`thenByDescending` are legal.
#[derive(Debug, Clone, Copy)]
pub struct Ordered;

/// A builder chain under construction. `M` is the ordering type-state
/// marker ([`Unordered`] or [`Ordered`]); it has no runtime representation.
#[derive(Debug, Clone)]
pub struct Queryable<M = Unordered> {
    op: Operation,
    _marker: PhantomData<M>,
}

impl Queryable<Unordered> {
    /// `from(table)` — the leaf of the operation tree. `table` may be
    /// `schema.table`.
    pub fn from(table: impl Into<compact_str::CompactString>) -> Self {
        Queryable {
            op: Operation::From { table: table.into() },
            _marker: PhantomData,
        }
    }

    /// Builds directly from a pre-existing operation subtree — used by
    /// `join`'s inner source and by `union`'s second operand.
    pub fn from_operation(op: Operation) -> Self {
        Queryable { op, _marker: PhantomData }
    }
}

impl<M> Queryable<M> {
    fn wrap(self, f: impl FnOnce(Box<Operation>) -> Operation) -> Queryable<Unordered> {
        Queryable {
            op: f(Box::new(self.op)),
            _marker: PhantomData,
        }
    }

    pub fn where_(self, predicate: BoolExpr) -> Queryable<M> {
        Queryable {
            op: Operation::Where {
                source: Box::new(self.op),
                predicate,
            },
            _marker: PhantomData,
        }
    }

    pub fn select(self, projection: Projection) -> Queryable<Unordered> {
        self.wrap(|source| Operation::Select { source, projection })
    }

    pub fn order_by(self, key: ValueExpr) -> Queryable<Ordered> {
        Queryable {
            op: Operation::OrderBy {
                source: Box::new(self.op),
                key,
                direction: Direction::Asc,
            },
            _marker: PhantomData,
        }
    }

    pub fn order_by_descending(self, key: ValueExpr) -> Queryable<Ordered> {
        Queryable {
            op: Operation::OrderBy {
                source: Box::new(self.op),
                key,
                direction: Direction::Desc,
            },
            _marker: PhantomData,
        }
    }

    pub fn group_by(self, key: impl Into<compact_str::CompactString>) -> Queryable<Unordered> {
        self.wrap(|source| Operation::GroupBy { source, key: key.into() })
    }

    pub fn join<M2>(
        self,
        inner: Queryable<M2>,
        outer_key: impl Into<compact_str::CompactString>,
        inner_key: impl Into<compact_str::CompactString>,
        result: Option<Projection>,
    ) -> Queryable<Unordered> {
        self.wrap(|source| Operation::Join {
            source,
            inner: Box::new(inner.op),
            outer_key: outer_key.into(),
            inner_key: inner_key.into(),
            result,
        })
    }

    pub fn take(self, count: CountExpr) -> Queryable<Unordered> {
        self.wrap(|source| Operation::Take { source, count })
    }

    pub fn skip(self, count: CountExpr) -> Queryable<Unordered> {
        self.wrap(|source| Operation::Skip { source, count })
    }

    pub fn distinct(self) -> Queryable<Unordered> {
        self.wrap(|source| Operation::Distinct { source })
    }

    pub fn union<M2>(self, other: Queryable<M2>) -> Queryable<Unordered> {
        self.wrap(|source| Operation::Union {
            source,
            other: Box::new(other.op),
        })
    }

    pub fn reverse(self) -> Queryable<Unordered> {
        self.wrap(|source| Operation::Reverse { source })
    }

    fn terminal(self, terminal: Terminal) -> Operation {
        Operation::TerminalOp {
            source: Box::new(self.op),
            terminal,
        }
    }

    pub fn first(self, predicate: Option<BoolExpr>) -> Operation {
        self.terminal(Terminal::First { predicate })
    }
    pub fn first_or_default(self, predicate: Option<BoolExpr>) -> Operation {
        self.terminal(Terminal::FirstOrDefault { predicate })
    }
    pub fn single(self, predicate: Option<BoolExpr>) -> Operation {
        self.terminal(Terminal::Single { predicate })
    }
    pub fn single_or_default(self, predicate: Option<BoolExpr>) -> Operation {
        self.terminal(Terminal::SingleOrDefault { predicate })
    }
    pub fn last(self, predicate: Option<BoolExpr>) -> Operation {
        self.terminal(Terminal::Last { predicate })
    }
    pub fn last_or_default(self, predicate: Option<BoolExpr>) -> Operation {
        self.terminal(Terminal::LastOrDefault { predicate })
    }
    pub fn count(self, predicate: Option<BoolExpr>) -> Operation {
        self.terminal(Terminal::Count { predicate })
    }
    pub fn any(self, predicate: Option<BoolExpr>) -> Operation {
        self.terminal(Terminal::Any { predicate })
    }
    pub fn all(self, predicate: BoolExpr) -> Operation {
        self.terminal(Terminal::All { predicate })
    }
    pub fn sum(self, selector: ValueExpr) -> Operation {
        self.terminal(Terminal::Sum { selector })
    }
    pub fn average(self, selector: ValueExpr) -> Operation {
        self.terminal(Terminal::Average { selector })
    }
    pub fn min(self, selector: ValueExpr) -> Operation {
        self.terminal(Terminal::Min { selector })
    }
    pub fn max(self, selector: ValueExpr) -> Operation {
        self.terminal(Terminal::Max { selector })
    }
    pub fn contains(self, value: ValueExpr) -> Operation {
        self.terminal(Terminal::Contains { value })
    }
    pub fn to_array(self) -> Operation {
        self.terminal(Terminal::ToArray)
    }

    /// Finishes the chain without a terminal — the tree itself *is* the
    /// statement (used when `toSql` is called directly on a `SELECT`).
    pub fn build(self) -> Operation {
        self.op
    }
}

/// Extension only available once an ordering is in scope.
pub trait ThenByExt {
    fn then_by(self, key: ValueExpr) -> Queryable<Ordered>;
    fn then_by_descending(self, key: ValueExpr) -> Queryable<Ordered>;
}

impl ThenByExt for Queryable<Ordered> {
    fn then_by(self, key: ValueExpr) -> Queryable<Ordered> {
        Queryable {
            op: Operation::ThenBy {
                source: Box::new(self.op),
                key,
                direction: Direction::Asc,
            },
            _marker: PhantomData,
        }
    }

    fn then_by_descending(self, key: ValueExpr) -> Queryable<Ordered> {
        Queryable {
            op: Operation::ThenBy {
                source: Box::new(self.op),
                key,
                direction: Direction::Desc,
            },
            _marker: PhantomData,
        }
    }
}

/// Builder for `INSERT` chains. Columns accumulate in call
/// order; `returning` is set at most once.
#[derive(Debug, Clone, Default)]
pub struct Insertable {
    columns: Vec<(compact_str::CompactString, ValueExpr)>,
    returning: Option<crate::ir::Returning>,
}

impl Insertable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(mut self, column: impl Into<compact_str::CompactString>, value: ValueExpr) -> Self {
        self.columns.push((column.into(), value));
        self
    }

    pub fn returning(mut self, returning: crate::ir::Returning) -> Self {
        self.returning = Some(returning);
        self
    }

    pub fn build(self, table: impl Into<compact_str::CompactString>) -> crate::ir::InsertStatement {
        crate::ir::InsertStatement {
            table: table.into(),
            columns: self.columns,
            returning: self.returning,
        }
    }
}

/// Builder for `UPDATE` chains.
#[derive(Debug, Clone, Default)]
pub struct Updatable {
    assignments: Vec<(compact_str::CompactString, ValueExpr)>,
    predicate: Option<BoolExpr>,
    allow_full_table: bool,
}

impl Updatable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, column: impl Into<compact_str::CompactString>, value: ValueExpr) -> Self {
        self.assignments.push((column.into(), value));
        self
    }

    pub fn where_(mut self, predicate: BoolExpr) -> Self {
        self.predicate = Some(match self.predicate {
            Some(existing) => existing.and(predicate),
            None => predicate,
        });
        self
    }

    pub fn allow_full_table_update(mut self) -> Self {
        self.allow_full_table = true;
        self
    }

    pub fn build(self, table: impl Into<compact_str::CompactString>) -> crate::ir::UpdateStatement {
        crate::ir::UpdateStatement {
            table: table.into(),
            assignments: self.assignments,
            predicate: self.predicate,
            allow_full_table: self.allow_full_table,
        }
    }
}

/// Builder for `DELETE` chains.
#[derive(Debug, Clone, Default)]
pub struct Deletable {
    predicate: Option<BoolExpr>,
    allow_full_table: bool,
}

impl Deletable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_(mut self, predicate: BoolExpr) -> Self {
        self.predicate = Some(match self.predicate {
            Some(existing) => existing.and(predicate),
            None => predicate,
        });
        self
    }

    pub fn allow_full_table_delete(mut self) -> Self {
        self.allow_full_table = true;
        self
    }

    pub fn build(self, table: impl Into<compact_str::CompactString>) -> crate::ir::DeleteStatement {
        crate::ir::DeleteStatement {
            table: table.into(),
            predicate: self.predicate,
            allow_full_table: self.allow_full_table,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::CmpOp;

    #[test]
    fn chained_where_accumulates_as_nested_nodes() {
        let op = Queryable::from("users")
            .where_(BoolExpr::Comparison {
                op: CmpOp::Ge,
                left: ValueExpr::column("age"),
                right: ValueExpr::number(18.0),
            })
            .where_(BoolExpr::Comparison {
                op: CmpOp::Eq,
                left: ValueExpr::column("name"),
                right: ValueExpr::string("John"),
            })
            .build();
        match op {
            Operation::Where { source, .. } => match *source {
                Operation::Where { source, .. } => assert!(matches!(*source, Operation::From { .. })),
                _ => panic!("expected nested Where"),
            },
            _ => panic!("expected Where"),
        }
    }

    #[test]
    fn then_by_requires_prior_order_by() {
        // This only compiles because `order_by` was called first; removing
        // it (and calling `then_by` on `Queryable<Unordered>` directly)
        // is a compile error.
        let op = Queryable::from("users")
            .order_by(ValueExpr::column("id"))
            .then_by(ValueExpr::column("name"))
            .build();
        assert!(matches!(op, Operation::ThenBy { .. }));
    }
}
