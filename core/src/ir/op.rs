//! The query-operation tree: a linked list of operation nodes,
//! leaves first, built by the fluent builder surface.

use alloc::boxed::Box;
use alloc::vec::Vec;
use compact_str::CompactString;

use super::expr::{BoolExpr, Direction, ValueExpr};

/// `take`/`skip` counts: a literal, a bound parameter, or (skip only) an
/// arithmetic expression over parameters.
#[derive(Debug, Clone, PartialEq)]
pub enum CountExpr {
    Literal(i64),
    Expr(ValueExpr),
}

/// What a `Select` stage projects.
#[derive(Debug, Clone, PartialEq)]
pub enum Projection {
    /// `select(x => x.col)` — a single column or computed scalar, no alias.
    Value(ValueExpr),
    /// `select(x => ({ a: x.a, b: x.b }))` — an ordered set of aliased
    /// expressions. Order is insertion order.
    Object(Vec<(CompactString, ValueExpr)>),
}

/// A terminal operator. Converts a queryable into
/// a scalar, a row, or an array, and fixes the final SQL shape. At most one
/// terminal per statement, and it must be the root.
#[derive(Debug, Clone, PartialEq)]
pub enum Terminal {
    First { predicate: Option<BoolExpr> },
    FirstOrDefault { predicate: Option<BoolExpr> },
    Single { predicate: Option<BoolExpr> },
    SingleOrDefault { predicate: Option<BoolExpr> },
    Last { predicate: Option<BoolExpr> },
    LastOrDefault { predicate: Option<BoolExpr> },
    Count { predicate: Option<BoolExpr> },
    Any { predicate: Option<BoolExpr> },
    All { predicate: BoolExpr },
    Sum { selector: ValueExpr },
    Average { selector: ValueExpr },
    Min { selector: ValueExpr },
    Max { selector: ValueExpr },
    Contains { value: ValueExpr },
    ToArray,
}

/// The query-operation tree. Immutable once built: a
/// builder call returns a fresh node wrapping its source, never mutates one
/// in place.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Leaf: a table source, possibly schema-qualified (`schema.table`).
    From { table: CompactString },

    /// Chainable; multiple `where` calls accumulate as conjunction (spec
    /// §8 property 6), represented here as nested `Where` nodes rather than
    /// eagerly ANDed so the emitter can choose parenthesization.
    Where {
        source: Box<Operation>,
        predicate: BoolExpr,
    },

    /// At most one terminal projection per stage; a further op after a
    /// `Select` produces a nested subquery.
    Select {
        source: Box<Operation>,
        projection: Projection,
    },

    OrderBy {
        source: Box<Operation>,
        key: ValueExpr,
        direction: Direction,
    },

    /// Only legal directly downstream of an `OrderBy`/`OrderByDescending`
    /// or another `ThenBy` at the same ordering scope;
    /// enforced by the builder's type state, see [`crate::builder`].
    ThenBy {
        source: Box<Operation>,
        key: ValueExpr,
        direction: Direction,
    },

    /// At most one; key must be a simple column reference.
    GroupBy {
        source: Box<Operation>,
        key: CompactString,
    },

    /// Inner join only; both keys restricted to simple column references
    ///.
    Join {
        source: Box<Operation>,
        inner: Box<Operation>,
        outer_key: CompactString,
        inner_key: CompactString,
        result: Option<Projection>,
    },

    /// At most one.
    Take {
        source: Box<Operation>,
        count: CountExpr,
    },

    /// At most one.
    Skip {
        source: Box<Operation>,
        count: CountExpr,
    },

    /// Idempotent marker.
    Distinct { source: Box<Operation> },

    Union {
        source: Box<Operation>,
        other: Box<Operation>,
    },

    /// Flips the current ordering direction.
    Reverse { source: Box<Operation> },

    /// At most one terminal; must be root.
    TerminalOp {
        source: Box<Operation>,
        terminal: Terminal,
    },
}

impl Operation {
    /// The operation this one wraps, if any (`From` is the only leaf).
    pub fn source(&self) -> Option<&Operation> {
        match self {
            Operation::From { .. } => None,
            Operation::Where { source, .. }
            | Operation::Select { source, .. }
            | Operation::OrderBy { source, .. }
            | Operation::ThenBy { source, .. }
            | Operation::GroupBy { source, .. }
            | Operation::Join { source, .. }
            | Operation::Take { source, .. }
            | Operation::Skip { source, .. }
            | Operation::Distinct { source }
            | Operation::Union { source, .. }
            | Operation::Reverse { source }
            | Operation::TerminalOp { source, .. } => Some(source),
        }
    }

    pub fn source_mut(&mut self) -> Option<&mut Operation> {
        match self {
            Operation::From { .. } => None,
            Operation::Where { source, .. }
            | Operation::Select { source, .. }
            | Operation::OrderBy { source, .. }
            | Operation::ThenBy { source, .. }
            | Operation::GroupBy { source, .. }
            | Operation::Join { source, .. }
            | Operation::Take { source, .. }
            | Operation::Skip { source, .. }
            | Operation::Distinct { source }
            | Operation::Union { source, .. }
            | Operation::Reverse { source }
            | Operation::TerminalOp { source, .. } => Some(source),
        }
    }
}
