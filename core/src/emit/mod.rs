//! SQL emission: turns a parameterized operation tree (or
//! DML statement) into `{ sql, params }`, given a dialect's [`Emitter`].
//!
//! This module owns the parts of emission shared by every dialect — clause
//! ordering, expression rendering, subquery wrapping. A dialect crate
//! (`drizzle-sqlite`, `drizzle-postgres`) supplies only identifier quoting
//! and placeholder syntax by implementing [`Emitter`]; it does not re-derive
//! clause order or expression precedence.

mod dml;
mod expr;
mod select;

pub use dml::{compile_delete, compile_insert, compile_update};
pub use select::compile_select;

use crate::prelude::*;
use drizzle_types::Dialect;

/// The dialect-specific half of SQL emission: quoting and placeholder
/// syntax. Clause assembly and expression rendering live in this crate and
/// call back into an `Emitter` only for these two concerns.
pub trait Emitter {
    fn dialect(&self) -> Dialect;

    /// Quotes a (possibly dotted) identifier. The default double-quotes
    /// each segment, which both PostgreSQL and SQLite accept; a dialect
    /// only needs to override this if it wants different quoting.
    fn quote_ident(&self, name: &str, out: &mut String) {
        for (i, segment) in name.split('.').enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push('"');
            out.push_str(segment);
            out.push('"');
        }
    }

    /// Writes the placeholder text for a bound parameter named `name`
    /// (`$(name)` for PostgreSQL, `@name` for SQLite).
    fn write_placeholder(&self, name: &str, out: &mut String);

    /// Whether a bare `OFFSET n` with no `LIMIT` needs the
    /// `LIMIT -1 OFFSET n` sentinel (SQLite only).
    fn requires_limit_sentinel(&self) -> bool {
        self.dialect().requires_limit_sentinel()
    }
}

/// An alias counter shared across a whole `to_sql` call, so nested
/// subqueries (window-function layering, a `Select` followed by further
/// ops) never reuse a derived-table alias.
#[derive(Default)]
pub(crate) struct AliasCtx {
    next: u32,
}

impl AliasCtx {
    pub(crate) fn fresh(&mut self) -> compact_str::CompactString {
        self.next += 1;
        compact_str::format_compact!("sub{}", self.next)
    }
}

/// The outer/inner table aliases a `join` assigns its two sides. Joins
/// don't nest in this compiler, so these are fixed rather than drawn from
/// [`AliasCtx`].
pub(crate) const JOIN_OUTER_ALIAS: &str = "t0";
pub(crate) const JOIN_INNER_ALIAS: &str = "t1";
