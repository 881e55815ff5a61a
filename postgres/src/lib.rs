//! PostgreSQL dialect for `drizzle-lambda`'s query compiler.
//!
//! Supplies `$(name)` named placeholders and ANSI-standard identifier
//! quoting; PostgreSQL's native `OFFSET` clause means it never needs the
//! `LIMIT -1` sentinel SQLite requires, so [`Emitter::requires_limit_sentinel`]
//! is left at its default (`false` for this dialect).

use drizzle_core::emit::Emitter;
use drizzle_types::Dialect;

/// PostgreSQL's [`Emitter`]: `$(name)` placeholders, default ANSI
/// double-quoted identifier rendering.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PostgresEmitter;

impl Emitter for PostgresEmitter {
    fn dialect(&self) -> Dialect {
        Dialect::PostgreSql
    }

    fn write_placeholder(&self, name: &str, out: &mut String) {
        out.push_str("$(");
        out.push_str(name);
        out.push(')');
    }
}
