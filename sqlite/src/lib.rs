//! SQLite dialect for `drizzle-lambda`'s query compiler.
//!
//! Supplies the one thing `drizzle-core` can't know on its own: `@name`
//! named placeholders, ANSI-standard identifier quoting, and the
//! `LIMIT -1 OFFSET n` sentinel SQLite needs for an offset-only page. The
//! `rusqlite` feature additionally gates a thin driver adapter from a
//! compiled `{sql, params}` pair to a live connection.

#[cfg(feature = "rusqlite")]
pub mod driver;

use drizzle_core::emit::Emitter;
use drizzle_types::Dialect;

/// SQLite's [`Emitter`]: `@name` placeholders, the default ANSI
/// double-quoted identifier rendering, and `requires_limit_sentinel`
/// switched on via [`Dialect::requires_limit_sentinel`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SqliteEmitter;

impl Emitter for SqliteEmitter {
    fn dialect(&self) -> Dialect {
        Dialect::Sqlite
    }

    fn write_placeholder(&self, name: &str, out: &mut String) {
        out.push('@');
        out.push_str(name);
    }
}
