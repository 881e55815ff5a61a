//! Dialect and logical-type vocabulary shared by the compiler core and each
//! dialect emitter crate.
//!
//! This crate carries no SQL-generation logic of its own; it is the small
//! shared alphabet `drizzle-core` and `drizzle-sqlite` / `drizzle-postgres`
//! agree on so emitters can be picked by feature flag rather than generic
//! parameter.

#![cfg_attr(not(feature = "std"), no_std)]

/// The SQL dialect a query is compiled for.
///
/// Selected once per [`crate::Dialect`] and threaded through the whole
/// pipeline (operation tree is dialect-agnostic; only the emitter consults
/// this).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// ANSI/PostgreSQL-flavored SQL with `$(name)` named placeholders.
    PostgreSql,
    /// SQLite-flavored SQL with `@name` named placeholders and the
    /// `LIMIT -1 OFFSET n` sentinel for offset-only pagination.
    Sqlite,
}

impl Dialect {
    /// Whether this dialect requires the `LIMIT -1` sentinel when only
    /// `OFFSET` is present (SQLite has no bare `OFFSET` clause).
    pub const fn requires_limit_sentinel(self) -> bool {
        matches!(self, Dialect::Sqlite)
    }
}

/// The logical type of a literal or declared column, used only to drive the
/// `+` → `Concat` string-heuristic and `CAST` target validation.
///
/// This is intentionally coarse: the compiler does not perform full type
/// inference, so `LogicalType` is a hint, not a proof.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalType {
    Number,
    String,
    Boolean,
    Null,
    Undefined,
}

impl LogicalType {
    pub const fn is_string(self) -> bool {
        matches!(self, LogicalType::String)
    }
}

/// Column-name heuristics used to promote `+` to `Concat` when a query
/// parameter's declared type is unknown at compile time.
///
/// This is a fallback only: a `Column` reference whose schema-declared type
/// is known uses that type directly rather than guessing from the name.
pub const STRING_NAME_HEURISTICS: &[&str] = &[
    "name",
    "title",
    "email",
    "url",
    "path",
    "address",
    "city",
    "country",
    "state",
    "firstname",
    "lastname",
    "first_name",
    "last_name",
    "description",
    "slug",
    "username",
];

/// Returns true if `ident` (case-insensitively) looks like a string-valued
/// column by name — the fallback heuristic for the `+` → `Concat` rewrite
/// when no schema is available to look up the column's declared type.
pub fn looks_like_string_column(ident: &str) -> bool {
    let lower = ident.to_ascii_lowercase();
    STRING_NAME_HEURISTICS.iter().any(|h| *h == lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heuristic_is_case_insensitive() {
        assert!(looks_like_string_column("firstName"));
        assert!(looks_like_string_column("EMAIL"));
        assert!(!looks_like_string_column("age"));
    }

    #[test]
    fn sqlite_needs_limit_sentinel_pg_does_not() {
        assert!(Dialect::Sqlite.requires_limit_sentinel());
        assert!(!Dialect::PostgreSql.requires_limit_sentinel());
    }
}
