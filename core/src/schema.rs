//! The schema handle: identifies a set of named table shapes.
//! Carries no runtime table data; exists to constrain builder calls and to
//! let the `schema!` macro (in `drizzle-macros`) validate table/column
//! names against a declared shape at compile time.

use crate::prelude::*;

/// One declared table: its name and declared column names, each with a
/// coarse logical type used by the `+` → `Concat` heuristic when a schema
/// is available (the heuristic remains a fallback for parameter-property
/// references, whose type is never known to the schema).
#[derive(Debug, Clone, Copy)]
pub struct TableRef {
    pub name: &'static str,
    pub columns: &'static [(&'static str, drizzle_types::LogicalType)],
}

impl TableRef {
    pub const fn column_type(&self, name: &str) -> Option<drizzle_types::LogicalType> {
        let mut i = 0;
        while i < self.columns.len() {
            // `&str` equality isn't const yet on stable for all targets;
            // byte-compare instead so `schema!` can build this entirely at
            // compile time without relying on nightly const traits.
            if const_str_eq(self.columns[i].0, name) {
                return Some(self.columns[i].1);
            }
            i += 1;
        }
        None
    }
}

const fn const_str_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    let mut i = 0;
    while i < a.len() {
        if a[i] != b[i] {
            return false;
        }
        i += 1;
    }
    true
}

/// A phantom-typed value identifying a set of named table shapes
///. Implementations are generated by the `schema!` macro as a
/// zero-sized marker type; the trait itself carries no runtime state.
pub trait Schema {
    const TABLES: &'static [TableRef];

    /// Looks up a declared table by name (unqualified — schema-qualified
    /// `schema.table` names are split by the emitter, not here).
    fn table(name: &str) -> Option<&'static TableRef> {
        Self::TABLES.iter().find(|t| t.name == name)
    }
}

/// A schema with no declared tables — used when a query builds directly
/// against a table name string without compile-time column validation.
#[derive(Debug, Clone, Copy)]
pub struct NoSchema;

impl Schema for NoSchema {
    const TABLES: &'static [TableRef] = &[];
}
