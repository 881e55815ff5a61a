//! `drizzle-lambda` — the public binding crate.
//!
//! Re-exports the compiler core (`drizzle-core`), the
//! `define_select!`/`define_insert!`/`define_update!`/`define_delete!`/`schema!`
//! macros (`drizzle-macros`), and, behind Cargo features, a dialect emitter
//! (`drizzle-sqlite`/`drizzle-postgres`). The `rusqlite` feature additionally
//! adds a handful of thin `execute_*` wrappers from a compiled `{sql,
//! params}` pair to a live connection — the out-of-scope "driver" half of
//! the pipeline, reduced to its interface.

pub mod prelude {
    pub use drizzle_core::builder::{Deletable, Insertable, Queryable, ThenByExt, Updatable};
    pub use drizzle_core::error::{DrizzleError, Result};
    pub use drizzle_core::ir::*;
    pub use drizzle_core::schema::{Schema, TableRef};
    pub use drizzle_core::{compile_delete, compile_insert, compile_select, compile_update};
    pub use drizzle_macros::{define_delete, define_insert, define_select, define_update, schema};

    #[cfg(feature = "sqlite")]
    pub use drizzle_sqlite::SqliteEmitter;
    #[cfg(feature = "postgres")]
    pub use drizzle_postgres::PostgresEmitter;
}

pub use prelude::*;

/// Thin `{sql, params}` → driver wrappers, gated on `rusqlite` since that's
/// the one driver this repo wires up end to end (see `drizzle_sqlite::driver`
/// for the binding layer itself).
#[cfg(feature = "rusqlite")]
pub mod execute {
    use drizzle_core::error::Result;
    use drizzle_core::ir::{DeleteStatement, InsertStatement, Operation, ParamBag, UpdateStatement};
    use drizzle_sqlite::{driver, SqliteEmitter};
    use rusqlite::{Connection, Row};

    /// Compiles and runs a `SELECT`, mapping every row with `f`.
    pub fn execute_select<T>(
        conn: &Connection,
        op: &Operation,
        params: ParamBag,
        f: impl FnMut(&Row<'_>) -> rusqlite::Result<T>,
    ) -> Result<Vec<T>> {
        let (sql, bag) = drizzle_core::compile_select(op, params, &SqliteEmitter)?;
        driver::query(conn, &sql, &bag, f)
    }

    /// Compiles and runs an `INSERT`, returning the number of inserted rows.
    pub fn execute_insert(conn: &Connection, stmt: &InsertStatement, params: ParamBag) -> Result<usize> {
        let (sql, bag) = drizzle_core::compile_insert(stmt, params, &SqliteEmitter)?;
        driver::execute(conn, &sql, &bag)
    }

    /// Compiles and runs an `UPDATE`, returning the number of updated rows.
    pub fn execute_update(conn: &Connection, stmt: &UpdateStatement, params: ParamBag) -> Result<usize> {
        let (sql, bag) = drizzle_core::compile_update(stmt, params, &SqliteEmitter)?;
        driver::execute(conn, &sql, &bag)
    }

    /// Compiles and runs a `DELETE`, returning the number of deleted rows.
    pub fn execute_delete(conn: &Connection, stmt: &DeleteStatement, params: ParamBag) -> Result<usize> {
        let (sql, bag) = drizzle_core::compile_delete(stmt, params, &SqliteEmitter)?;
        driver::execute(conn, &sql, &bag)
    }
}
