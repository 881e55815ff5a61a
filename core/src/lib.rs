//! drizzle-core — the query compiler's intermediate representation,
//! auto-parameterization pass, and SQL-emission contract.
//!
//! This crate is a pure function from operation tree + parameter bag to
//! `{ sql, params }` — no shared mutable state, no I/O, no time dependency.
//! It does not know how to talk to a database; dialect
//! crates (`drizzle-sqlite`, `drizzle-postgres`) implement [`emit::Emitter`]
//! against this crate's IR.
//!
//! # no_std support
//!
//! ```toml
//! # With std (default)
//! drizzle-core = "0.1"
//!
//! # no_std with allocator
//! drizzle-core = { version = "0.1", default-features = false, features = ["alloc"] }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub(crate) mod prelude {
    #[cfg(feature = "std")]
    pub use std::{borrow::Cow, boxed::Box, format, string::String, vec, vec::Vec};

    #[cfg(not(feature = "std"))]
    pub use alloc::{borrow::Cow, boxed::Box, format, string::String, vec, vec::Vec};
}

pub mod builder;
pub mod emit;
pub mod error;
pub mod ir;
pub mod paramize;
pub mod schema;
pub mod tracing;

pub use emit::{compile_delete, compile_insert, compile_select, compile_update, Emitter};
pub use error::{DrizzleError, Result};
pub use ir::{
    BoolExpr, CountExpr, DeleteStatement, InsertStatement, Operation, ParamBag, ParamValue,
    Projection, Terminal, UpdateStatement, ValueExpr,
};
pub use schema::{Schema, TableRef};

/// Re-exports for `drizzle-macros`-generated code; the macro crate cannot
/// depend on dialect crates, so it only ever constructs types from here.
pub mod generated {
    pub use crate::builder::{Deletable, Insertable, Queryable, ThenByExt, Updatable};
    pub use crate::ir::*;
}
