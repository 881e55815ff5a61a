//! Error taxonomy for the query compiler.
//!
//! Three kinds only. All three are raised synchronously from `to_sql` (or a
//! driver-layer `execute*` wrapper) before any SQL is produced — there is no
//! partial result and no retry policy; these are programmer errors.
//!
//! In this crate most `ParseFailure` / `UnsupportedConstruct` cases are
//! caught earlier, at macro-expansion time, as a `compile_error!` (see
//! `drizzle-macros`) — stronger than a runtime error, since the caller
//! never ships a binary with the mistake in it. The variants still exist
//! here because a hand-built `Operation` tree (bypassing the macros) can
//! still reach `to_sql` with the same defects, and because
//! `SemanticViolation`s genuinely can only be checked once the caller's
//! parameter bag is known.

use thiserror::Error;

/// Errors the compiler can raise.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DrizzleError {
    /// The closure source (or, in this crate, the macro input) could not be
    /// parsed into a recognizable `(q, params?) => chain` shape.
    #[error("Failed to parse query: {fragment}")]
    ParseFailure {
        /// The offending source fragment, for diagnostics.
        fragment: String,
    },

    /// A grammatically-parsed construct falls outside the restricted
    /// expression sub-language this compiler accepts (captured variable,
    /// disallowed method call, template string, computed member,
    /// conditional expression, statement body, nested function
    /// definition, ...).
    #[error("Unsupported construct `{construct}`: {message}")]
    UnsupportedConstruct {
        construct: String,
        message: String,
    },

    /// A construct is grammatically accepted but breaks an invariant:
    /// `thenBy` without `orderBy`, a non-column `join`/`groupBy` key,
    /// `DELETE`/`UPDATE` without `WHERE` and without the allow-all opt-in,
    /// an `INSERT` whose values are entirely `undefined`, a generated
    /// parameter name colliding with a caller-supplied one, or a declared
    /// parameter the caller's bag never binds.
    #[error("Semantic violation ({rule}): {message}")]
    SemanticViolation { rule: String, message: String },

    /// A driver-layer failure running compiled SQL against a live
    /// connection. Not raised by this crate itself — dialect driver
    /// adapters (e.g. `drizzle-sqlite`'s `rusqlite` module) map their
    /// underlying error type into this variant.
    #[error("execution failed: {0}")]
    Execution(String),

    /// A driver-layer query expected exactly one row and found none.
    #[error("no matching row")]
    NotFound,
}

impl DrizzleError {
    pub fn parse_failure(fragment: impl Into<String>) -> Self {
        DrizzleError::ParseFailure {
            fragment: fragment.into(),
        }
    }

    pub fn unsupported(construct: impl Into<String>, message: impl Into<String>) -> Self {
        DrizzleError::UnsupportedConstruct {
            construct: construct.into(),
            message: message.into(),
        }
    }

    pub fn semantic(rule: impl Into<String>, message: impl Into<String>) -> Self {
        DrizzleError::SemanticViolation {
            rule: rule.into(),
            message: message.into(),
        }
    }
}

/// Result type for compiler operations.
pub type Result<T> = core::result::Result<T, DrizzleError>;
