//! Tracing utilities for query-compilation observability.
//!
//! Enable the `tracing` feature to emit a debug-level event with the
//! generated SQL and parameter count from every `compile_*` call. The macro
//! no-ops when the feature is disabled, avoiding `#[cfg]` boilerplate at
//! each call site.

/// Emit a debug-level tracing event with the compiled SQL text and
/// parameter count.
///
/// ```ignore
/// drizzle_trace_query!(&sql, bag.len());
/// ```
#[macro_export]
macro_rules! drizzle_trace_query {
    ($sql:expr, $param_count:expr) => {
        #[cfg(feature = "tracing")]
        tracing::debug!(sql = %$sql, params = $param_count, "drizzle.compile");
    };
}
