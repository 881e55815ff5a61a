//! Parameter values and the parameter bag.

use compact_str::CompactString;
use indexmap::IndexMap;

/// A value a caller binds to a declared query parameter, or that the
/// auto-parameterizer lifts out of a literal.
///
/// The value types a declared parameter can bind to — `number`, `string`,
/// `boolean`, `null`, `undefined` — plus the array form auto-parameterized
/// `In` expansion needs.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Number(f64),
    String(CompactString),
    Boolean(bool),
    Null,
    /// Distinct from `Null` — drives the INSERT column-skip rule: a column
    /// bound to `Undefined` is omitted entirely, never set to SQL `NULL`.
    Undefined,
    Array(Vec<ParamValue>),
}

impl ParamValue {
    pub const fn is_undefined(&self) -> bool {
        matches!(self, ParamValue::Undefined)
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, ParamValue::Null)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Number(v as f64)
    }
}
impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Number(v)
    }
}
impl From<bool> for ParamValue {
    fn from(v: bool) -> Self {
        ParamValue::Boolean(v)
    }
}
impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::String(CompactString::from(v))
    }
}
impl From<CompactString> for ParamValue {
    fn from(v: CompactString) -> Self {
        ParamValue::String(v)
    }
}
impl<T: Into<ParamValue>> From<Option<T>> for ParamValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => ParamValue::Null,
        }
    }
}
impl<T: Into<ParamValue>> From<Vec<T>> for ParamValue {
    fn from(v: Vec<T>) -> Self {
        ParamValue::Array(v.into_iter().map(Into::into).collect())
    }
}

/// The parameter bag: caller-declared parameters plus, after compilation,
/// the auto-generated `__p{k}` slots.
///
/// Backed by an [`IndexMap`] so key order is insertion order — compiling
/// the same query twice must produce parameters in the same stable order.
pub type ParamBag = IndexMap<CompactString, ParamValue>;

/// Prefix reserved for auto-generated parameter names. A
/// caller-supplied bag using this prefix is a [`crate::error::DrizzleError::SemanticViolation`].
pub const GENERATED_PREFIX: &str = "__p";

/// The flat bag key (and emitted placeholder name) a `Parameter`/
/// `BooleanParam` reference binds against. A bare `p` reference binds to
/// `p` directly; a property path (`p.minAge`) flattens to `p_minAge` —
/// the caller's bag has no nesting, so a query referencing two properties
/// of the same declared parameter binds two independent bag entries.
pub fn param_bag_key(param: &str, property: Option<&str>) -> CompactString {
    match property {
        Some(prop) => compact_str::format_compact!("{param}_{prop}"),
        None => CompactString::from(param),
    }
}
