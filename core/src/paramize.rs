//! Auto-parameterization: lifts every literal constant in a
//! SQL-bindable position into a fresh `__p{k}` parameter slot, leaving only
//! references behind.
//!
//! The counter is scoped to the whole `to_sql` call — nested subqueries
//! share it so generated names stay unique across the final SQL string.
//! The operation tree is built root-outermost (the first `.where_()` call
//! ends up deepest, wrapped by everything chained after it), so
//! `parameterize_operation` recurses into `source` before touching its own
//! node's payload — that visits nodes in the order they were chained,
//! leaf-to-root, which is the order literals should be numbered in. Within
//! a single expression, numbering is left-to-right as usual.

use crate::error::{DrizzleError, Result};
use crate::ir::{
    param_bag_key, ArithOp, BoolExpr, CountExpr, InList, LiteralValue, Operation, ParamBag,
    ParamValue, Projection, Terminal, ValueExpr, GENERATED_PREFIX,
};
use crate::prelude::*;

/// Tracks the monotonic counter and the slots generated so far.
pub struct ParamCtx {
    next: u32,
    pub generated: ParamBag,
}

impl ParamCtx {
    pub fn new() -> Self {
        ParamCtx {
            next: 1,
            generated: ParamBag::new(),
        }
    }

    fn fresh_name(&mut self) -> compact_str::CompactString {
        let name = compact_str::format_compact!("{GENERATED_PREFIX}{}", self.next);
        self.next += 1;
        name
    }

    /// Allocates a slot for `value`, returning the `Parameter` node that
    /// replaces the literal.
    fn allocate(&mut self, value: ParamValue) -> ValueExpr {
        let name = self.fresh_name();
        self.generated.insert(name.clone(), value);
        ValueExpr::Parameter {
            param: name,
            property: None,
        }
    }

    /// Allocates one slot per element of a parameter-bound array used in an
    /// `In` list: `name_0`, `name_1`, … The original array stays
    /// bound under `name` in the caller's bag (not touched here).
    pub fn expand_array(&mut self, base: &str, elements: &[ParamValue]) -> Vec<compact_str::CompactString> {
        elements
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let name = compact_str::format_compact!("{base}_{i}");
                self.generated.insert(name.clone(), v.clone());
                name
            })
            .collect()
    }
}

/// Runs the auto-parameterization pass over a whole `SELECT` operation
/// tree, returning the generated slots. Mutates `op` in place.
pub fn parameterize_operation(op: &mut Operation, ctx: &mut ParamCtx) {
    match op {
        Operation::From { .. } => {}
        Operation::Where { source, predicate } => {
            parameterize_operation(source, ctx);
            parameterize_bool(predicate, ctx);
        }
        Operation::Select { source, projection } => {
            parameterize_operation(source, ctx);
            parameterize_projection(projection, ctx);
        }
        Operation::OrderBy { source, key, .. } | Operation::ThenBy { source, key, .. } => {
            parameterize_operation(source, ctx);
            parameterize_value(key, ctx);
        }
        Operation::GroupBy { source, .. } => {
            parameterize_operation(source, ctx);
        }
        Operation::Join {
            source,
            inner,
            result,
            ..
        } => {
            parameterize_operation(source, ctx);
            parameterize_operation(inner, ctx);
            if let Some(result) = result {
                parameterize_projection(result, ctx);
            }
        }
        Operation::Take { source, count } | Operation::Skip { source, count } => {
            parameterize_operation(source, ctx);
            parameterize_count(count, ctx);
        }
        Operation::Distinct { source } | Operation::Reverse { source } => {
            parameterize_operation(source, ctx);
        }
        Operation::Union { source, other } => {
            parameterize_operation(source, ctx);
            parameterize_operation(other, ctx);
        }
        Operation::TerminalOp { source, terminal } => {
            parameterize_operation(source, ctx);
            parameterize_terminal(terminal, ctx);
        }
    }
}

fn parameterize_terminal(terminal: &mut Terminal, ctx: &mut ParamCtx) {
    match terminal {
        Terminal::First { predicate }
        | Terminal::FirstOrDefault { predicate }
        | Terminal::Single { predicate }
        | Terminal::SingleOrDefault { predicate }
        | Terminal::Last { predicate }
        | Terminal::LastOrDefault { predicate }
        | Terminal::Count { predicate }
        | Terminal::Any { predicate } => {
            if let Some(p) = predicate {
                parameterize_bool(p, ctx);
            }
        }
        Terminal::All { predicate } => parameterize_bool(predicate, ctx),
        Terminal::Sum { selector }
        | Terminal::Average { selector }
        | Terminal::Min { selector }
        | Terminal::Max { selector } => parameterize_value(selector, ctx),
        Terminal::Contains { value } => parameterize_value(value, ctx),
        Terminal::ToArray => {}
    }
}

fn parameterize_projection(projection: &mut Projection, ctx: &mut ParamCtx) {
    match projection {
        Projection::Value(v) => parameterize_value(v, ctx),
        Projection::Object(fields) => {
            for (_, v) in fields {
                parameterize_value(v, ctx);
            }
        }
    }
}

fn parameterize_count(count: &mut CountExpr, ctx: &mut ParamCtx) {
    if let CountExpr::Expr(v) = count {
        parameterize_value(v, ctx);
    }
}

/// Pre-order replacement: substitute this node first (if it's a
/// parameterizable constant), then recurse into children.
pub fn parameterize_value(expr: &mut ValueExpr, ctx: &mut ParamCtx) {
    if let ValueExpr::Constant { value, .. } = expr {
        // `null` constants are never parameterized: equality comparisons
        // against `null` were already lowered to `IsNull` by the converter,
        // and any other `null` survives to be emitted as the bare `NULL`
        // token.
        if !matches!(value, LiteralValue::Null) {
            let param_value = literal_to_param(value);
            *expr = ctx.allocate(param_value);
            return;
        }
    }

    match expr {
        ValueExpr::Arithmetic { left, right, .. } | ValueExpr::Concat { left, right } => {
            parameterize_value(left, ctx);
            parameterize_value(right, ctx);
        }
        ValueExpr::Coalesce { value, default } => {
            parameterize_value(value, ctx);
            parameterize_value(default, ctx);
        }
        ValueExpr::Case { when, then, els } => {
            parameterize_bool(when, ctx);
            parameterize_value(then, ctx);
            parameterize_value(els, ctx);
        }
        ValueExpr::Cast { value, .. } => parameterize_value(value, ctx),
        ValueExpr::StringMethodCall { object, .. } => parameterize_value(object, ctx),
        ValueExpr::Window {
            partition_by,
            order_by,
            ..
        } => {
            for p in partition_by {
                parameterize_value(p, ctx);
            }
            for (o, _) in order_by {
                parameterize_value(o, ctx);
            }
        }
        ValueExpr::Column { .. }
        | ValueExpr::JoinColumn { .. }
        | ValueExpr::Constant { .. }
        | ValueExpr::Parameter { .. } => {}
    }
}

pub fn parameterize_bool(expr: &mut BoolExpr, ctx: &mut ParamCtx) {
    match expr {
        BoolExpr::Comparison { left, right, .. } => {
            parameterize_value(left, ctx);
            parameterize_value(right, ctx);
        }
        BoolExpr::Logical { left, right, .. } => {
            parameterize_bool(left, ctx);
            parameterize_bool(right, ctx);
        }
        BoolExpr::Not(inner) => parameterize_bool(inner, ctx),
        BoolExpr::BooleanMethodCall { object, args, .. } => {
            parameterize_value(object, ctx);
            for a in args {
                parameterize_value(a, ctx);
            }
        }
        BoolExpr::In { value, list, .. } => {
            parameterize_value(value, ctx);
            if let InList::Values(values) = list {
                for v in values {
                    parameterize_value(v, ctx);
                }
            }
        }
        BoolExpr::IsNull { value, .. } => parameterize_value(value, ctx),
        BoolExpr::BooleanColumn { .. }
        | BoolExpr::BooleanConstant(_)
        | BoolExpr::BooleanParam { .. } => {}
    }
}

fn literal_to_param(value: &LiteralValue) -> ParamValue {
    match value {
        LiteralValue::Number(n) => ParamValue::Number(*n),
        LiteralValue::String(s) => ParamValue::String(s.clone()),
        LiteralValue::Boolean(b) => ParamValue::Boolean(*b),
        LiteralValue::Null => ParamValue::Null,
    }
}

/// Expands every parameter-bound `In` list (`ids.includes(u.id)` where
/// `ids` is a caller-declared array parameter) into one
/// placeholder per element, rewriting the node's list in place to
/// `InList::Values` of fresh `__p{k}_{i}`-named parameter references.
///
/// Runs after [`merge_params`] — it needs to know each array's length,
/// which is only known once the caller's bag is available — and before
/// [`check_params_bound`], since the fresh references it allocates are
/// already bound by construction.
pub fn expand_in_lists(op: &mut Operation, bag: &ParamBag, ctx: &mut ParamCtx) -> Result<()> {
    match op {
        Operation::From { .. } => {}
        Operation::Where { source, predicate } => {
            expand_in_lists_bool(predicate, bag, ctx)?;
            expand_in_lists(source, bag, ctx)?;
        }
        Operation::Select { source, .. } => expand_in_lists(source, bag, ctx)?,
        Operation::OrderBy { source, .. } | Operation::ThenBy { source, .. } => {
            expand_in_lists(source, bag, ctx)?
        }
        Operation::GroupBy { source, .. } => expand_in_lists(source, bag, ctx)?,
        Operation::Join { source, inner, .. } => {
            expand_in_lists(source, bag, ctx)?;
            expand_in_lists(inner, bag, ctx)?;
        }
        Operation::Take { source, .. } | Operation::Skip { source, .. } => expand_in_lists(source, bag, ctx)?,
        Operation::Distinct { source } | Operation::Reverse { source } => expand_in_lists(source, bag, ctx)?,
        Operation::Union { source, other } => {
            expand_in_lists(source, bag, ctx)?;
            expand_in_lists(other, bag, ctx)?;
        }
        Operation::TerminalOp { source, terminal } => {
            expand_in_lists_terminal(terminal, bag, ctx)?;
            expand_in_lists(source, bag, ctx)?;
        }
    }
    Ok(())
}

fn expand_in_lists_terminal(terminal: &mut Terminal, bag: &ParamBag, ctx: &mut ParamCtx) -> Result<()> {
    match terminal {
        Terminal::First { predicate }
        | Terminal::FirstOrDefault { predicate }
        | Terminal::Single { predicate }
        | Terminal::SingleOrDefault { predicate }
        | Terminal::Last { predicate }
        | Terminal::LastOrDefault { predicate }
        | Terminal::Count { predicate }
        | Terminal::Any { predicate } => {
            if let Some(p) = predicate {
                expand_in_lists_bool(p, bag, ctx)?;
            }
        }
        Terminal::All { predicate } => expand_in_lists_bool(predicate, bag, ctx)?,
        Terminal::Sum { .. }
        | Terminal::Average { .. }
        | Terminal::Min { .. }
        | Terminal::Max { .. }
        | Terminal::Contains { .. }
        | Terminal::ToArray => {}
    }
    Ok(())
}

fn expand_in_lists_bool(expr: &mut BoolExpr, bag: &ParamBag, ctx: &mut ParamCtx) -> Result<()> {
    match expr {
        BoolExpr::Comparison { .. }
        | BoolExpr::BooleanColumn { .. }
        | BoolExpr::BooleanConstant(_)
        | BoolExpr::BooleanParam { .. }
        | BoolExpr::BooleanMethodCall { .. }
        | BoolExpr::IsNull { .. } => {}
        BoolExpr::Logical { left, right, .. } => {
            expand_in_lists_bool(left, bag, ctx)?;
            expand_in_lists_bool(right, bag, ctx)?;
        }
        BoolExpr::Not(inner) => expand_in_lists_bool(inner, bag, ctx)?,
        BoolExpr::In { list, .. } => {
            if let InList::Parameter(name) = list {
                let ParamValue::Array(elements) = bag.get(name.as_str()).ok_or_else(|| {
                    DrizzleError::semantic(
                        "unbound-parameter",
                        format!("declared parameter `{name}` was never bound by the caller's parameter bag"),
                    )
                })?
                else {
                    return Err(DrizzleError::semantic(
                        "in-list-not-an-array",
                        format!("parameter `{name}` is bound to a scalar, but is used as an `includes(...)` list"),
                    ));
                };
                let names = ctx.expand_array(name, elements);
                *list = InList::Values(names.into_iter().map(ValueExpr::param).collect());
            }
        }
    }
    Ok(())
}

/// Merges caller-supplied parameters with auto-generated slots. Rejects a
/// caller bag that uses the reserved `__p` prefix, or that
/// collides with a generated name (can only happen if the caller also used
/// the reserved prefix, since generated names are freshly counted).
pub fn merge_params(caller: &ParamBag, generated: ParamBag) -> Result<ParamBag> {
    for key in caller.keys() {
        if key.starts_with(GENERATED_PREFIX) {
            return Err(DrizzleError::semantic(
                "parameter-name-collision",
                format!(
                    "caller-supplied parameter `{key}` uses the reserved `{GENERATED_PREFIX}` prefix"
                ),
            ));
        }
    }
    let mut merged = caller.clone();
    for (k, v) in generated {
        if merged.contains_key(&k) {
            return Err(DrizzleError::semantic(
                "parameter-name-collision",
                format!("generated parameter `{k}` collides with a caller-supplied parameter"),
            ));
        }
        merged.insert(k, v);
    }
    Ok(merged)
}

/// Verifies every `Parameter`/`BooleanParam` reference in the tree is bound
/// in `bag`, raising a `SemanticViolation` for a declared parameter the
/// caller never bound.
pub fn check_params_bound(op: &Operation, bag: &ParamBag) -> Result<()> {
    let mut missing = Vec::new();
    collect_missing_operation(op, bag, &mut missing);
    report_missing(missing)
}

/// Like [`check_params_bound`], for a single value expression outside an
/// operation tree — used by the `INSERT`/`UPDATE` column-value checks,
/// which have no surrounding `Operation` to walk.
pub fn check_value_params_bound(expr: &ValueExpr, bag: &ParamBag) -> Result<()> {
    let mut missing = Vec::new();
    collect_missing_value(expr, bag, &mut missing);
    report_missing(missing)
}

/// Like [`check_params_bound`], for a standalone predicate (an
/// `UPDATE`/`DELETE` `WHERE` clause).
pub fn check_bool_params_bound(expr: &BoolExpr, bag: &ParamBag) -> Result<()> {
    let mut missing = Vec::new();
    collect_missing_bool(expr, bag, &mut missing);
    report_missing(missing)
}

fn report_missing(missing: Vec<compact_str::CompactString>) -> Result<()> {
    if let Some(name) = missing.into_iter().next() {
        return Err(DrizzleError::semantic(
            "unbound-parameter",
            format!("declared parameter `{name}` was never bound by the caller's parameter bag"),
        ));
    }
    Ok(())
}

fn collect_missing_operation(op: &Operation, bag: &ParamBag, out: &mut Vec<compact_str::CompactString>) {
    match op {
        Operation::From { .. } => {}
        Operation::Where { source, predicate } => {
            collect_missing_bool(predicate, bag, out);
            collect_missing_operation(source, bag, out);
        }
        Operation::Select { source, projection } => {
            collect_missing_projection(projection, bag, out);
            collect_missing_operation(source, bag, out);
        }
        Operation::OrderBy { source, key, .. } | Operation::ThenBy { source, key, .. } => {
            collect_missing_value(key, bag, out);
            collect_missing_operation(source, bag, out);
        }
        Operation::GroupBy { source, .. } => collect_missing_operation(source, bag, out),
        Operation::Join {
            source,
            inner,
            result,
            ..
        } => {
            if let Some(result) = result {
                collect_missing_projection(result, bag, out);
            }
            collect_missing_operation(source, bag, out);
            collect_missing_operation(inner, bag, out);
        }
        Operation::Take { source, count } | Operation::Skip { source, count } => {
            if let CountExpr::Expr(v) = count {
                collect_missing_value(v, bag, out);
            }
            collect_missing_operation(source, bag, out);
        }
        Operation::Distinct { source } | Operation::Reverse { source } => {
            collect_missing_operation(source, bag, out)
        }
        Operation::Union { source, other } => {
            collect_missing_operation(source, bag, out);
            collect_missing_operation(other, bag, out);
        }
        Operation::TerminalOp { source, terminal } => {
            collect_missing_terminal(terminal, bag, out);
            collect_missing_operation(source, bag, out);
        }
    }
}

fn collect_missing_terminal(terminal: &Terminal, bag: &ParamBag, out: &mut Vec<compact_str::CompactString>) {
    match terminal {
        Terminal::First { predicate }
        | Terminal::FirstOrDefault { predicate }
        | Terminal::Single { predicate }
        | Terminal::SingleOrDefault { predicate }
        | Terminal::Last { predicate }
        | Terminal::LastOrDefault { predicate }
        | Terminal::Count { predicate }
        | Terminal::Any { predicate } => {
            if let Some(p) = predicate {
                collect_missing_bool(p, bag, out);
            }
        }
        Terminal::All { predicate } => collect_missing_bool(predicate, bag, out),
        Terminal::Sum { selector }
        | Terminal::Average { selector }
        | Terminal::Min { selector }
        | Terminal::Max { selector } => collect_missing_value(selector, bag, out),
        Terminal::Contains { value } => collect_missing_value(value, bag, out),
        Terminal::ToArray => {}
    }
}

fn collect_missing_projection(projection: &Projection, bag: &ParamBag, out: &mut Vec<compact_str::CompactString>) {
    match projection {
        Projection::Value(v) => collect_missing_value(v, bag, out),
        Projection::Object(fields) => {
            for (_, v) in fields {
                collect_missing_value(v, bag, out);
            }
        }
    }
}

fn collect_missing_value(expr: &ValueExpr, bag: &ParamBag, out: &mut Vec<compact_str::CompactString>) {
    match expr {
        ValueExpr::Parameter { param, property } => {
            let key = param_bag_key(param, property.as_deref());
            if !key.starts_with(GENERATED_PREFIX) && !bag.contains_key(&key) {
                out.push(key);
            }
        }
        ValueExpr::Arithmetic { left, right, .. } | ValueExpr::Concat { left, right } => {
            collect_missing_value(left, bag, out);
            collect_missing_value(right, bag, out);
        }
        ValueExpr::Coalesce { value, default } => {
            collect_missing_value(value, bag, out);
            collect_missing_value(default, bag, out);
        }
        ValueExpr::Case { when, then, els } => {
            collect_missing_bool(when, bag, out);
            collect_missing_value(then, bag, out);
            collect_missing_value(els, bag, out);
        }
        ValueExpr::Cast { value, .. } => collect_missing_value(value, bag, out),
        ValueExpr::StringMethodCall { object, .. } => collect_missing_value(object, bag, out),
        ValueExpr::Window {
            partition_by,
            order_by,
            ..
        } => {
            for p in partition_by {
                collect_missing_value(p, bag, out);
            }
            for (o, _) in order_by {
                collect_missing_value(o, bag, out);
            }
        }
        ValueExpr::Column { .. } | ValueExpr::JoinColumn { .. } | ValueExpr::Constant { .. } => {}
    }
}

fn collect_missing_bool(expr: &BoolExpr, bag: &ParamBag, out: &mut Vec<compact_str::CompactString>) {
    match expr {
        BoolExpr::Comparison { left, right, .. } => {
            collect_missing_value(left, bag, out);
            collect_missing_value(right, bag, out);
        }
        BoolExpr::Logical { left, right, .. } => {
            collect_missing_bool(left, bag, out);
            collect_missing_bool(right, bag, out);
        }
        BoolExpr::Not(inner) => collect_missing_bool(inner, bag, out),
        BoolExpr::BooleanParam { param, property } => {
            let key = param_bag_key(param, property.as_deref());
            if !key.starts_with(GENERATED_PREFIX) && !bag.contains_key(&key) {
                out.push(key);
            }
        }
        BoolExpr::BooleanMethodCall { object, args, .. } => {
            collect_missing_value(object, bag, out);
            for a in args {
                collect_missing_value(a, bag, out);
            }
        }
        BoolExpr::In { value, list, .. } => {
            collect_missing_value(value, bag, out);
            if let InList::Values(values) = list {
                for v in values {
                    collect_missing_value(v, bag, out);
                }
            }
        }
        BoolExpr::IsNull { value, .. } => collect_missing_value(value, bag, out),
        BoolExpr::BooleanColumn { .. } | BoolExpr::BooleanConstant(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::CmpOp;

    #[test]
    fn literals_become_sequential_generated_params() {
        let mut expr = BoolExpr::Logical {
            op: crate::ir::LogicalOp::And,
            left: Box::new(BoolExpr::Comparison {
                op: CmpOp::Ge,
                left: ValueExpr::column("age"),
                right: ValueExpr::number(18.0),
            }),
            right: Box::new(BoolExpr::Comparison {
                op: CmpOp::Eq,
                left: ValueExpr::column("name"),
                right: ValueExpr::string("John"),
            }),
        };
        let mut ctx = ParamCtx::new();
        parameterize_bool(&mut expr, &mut ctx);
        assert_eq!(ctx.generated.get("__p1"), Some(&ParamValue::Number(18.0)));
        assert_eq!(
            ctx.generated.get("__p2"),
            Some(&ParamValue::String("John".into()))
        );
    }

    #[test]
    fn null_constant_is_never_parameterized() {
        let mut expr = ValueExpr::null();
        let mut ctx = ParamCtx::new();
        parameterize_value(&mut expr, &mut ctx);
        assert!(matches!(expr, ValueExpr::Constant { .. }));
        assert!(ctx.generated.is_empty());
    }

    #[test]
    fn caller_bag_using_reserved_prefix_is_rejected() {
        let mut caller = ParamBag::new();
        caller.insert("__p1".into(), ParamValue::Number(1.0));
        let err = merge_params(&caller, ParamBag::new()).unwrap_err();
        assert!(matches!(err, DrizzleError::SemanticViolation { .. }));
    }
}
