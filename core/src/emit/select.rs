//! `SELECT` emission: terminal lowering, canonical clause
//! assembly, and the subquery-wrapping rule that gives `select` followed by
//! further ops — most concretely, a window-function alias filtered by a
//! later `where` — a derived-table boundary.

use super::expr::{render_bool, render_value, ExprCtx};
use super::{AliasCtx, Emitter, JOIN_INNER_ALIAS, JOIN_OUTER_ALIAS};
use crate::error::{DrizzleError, Result};
use crate::ir::{
    BoolExpr, CmpOp, CountExpr, Direction, Operation, ParamBag, ParamValue, Projection, Terminal,
    ValueExpr,
};
use crate::paramize::{check_params_bound, expand_in_lists, merge_params, parameterize_operation, ParamCtx};
use crate::prelude::*;

/// What the `SELECT` list (or the statement's overall shape) should be,
/// once a terminal has been lowered into ordinary operation-tree nodes plus
/// this residual.
enum TerminalShape {
    /// Render the operation tree's own projection (or `*`) normally.
    Rows,
    CountStar,
    Aggregate(&'static str, ValueExpr),
    /// `count() > 0` via `EXISTS (...)` — used by `any()` and `contains()`.
    ExistsPositive,
    /// `NOT EXISTS (SELECT 1 ... WHERE NOT (predicate))` — `all()`.
    ExistsNegated,
}

/// Rewrites a `Terminal` into ordinary operation-tree nodes (`where` folded
/// in, `take`/`reverse` appended) plus a residual [`TerminalShape`]
/// describing anything that can't be expressed as another operation node.
fn lower_terminal(op: Operation) -> Result<(Operation, TerminalShape)> {
    match op {
        Operation::TerminalOp { source, terminal } => {
            let source = *source;
            match terminal {
                Terminal::First { predicate } | Terminal::FirstOrDefault { predicate } => Ok((
                    Operation::Take {
                        source: Box::new(fold_predicate(source, predicate)),
                        count: CountExpr::Literal(1),
                    },
                    TerminalShape::Rows,
                )),
                // LIMIT 2 so a caller-side check can distinguish "exactly
                // one row" from "more than one", which `single()` requires
                // but no single `LIMIT` value alone can express.
                Terminal::Single { predicate } | Terminal::SingleOrDefault { predicate } => Ok((
                    Operation::Take {
                        source: Box::new(fold_predicate(source, predicate)),
                        count: CountExpr::Literal(2),
                    },
                    TerminalShape::Rows,
                )),
                Terminal::Last { predicate } | Terminal::LastOrDefault { predicate } => {
                    let folded = fold_predicate(source, predicate);
                    Ok((
                        Operation::Take {
                            source: Box::new(Operation::Reverse {
                                source: Box::new(folded),
                            }),
                            count: CountExpr::Literal(1),
                        },
                        TerminalShape::Rows,
                    ))
                }
                Terminal::Count { predicate } => Ok((fold_predicate(source, predicate), TerminalShape::CountStar)),
                Terminal::Any { predicate } => Ok((fold_predicate(source, predicate), TerminalShape::ExistsPositive)),
                Terminal::All { predicate } => Ok((
                    Operation::Where {
                        source: Box::new(source),
                        predicate: BoolExpr::Not(Box::new(predicate)),
                    },
                    TerminalShape::ExistsNegated,
                )),
                Terminal::Sum { selector } => Ok((source, TerminalShape::Aggregate("SUM", selector))),
                Terminal::Average { selector } => Ok((source, TerminalShape::Aggregate("AVG", selector))),
                Terminal::Min { selector } => Ok((source, TerminalShape::Aggregate("MIN", selector))),
                Terminal::Max { selector } => Ok((source, TerminalShape::Aggregate("MAX", selector))),
                Terminal::Contains { value } => {
                    let projected = scalar_projection_of(&source)?;
                    Ok((
                        Operation::Where {
                            source: Box::new(source),
                            predicate: BoolExpr::Comparison {
                                op: CmpOp::Eq,
                                left: projected,
                                right: value,
                            },
                        },
                        TerminalShape::ExistsPositive,
                    ))
                }
                Terminal::ToArray => Ok((source, TerminalShape::Rows)),
            }
        }
        other => Ok((other, TerminalShape::Rows)),
    }
}

fn fold_predicate(source: Operation, predicate: Option<BoolExpr>) -> Operation {
    match predicate {
        Some(predicate) => Operation::Where {
            source: Box::new(source),
            predicate,
        },
        None => source,
    }
}

fn scalar_projection_of(op: &Operation) -> Result<ValueExpr> {
    match op {
        Operation::Select {
            projection: Projection::Value(v),
            ..
        } => Ok(v.clone()),
        _ => Err(DrizzleError::unsupported(
            "contains",
            "contains(...) requires a preceding select(...) producing a single scalar column",
        )),
    }
}

/// The accumulated clauses for one `SELECT`, collected by walking the
/// operation tree bottom-up (source first, then this node's own effect) so
/// multi-call chains (`where().where()`, `orderBy().thenBy()`) land in call
/// order without an extra reversal step.
struct Stage<'a> {
    distinct: bool,
    projection: Option<&'a Projection>,
    from_sql: String,
    /// Set only when `from_sql` is a derived table and nothing else
    /// (namely a join) is about to alias it itself.
    from_alias: Option<compact_str::CompactString>,
    wheres: Vec<&'a BoolExpr>,
    order_by: Vec<(&'a ValueExpr, Direction)>,
    group_by: Option<&'a str>,
    join: Option<JoinInfo<'a>>,
    take: Option<&'a CountExpr>,
    skip: Option<&'a CountExpr>,
    reverse_flips: u32,
}

struct JoinInfo<'a> {
    inner_sql: String,
    outer_key: &'a str,
    inner_key: &'a str,
    result: Option<&'a Projection>,
}

impl<'a> Stage<'a> {
    fn base(from_sql: String) -> Self {
        Stage {
            distinct: false,
            projection: None,
            from_sql,
            from_alias: None,
            wheres: Vec::new(),
            order_by: Vec::new(),
            group_by: None,
            join: None,
            take: None,
            skip: None,
            reverse_flips: 0,
        }
    }
}

/// Resolves a node's `source`, wrapping it as a derived table first if it's
/// a `Select` or `Union` — the general form of the "further op after
/// select produces a nested subquery" rule, which also
/// covers window-function-alias filtering without a special case.
fn resolve_source<'a, E: Emitter>(
    source: &'a Operation,
    ctx: &mut AliasCtx,
    emitter: &E,
) -> Result<Stage<'a>> {
    match source {
        Operation::Select { .. } | Operation::Union { .. } => {
            let inner_sql = render_root(source, ctx, emitter, TerminalShape::Rows)?;
            let alias = ctx.fresh();
            let mut stage = Stage::base(format!("({inner_sql})"));
            stage.from_alias = Some(alias);
            Ok(stage)
        }
        other => build_stage(other, ctx, emitter),
    }
}

fn build_stage<'a, E: Emitter>(op: &'a Operation, ctx: &mut AliasCtx, emitter: &E) -> Result<Stage<'a>> {
    match op {
        Operation::From { table } => {
            let mut sql = String::new();
            emitter.quote_ident(table, &mut sql);
            Ok(Stage::base(sql))
        }
        Operation::Where { source, predicate } => {
            let mut stage = resolve_source(source, ctx, emitter)?;
            stage.wheres.push(predicate);
            Ok(stage)
        }
        Operation::Select { source, projection } => {
            let mut stage = resolve_source(source, ctx, emitter)?;
            stage.projection = Some(projection);
            Ok(stage)
        }
        Operation::OrderBy { source, key, direction } => {
            let mut stage = resolve_source(source, ctx, emitter)?;
            stage.order_by.push((key, *direction));
            Ok(stage)
        }
        Operation::ThenBy { source, key, direction } => {
            let mut stage = resolve_source(source, ctx, emitter)?;
            if stage.order_by.is_empty() {
                return Err(DrizzleError::semantic(
                    "then-by-without-order-by",
                    "thenBy has no prior orderBy in scope",
                ));
            }
            stage.order_by.push((key, *direction));
            Ok(stage)
        }
        Operation::GroupBy { source, key } => {
            let mut stage = resolve_source(source, ctx, emitter)?;
            if stage.group_by.is_some() {
                return Err(DrizzleError::semantic("duplicate-group-by", "groupBy called more than once"));
            }
            stage.group_by = Some(key);
            Ok(stage)
        }
        Operation::Join {
            source,
            inner,
            outer_key,
            inner_key,
            result,
        } => {
            let mut stage = resolve_source(source, ctx, emitter)?;
            if stage.join.is_some() {
                return Err(DrizzleError::semantic("duplicate-join", "join called more than once"));
            }
            let inner_sql = match inner.as_ref() {
                Operation::From { table } => {
                    let mut sql = String::new();
                    emitter.quote_ident(table, &mut sql);
                    sql
                }
                other => format!("({})", render_root(other, ctx, emitter, TerminalShape::Rows)?),
            };
            stage.join = Some(JoinInfo {
                inner_sql,
                outer_key,
                inner_key,
                result: result.as_ref(),
            });
            Ok(stage)
        }
        Operation::Take { source, count } => {
            let mut stage = resolve_source(source, ctx, emitter)?;
            if stage.take.is_some() {
                return Err(DrizzleError::semantic("duplicate-take", "take called more than once"));
            }
            stage.take = Some(count);
            Ok(stage)
        }
        Operation::Skip { source, count } => {
            let mut stage = resolve_source(source, ctx, emitter)?;
            if stage.skip.is_some() {
                return Err(DrizzleError::semantic("duplicate-skip", "skip called more than once"));
            }
            stage.skip = Some(count);
            Ok(stage)
        }
        Operation::Distinct { source } => {
            let mut stage = resolve_source(source, ctx, emitter)?;
            stage.distinct = true;
            Ok(stage)
        }
        Operation::Reverse { source } => {
            let mut stage = resolve_source(source, ctx, emitter)?;
            stage.reverse_flips += 1;
            Ok(stage)
        }
        Operation::Union { .. } => unreachable!("a root Union is handled by render_root before reaching build_stage"),
        Operation::TerminalOp { .. } => Err(DrizzleError::semantic(
            "terminal-not-root",
            "a terminal operator must be the root of its chain",
        )),
    }
}

fn render_count<E: Emitter>(count: &CountExpr, ctx: &ExprCtx<E>, out: &mut String) -> Result<()> {
    match count {
        CountExpr::Literal(n) => out.push_str(&n.to_string()),
        CountExpr::Expr(v) => render_value(v, ctx, out)?,
    }
    Ok(())
}

fn assemble<E: Emitter>(stage: &Stage, emitter: &E, shape: &TerminalShape) -> Result<String> {
    let ectx = if stage.join.is_some() {
        ExprCtx::in_join(emitter)
    } else {
        ExprCtx::new(emitter)
    };

    let mut sql = String::from("SELECT ");
    if stage.distinct {
        sql.push_str("DISTINCT ");
    }

    match shape {
        TerminalShape::Rows => {
            let projection = stage.projection.or_else(|| stage.join.as_ref().and_then(|j| j.result));
            match projection {
                None => sql.push('*'),
                Some(Projection::Value(v)) => render_value(v, &ectx, &mut sql)?,
                Some(Projection::Object(fields)) => {
                    for (i, (alias, v)) in fields.iter().enumerate() {
                        if i > 0 {
                            sql.push_str(", ");
                        }
                        render_value(v, &ectx, &mut sql)?;
                        sql.push_str(" AS ");
                        emitter.quote_ident(alias, &mut sql);
                    }
                }
            }
        }
        TerminalShape::CountStar => sql.push_str("COUNT(*)"),
        TerminalShape::Aggregate(func, selector) => {
            sql.push_str(func);
            sql.push('(');
            render_value(selector, &ectx, &mut sql)?;
            sql.push(')');
        }
        TerminalShape::ExistsPositive | TerminalShape::ExistsNegated => sql.push('1'),
    }

    sql.push_str(" FROM ");
    sql.push_str(&stage.from_sql);
    if let Some(join) = &stage.join {
        sql.push_str(&format!(" AS \"{JOIN_OUTER_ALIAS}\" INNER JOIN "));
        sql.push_str(&join.inner_sql);
        sql.push_str(&format!(" AS \"{JOIN_INNER_ALIAS}\" ON "));
        qualify_into(JOIN_OUTER_ALIAS, join.outer_key, emitter, &mut sql);
        sql.push_str(" = ");
        qualify_into(JOIN_INNER_ALIAS, join.inner_key, emitter, &mut sql);
    } else if let Some(alias) = &stage.from_alias {
        sql.push_str(" AS \"");
        sql.push_str(alias);
        sql.push('"');
    }

    if !stage.wheres.is_empty() {
        sql.push_str(" WHERE ");
        for (i, w) in stage.wheres.iter().enumerate() {
            if i > 0 {
                sql.push_str(" AND ");
            }
            render_bool(w, &ectx, &mut sql)?;
        }
    }

    if let Some(key) = stage.group_by {
        sql.push_str(" GROUP BY ");
        if stage.join.is_some() {
            qualify_into(JOIN_OUTER_ALIAS, key, emitter, &mut sql);
        } else {
            emitter.quote_ident(key, &mut sql);
        }
    }

    if !stage.order_by.is_empty() {
        sql.push_str(" ORDER BY ");
        for (i, (key, dir)) in stage.order_by.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            render_value(key, &ectx, &mut sql)?;
            let dir = if stage.reverse_flips % 2 == 1 { dir.flipped() } else { *dir };
            sql.push_str(match dir {
                Direction::Asc => " ASC",
                Direction::Desc => " DESC",
            });
        }
    } else if stage.reverse_flips % 2 == 1 {
        // `.last()`/`.reverse()` on a chain with no established ordering:
        // row order is otherwise unspecified, so pin it to the ordinal
        // position, descending, rather than leave it nondeterministic.
        sql.push_str(" ORDER BY 1 DESC");
    }

    match (&stage.take, &stage.skip) {
        (Some(take), Some(skip)) => {
            sql.push_str(" LIMIT ");
            render_count(take, &ectx, &mut sql)?;
            sql.push_str(" OFFSET ");
            render_count(skip, &ectx, &mut sql)?;
        }
        (Some(take), None) => {
            sql.push_str(" LIMIT ");
            render_count(take, &ectx, &mut sql)?;
        }
        (None, Some(skip)) => {
            if emitter.requires_limit_sentinel() {
                sql.push_str(" LIMIT -1 OFFSET ");
            } else {
                sql.push_str(" OFFSET ");
            }
            render_count(skip, &ectx, &mut sql)?;
        }
        (None, None) => {}
    }

    match shape {
        TerminalShape::ExistsPositive => Ok(format!("SELECT CASE WHEN EXISTS({sql}) THEN 1 ELSE 0 END")),
        TerminalShape::ExistsNegated => Ok(format!("SELECT CASE WHEN NOT EXISTS({sql}) THEN 1 ELSE 0 END")),
        _ => Ok(sql),
    }
}

fn qualify_into(alias: &str, name: &str, emitter: &impl Emitter, out: &mut String) {
    out.push('"');
    out.push_str(alias);
    out.push_str("\".");
    emitter.quote_ident(name, out);
}

/// Renders one complete `SELECT` statement (no outer parameterization) —
/// the shared core both [`compile_select`] and `resolve_source`'s subquery
/// wrapping call into.
fn render_root<E: Emitter>(op: &Operation, ctx: &mut AliasCtx, emitter: &E, shape: TerminalShape) -> Result<String> {
    if let Operation::Union { source, other } = op {
        let left = render_root(source, ctx, emitter, TerminalShape::Rows)?;
        let right = render_root(other, ctx, emitter, TerminalShape::Rows)?;
        let union_sql = format!("{left} UNION {right}");
        return match shape {
            TerminalShape::Rows => Ok(union_sql),
            // A terminal (`count()`, `any()`, ...) reducing straight to a
            // bare `Union` with nothing else wrapping it — give the union
            // a derived-table alias so the residual shape can still apply.
            other_shape => {
                let alias = ctx.fresh();
                let mut stage = Stage::base(format!("({union_sql})"));
                stage.from_alias = Some(alias);
                assemble(&stage, emitter, &other_shape)
            }
        };
    }
    let stage = build_stage(op, ctx, emitter)?;
    assemble(&stage, emitter, &shape)
}

/// Compiles a whole `SELECT` chain: runs
/// auto-parameterization, merges the caller's parameter bag, expands any
/// array-parameter `In` lists, verifies every reference is bound, then
/// emits SQL for the given dialect.
pub fn compile_select<E: Emitter>(op: &Operation, caller_params: ParamBag, emitter: &E) -> Result<(String, ParamBag)> {
    let (lowered, shape) = lower_terminal(op.clone())?;
    let mut working = lowered;

    let mut ctx = ParamCtx::new();
    parameterize_operation(&mut working, &mut ctx);
    let mut bag = merge_params(&caller_params, core::mem::take(&mut ctx.generated))?;

    expand_in_lists(&mut working, &bag, &mut ctx)?;
    bag = merge_params(&bag, core::mem::take(&mut ctx.generated))?;

    check_params_bound(&working, &bag)?;

    let mut alias_ctx = AliasCtx::default();
    let sql = render_root(&working, &mut alias_ctx, emitter, shape)?;
    crate::drizzle_trace_query!(&sql, bag.len());
    Ok((sql, bag))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::Queryable;
    use crate::ir::{CmpOp, LogicalOp};
    use drizzle_types::Dialect;

    struct TestEmitter;
    impl Emitter for TestEmitter {
        fn dialect(&self) -> Dialect {
            Dialect::PostgreSql
        }
        fn write_placeholder(&self, name: &str, out: &mut String) {
            out.push_str("$(");
            out.push_str(name);
            out.push(')');
        }
    }

    #[test]
    fn simple_where_emits_named_placeholder() {
        let op = Queryable::from("users")
            .where_(BoolExpr::Comparison {
                op: CmpOp::Gt,
                left: ValueExpr::column("age"),
                right: ValueExpr::number(18.0),
            })
            .build();
        let (sql, params) = compile_select(&op, ParamBag::new(), &TestEmitter).unwrap();
        assert_eq!(sql, "SELECT * FROM \"users\" WHERE \"age\" > $(__p1)");
        assert_eq!(params.get("__p1"), Some(&ParamValue::Number(18.0)));
    }

    #[test]
    fn chained_where_calls_and_in_call_order() {
        let op = Queryable::from("products")
            .where_(BoolExpr::Comparison {
                op: CmpOp::Gt,
                left: ValueExpr::column("price"),
                right: ValueExpr::number(100.0),
            })
            .where_(BoolExpr::Comparison {
                op: CmpOp::Le,
                left: ValueExpr::column("discount"),
                right: ValueExpr::number(0.5),
            })
            .build();
        let (sql, _) = compile_select(&op, ParamBag::new(), &TestEmitter).unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM \"products\" WHERE \"price\" > $(__p1) AND \"discount\" <= $(__p2)"
        );
    }

    #[test]
    fn first_lowers_to_limit_one() {
        let op = Queryable::from("users").first(None);
        let (sql, _) = compile_select(&op, ParamBag::new(), &TestEmitter).unwrap();
        assert_eq!(sql, "SELECT * FROM \"users\" LIMIT 1");
    }

    #[test]
    fn count_lowers_to_count_star() {
        let op = Queryable::from("users").count(None);
        let (sql, _) = compile_select(&op, ParamBag::new(), &TestEmitter).unwrap();
        assert_eq!(sql, "SELECT COUNT(*) FROM \"users\"");
    }

    #[test]
    fn any_wraps_in_exists() {
        let op = Queryable::from("users").any(Some(BoolExpr::Comparison {
            op: CmpOp::Eq,
            left: ValueExpr::column("id"),
            right: ValueExpr::number(1.0),
        }));
        let (sql, _) = compile_select(&op, ParamBag::new(), &TestEmitter).unwrap();
        assert_eq!(
            sql,
            "SELECT CASE WHEN EXISTS(SELECT 1 FROM \"users\" WHERE \"id\" = $(__p1)) THEN 1 ELSE 0 END"
        );
    }

    #[test]
    fn all_wraps_in_not_exists() {
        let op = Queryable::from("users").all(BoolExpr::BooleanColumn { name: "isActive".into() });
        let (sql, params) = compile_select(&op, ParamBag::new(), &TestEmitter).unwrap();
        assert_eq!(
            sql,
            "SELECT CASE WHEN NOT EXISTS(SELECT 1 FROM \"users\" WHERE NOT (\"isActive\")) THEN 1 ELSE 0 END"
        );
        assert!(params.is_empty());
    }

    #[test]
    fn single_lowers_to_limit_two() {
        let op = Queryable::from("users").single(None);
        let (sql, _) = compile_select(&op, ParamBag::new(), &TestEmitter).unwrap();
        assert_eq!(sql, "SELECT * FROM \"users\" LIMIT 2");
    }

    #[test]
    fn empty_in_list_renders_boolean_constant_false() {
        let op = Queryable::from("users")
            .where_(BoolExpr::BooleanConstant(false))
            .build();
        let (sql, params) = compile_select(&op, ParamBag::new(), &TestEmitter).unwrap();
        assert_eq!(sql, "SELECT * FROM \"users\" WHERE FALSE");
        assert!(params.is_empty());
    }

    #[test]
    fn negated_empty_in_list_renders_not_false() {
        let op = Queryable::from("users")
            .where_(BoolExpr::Not(Box::new(BoolExpr::BooleanConstant(false))))
            .build();
        let (sql, _) = compile_select(&op, ParamBag::new(), &TestEmitter).unwrap();
        assert_eq!(sql, "SELECT * FROM \"users\" WHERE NOT (FALSE)");
    }

    #[test]
    fn last_without_prior_ordering_falls_back_to_ordinal_descending() {
        let op = Queryable::from("users").last(None);
        let (sql, _) = compile_select(&op, ParamBag::new(), &TestEmitter).unwrap();
        assert_eq!(sql, "SELECT * FROM \"users\" ORDER BY 1 DESC LIMIT 1");
    }

    #[test]
    fn last_with_prior_ordering_flips_the_existing_direction() {
        let op = Queryable::from("users")
            .order_by(ValueExpr::column("id"))
            .last(None);
        let (sql, _) = compile_select(&op, ParamBag::new(), &TestEmitter).unwrap();
        assert_eq!(sql, "SELECT * FROM \"users\" ORDER BY \"id\" DESC LIMIT 1");
    }

    #[test]
    fn then_by_without_order_by_in_hand_built_tree_is_rejected() {
        let op = Operation::ThenBy {
            source: Box::new(Operation::From { table: "t".into() }),
            key: ValueExpr::column("x"),
            direction: Direction::Asc,
        };
        let err = compile_select(&op, ParamBag::new(), &TestEmitter).unwrap_err();
        assert!(matches!(err, DrizzleError::SemanticViolation { .. }));
    }

    #[test]
    fn caller_param_binds_named_placeholder() {
        let op = Queryable::from("users")
            .where_(BoolExpr::Comparison {
                op: CmpOp::Ge,
                left: ValueExpr::column("age"),
                right: ValueExpr::param("minAge"),
            })
            .build();
        let mut caller = ParamBag::new();
        caller.insert("minAge".into(), ParamValue::Number(21.0));
        let (sql, params) = compile_select(&op, caller, &TestEmitter).unwrap();
        assert_eq!(sql, "SELECT * FROM \"users\" WHERE \"age\" >= $(minAge)");
        assert_eq!(params.get("minAge"), Some(&ParamValue::Number(21.0)));
    }

    #[test]
    fn unbound_parameter_is_rejected() {
        let op = Queryable::from("users")
            .where_(BoolExpr::Comparison {
                op: CmpOp::Ge,
                left: ValueExpr::column("age"),
                right: ValueExpr::param("minAge"),
            })
            .build();
        let err = compile_select(&op, ParamBag::new(), &TestEmitter).unwrap_err();
        assert!(matches!(err, DrizzleError::SemanticViolation { .. }));
    }

    #[test]
    fn logical_and_parenthesizes_nested_expression() {
        let predicate = BoolExpr::Logical {
            op: LogicalOp::And,
            left: Box::new(BoolExpr::Comparison {
                op: CmpOp::Gt,
                left: ValueExpr::column("age"),
                right: ValueExpr::number(18.0),
            }),
            right: Box::new(BoolExpr::Comparison {
                op: CmpOp::Eq,
                left: ValueExpr::column("active"),
                right: ValueExpr::boolean(true),
            }),
        };
        let op = Queryable::from("users").where_(predicate).build();
        let (sql, _) = compile_select(&op, ParamBag::new(), &TestEmitter).unwrap();
        assert_eq!(
            sql,
            "SELECT * FROM \"users\" WHERE (\"age\" > $(__p1) AND \"active\" = $(__p2))"
        );
    }
}
