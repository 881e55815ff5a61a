//! Property-based checks for the testable properties of the compiler's
//! contract: determinism, parameter closure, no-literal-leakage, chained-
//! where conjunction equivalence, and `last()`/`first()` reversal symmetry.
//! A small local [`Emitter`] stands in for a real dialect crate — these
//! properties hold at the core emission layer, independent of placeholder
//! spelling.

use drizzle_core::builder::Queryable;
use drizzle_core::emit::Emitter;
use drizzle_core::ir::{BoolExpr, CmpOp, Direction, ValueExpr};
use drizzle_core::{compile_select, ParamBag};
use drizzle_types::Dialect;
use proptest::prelude::*;

#[derive(Debug, Default, Clone, Copy)]
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

fn string_literal() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-zA-Z0-9 ]{0,12}",
        Just("O'Brien".to_string()),
        Just("she said \"hi\"".to_string()),
        Just("users; DROP TABLE users; --".to_string()),
        Just("café — naïve".to_string()),
    ]
}

proptest! {
    /// Property 1: determinism — compiling the same tree twice yields
    /// byte-identical SQL and the same parameter key order.
    #[test]
    fn compilation_is_deterministic(age in 0i64..120, name in string_literal()) {
        let build = || {
            Queryable::from("users")
                .where_(
                    BoolExpr::Comparison { op: CmpOp::Ge, left: ValueExpr::column("age"), right: ValueExpr::number(age as f64) }
                        .and(BoolExpr::Comparison { op: CmpOp::Eq, left: ValueExpr::column("name"), right: ValueExpr::string(name.as_str()) }),
                )
                .build()
        };

        let (sql_a, params_a) = compile_select(&build(), ParamBag::new(), &TestEmitter).unwrap();
        let (sql_b, params_b) = compile_select(&build(), ParamBag::new(), &TestEmitter).unwrap();

        prop_assert_eq!(&sql_a, &sql_b);
        prop_assert_eq!(params_a.keys().collect::<Vec<_>>(), params_b.keys().collect::<Vec<_>>());
    }

    /// Property 2: parameter closure — every generated `$(__pN)` token that
    /// appears in the SQL text has a matching bag entry, and every bag
    /// entry's placeholder actually appears in the SQL text.
    #[test]
    fn every_placeholder_has_a_matching_param_and_vice_versa(age in 0i64..120, name in string_literal()) {
        let op = Queryable::from("users")
            .where_(
                BoolExpr::Comparison { op: CmpOp::Ge, left: ValueExpr::column("age"), right: ValueExpr::number(age as f64) }
                    .and(BoolExpr::Comparison { op: CmpOp::Eq, left: ValueExpr::column("name"), right: ValueExpr::string(name.as_str()) }),
            )
            .build();

        let (sql, params) = compile_select(&op, ParamBag::new(), &TestEmitter).unwrap();

        for key in params.keys() {
            let token = format!("$({key})");
            prop_assert!(sql.contains(&token), "sql `{sql}` is missing placeholder for bound key `{key}`");
        }
        // every `$(...)` token in the SQL names a bag key
        let mut rest = sql.as_str();
        while let Some(start) = rest.find("$(") {
            let after = &rest[start + 2..];
            let end = after.find(')').expect("unterminated placeholder");
            let key = &after[..end];
            prop_assert!(params.contains_key(key), "sql references unbound placeholder `{key}`");
            rest = &after[end + 1..];
        }
    }

    /// Property 3: no literal leakage — an arbitrary string literal never
    /// appears verbatim in the emitted SQL, regardless of the characters it
    /// contains.
    #[test]
    fn string_literals_never_leak_into_the_sql_text(name in string_literal()) {
        prop_assume!(!name.is_empty());
        let op = Queryable::from("users")
            .where_(BoolExpr::Comparison { op: CmpOp::Eq, left: ValueExpr::column("name"), right: ValueExpr::string(name.as_str()) })
            .build();

        let (sql, params) = compile_select(&op, ParamBag::new(), &TestEmitter).unwrap();

        prop_assert!(!sql.contains(name.as_str()), "literal `{name}` leaked into sql `{sql}`");
        prop_assert_eq!(params.len(), 1);
    }

    /// Property 6: chained `.where_(A).where_(B)` is equivalent (modulo
    /// outer parentheses) to a single `.where_(A.and(B))`.
    #[test]
    fn chained_where_matches_explicit_conjunction(age in 0i64..120) {
        let a = || BoolExpr::Comparison { op: CmpOp::Ge, left: ValueExpr::column("age"), right: ValueExpr::number(age as f64) };
        let b = || BoolExpr::Comparison { op: CmpOp::Eq, left: ValueExpr::column("active"), right: ValueExpr::boolean(true) };

        let chained = Queryable::from("users").where_(a()).where_(b()).build();
        let combined = Queryable::from("users").where_(a().and(b())).build();

        let (chained_sql, chained_params) = compile_select(&chained, ParamBag::new(), &TestEmitter).unwrap();
        let (combined_sql, combined_params) = compile_select(&combined, ParamBag::new(), &TestEmitter).unwrap();

        let chained_where = chained_sql.split("WHERE ").nth(1).unwrap();
        let combined_where = combined_sql.split("WHERE ").nth(1).unwrap();
        let combined_unwrapped = combined_where.strip_prefix('(').and_then(|s| s.strip_suffix(')')).unwrap_or(combined_where);

        prop_assert_eq!(chained_where, combined_unwrapped);
        prop_assert_eq!(chained_params.len(), combined_params.len());
    }

    /// Property 7: `last()` reversal — appending `.last()` to a chain
    /// ordered one direction matches flipping the direction and appending
    /// `.first()` instead.
    #[test]
    fn last_matches_first_with_flipped_direction(descending in any::<bool>()) {
        let (last_op, direction) = if descending {
            (Queryable::from("users").order_by_descending(ValueExpr::column("id")).last(None), Direction::Asc)
        } else {
            (Queryable::from("users").order_by(ValueExpr::column("id")).last(None), Direction::Desc)
        };
        let first_op = match direction {
            Direction::Asc => Queryable::from("users").order_by(ValueExpr::column("id")).first(None),
            Direction::Desc => Queryable::from("users").order_by_descending(ValueExpr::column("id")).first(None),
        };

        let (last_sql, _) = compile_select(&last_op, ParamBag::new(), &TestEmitter).unwrap();
        let (first_sql, _) = compile_select(&first_op, ParamBag::new(), &TestEmitter).unwrap();

        prop_assert_eq!(last_sql, first_sql);
    }
}
