//! End-to-end checks against representative operation trees, each reproducing
//! one worked example end to end: builder chain in, `{sql, params}` out,
//! exercising `drizzle-core`'s compiler together with the PostgreSQL and
//! SQLite dialect crates.

use drizzle_core::builder::{Deletable, Queryable};
use drizzle_core::ir::{BoolExpr, CmpOp, CountExpr, InList, ParamValue, Projection};
use drizzle_core::ir::ValueExpr;
use drizzle_core::{compile_delete, compile_select, ParamBag};
use drizzle_postgres::PostgresEmitter;

#[test]
fn combined_and_predicate_renders_parenthesized_conjunction() {
    let op = Queryable::from("users")
        .where_(
            BoolExpr::Comparison {
                op: CmpOp::Ge,
                left: ValueExpr::column("age"),
                right: ValueExpr::number(18.0),
            }
            .and(BoolExpr::Comparison {
                op: CmpOp::Eq,
                left: ValueExpr::column("name"),
                right: ValueExpr::string("John"),
            }),
        )
        .build();

    let (sql, params) = compile_select(&op, ParamBag::new(), &PostgresEmitter).unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM \"users\" WHERE (\"age\" >= $(__p1) AND \"name\" = $(__p2))"
    );
    assert_eq!(params.get("__p1"), Some(&ParamValue::Number(18.0)));
    assert_eq!(params.get("__p2"), Some(&ParamValue::String("John".into())));
}

#[test]
fn chained_where_skip_take_matches_expected_ordering() {
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
        .order_by_descending(ValueExpr::column("price"))
        .skip(CountExpr::Literal(10))
        .take(CountExpr::Literal(5))
        .build();

    let (sql, params) = compile_select(&op, ParamBag::new(), &PostgresEmitter).unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM \"products\" WHERE \"price\" > $(__p1) AND \"discount\" <= $(__p2) ORDER BY \"price\" DESC LIMIT $(__p4) OFFSET $(__p3)"
    );
    assert_eq!(params.get("__p1"), Some(&ParamValue::Number(100.0)));
    assert_eq!(params.get("__p2"), Some(&ParamValue::Number(0.5)));
    assert_eq!(params.get("__p3"), Some(&ParamValue::Number(10.0)));
    assert_eq!(params.get("__p4"), Some(&ParamValue::Number(5.0)));
}

#[test]
fn join_projects_both_sides_through_fixed_aliases() {
    let op = Queryable::from("users")
        .join(
            Queryable::from("departments"),
            "departmentId",
            "id",
            Some(Projection::Object(vec![
                (
                    "userName".into(),
                    ValueExpr::JoinColumn {
                        side: drizzle_core::ir::JoinSide::Outer,
                        name: "name".into(),
                    },
                ),
                (
                    "deptName".into(),
                    ValueExpr::JoinColumn {
                        side: drizzle_core::ir::JoinSide::Inner,
                        name: "name".into(),
                    },
                ),
            ])),
        )
        .build();

    let (sql, _) = compile_select(&op, ParamBag::new(), &PostgresEmitter).unwrap();
    assert_eq!(
        sql,
        "SELECT \"t0\".\"name\" AS \"userName\", \"t1\".\"name\" AS \"deptName\" FROM \"users\" AS \"t0\" INNER JOIN \"departments\" AS \"t1\" ON \"t0\".\"departmentId\" = \"t1\".\"id\""
    );
}

#[test]
fn delete_with_array_literal_in_list_expands_to_one_placeholder_per_element() {
    let stmt = Deletable::new()
        .where_(BoolExpr::In {
            value: ValueExpr::column("id"),
            list: InList::Values(vec![ValueExpr::number(1.0), ValueExpr::number(2.0), ValueExpr::number(3.0)]),
            negated: false,
        })
        .build("users");

    let (sql, params) = compile_delete(&stmt, ParamBag::new(), &PostgresEmitter).unwrap();
    assert_eq!(
        sql,
        "DELETE FROM \"users\" WHERE \"id\" IN ($(__p1), $(__p2), $(__p3))"
    );
    assert_eq!(params.len(), 3);
}

#[test]
fn delete_without_where_or_opt_in_is_rejected() {
    let stmt = Deletable::new().build("users");
    let err = compile_delete(&stmt, ParamBag::new(), &PostgresEmitter).unwrap_err();
    assert!(matches!(err, drizzle_core::error::DrizzleError::SemanticViolation { .. }));
}

#[test]
fn delete_with_allow_full_table_has_no_where() {
    let stmt = Deletable::new().allow_full_table_delete().build("users");
    let (sql, _) = compile_delete(&stmt, ParamBag::new(), &PostgresEmitter).unwrap();
    assert_eq!(sql, "DELETE FROM \"users\"");
}

#[test]
fn any_lowers_to_a_case_wrapped_exists() {
    let op = Queryable::from("users").any(Some(BoolExpr::Comparison {
        op: CmpOp::Ge,
        left: ValueExpr::column("age"),
        right: ValueExpr::number(18.0),
    }));
    let (sql, params) = compile_select(&op, ParamBag::new(), &PostgresEmitter).unwrap();
    assert_eq!(
        sql,
        "SELECT CASE WHEN EXISTS(SELECT 1 FROM \"users\" WHERE \"age\" >= $(__p1)) THEN 1 ELSE 0 END"
    );
    assert_eq!(params.get("__p1"), Some(&ParamValue::Number(18.0)));
}

#[test]
fn all_lowers_to_a_case_wrapped_not_exists() {
    let op = Queryable::from("users").all(BoolExpr::BooleanColumn { name: "isActive".into() });
    let (sql, params) = compile_select(&op, ParamBag::new(), &PostgresEmitter).unwrap();
    assert_eq!(
        sql,
        "SELECT CASE WHEN NOT EXISTS(SELECT 1 FROM \"users\" WHERE NOT (\"isActive\")) THEN 1 ELSE 0 END"
    );
    assert!(params.is_empty());
}
