//! Cross-dialect golden-SQL checks for the SQLite emitter: exact rendered
//! text for a handful of representative operation trees, covering
//! placeholder spelling, identifier quoting, and the `LIMIT` sentinel.

use drizzle_core::builder::{Deletable, Insertable, Queryable, Updatable};
use drizzle_core::ir::{BoolExpr, CmpOp, CountExpr, ParamValue, Returning, ValueExpr};
use drizzle_core::{compile_delete, compile_insert, compile_select, compile_update, ParamBag};
use drizzle_core::error::DrizzleError;
use drizzle_sqlite::SqliteEmitter;

#[test]
fn select_with_where_and_order_renders_expected_sql() {
    let op = Queryable::from("users")
        .where_(BoolExpr::Comparison {
            op: CmpOp::Ge,
            left: ValueExpr::column("age"),
            right: ValueExpr::param("min_age"),
        })
        .order_by(ValueExpr::column("name"))
        .take(CountExpr::Literal(10))
        .build();

    let mut caller = ParamBag::new();
    caller.insert("min_age".into(), ParamValue::Number(21.0));
    let (sql, params) = compile_select(&op, caller, &SqliteEmitter).unwrap();
    assert_eq!(
        sql,
        "SELECT * FROM \"users\" WHERE \"age\" >= @min_age ORDER BY \"name\" ASC LIMIT 10"
    );
    assert_eq!(params.get("min_age"), Some(&ParamValue::Number(21.0)));
}

#[test]
fn offset_only_page_uses_sqlite_limit_sentinel() {
    let op = Queryable::from("users").skip(CountExpr::Literal(20)).build();
    let (sql, _) = compile_select(&op, ParamBag::new(), &SqliteEmitter).unwrap();
    assert_eq!(sql, "SELECT * FROM \"users\" LIMIT -1 OFFSET 20");
}

#[test]
fn insert_renders_at_sign_placeholders_and_returning() {
    let stmt = Insertable::new()
        .value("name", ValueExpr::string("Ada"))
        .value("age", ValueExpr::number(30.0))
        .returning(Returning::Star)
        .build("users");

    let (sql, params) = compile_insert(&stmt, ParamBag::new(), &SqliteEmitter).unwrap();
    assert_eq!(
        sql,
        "INSERT INTO \"users\" (\"name\", \"age\") VALUES (@__p1, @__p2) RETURNING *"
    );
    assert_eq!(params.len(), 2);
}

#[test]
fn update_without_where_is_rejected_without_the_opt_in() {
    let stmt = Updatable::new().set("active", ValueExpr::boolean(false)).build("users");
    let err = compile_update(&stmt, ParamBag::new(), &SqliteEmitter).unwrap_err();
    assert!(matches!(err, DrizzleError::SemanticViolation { .. }));
}

#[test]
fn delete_with_where_renders_expected_sql() {
    let stmt = Deletable::new()
        .where_(BoolExpr::Comparison {
            op: CmpOp::Eq,
            left: ValueExpr::column("id"),
            right: ValueExpr::number(7.0),
        })
        .build("sessions");
    let (sql, _) = compile_delete(&stmt, ParamBag::new(), &SqliteEmitter).unwrap();
    assert_eq!(sql, "DELETE FROM \"sessions\" WHERE \"id\" = @__p1");
}
