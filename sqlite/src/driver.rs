//! A minimal `rusqlite` driver adapter: binds a compiled parameter bag by
//! name and runs the resulting SQL against a live connection.
//!
//! This is illustrative, not a full driver matrix — it demonstrates the
//! `{sql, params}` → driver handoff contract and stops there. It does not
//! attempt row-to-struct decoding beyond what the caller's own mapping
//! closure does.

use drizzle_core::error::{DrizzleError, Result};
use drizzle_core::ir::{ParamBag, ParamValue};
use rusqlite::types::{ToSqlOutput, Value as SqliteValue};
use rusqlite::{Connection, Row, ToSql};

fn to_sqlite_value(value: &ParamValue) -> SqliteValue {
    match value {
        ParamValue::Number(n) => SqliteValue::Real(*n),
        ParamValue::String(s) => SqliteValue::Text(s.to_string()),
        ParamValue::Boolean(b) => SqliteValue::Integer(if *b { 1 } else { 0 }),
        ParamValue::Null | ParamValue::Undefined => SqliteValue::Null,
        ParamValue::Array(_) => {
            unreachable!("array parameters are expanded into scalar IN-list slots before compilation")
        }
    }
}

/// Binds a parameter bag to rusqlite's named-parameter form: `@key` for
/// every key the bag carries, in the same `@name` spelling
/// [`crate::SqliteEmitter::write_placeholder`] wrote into the SQL text.
fn named_params(bag: &ParamBag) -> Vec<(String, ToSqlOutput<'static>)> {
    bag.iter()
        .map(|(key, value)| (format!("@{key}"), ToSqlOutput::Owned(to_sqlite_value(value))))
        .collect()
}

fn as_param_refs(bound: &[(String, ToSqlOutput<'static>)]) -> Vec<(&str, &dyn ToSql)> {
    bound.iter().map(|(name, value)| (name.as_str(), value as &dyn ToSql)).collect()
}

/// Runs a compiled `INSERT`/`UPDATE`/`DELETE` and returns the affected row
/// count.
pub fn execute(conn: &Connection, sql: &str, params: &ParamBag) -> Result<usize> {
    let bound = named_params(params);
    conn.execute(sql, as_param_refs(&bound).as_slice())
        .map_err(|e| DrizzleError::Execution(e.to_string()))
}

/// Runs a compiled `SELECT`, mapping every returned row with `f`.
pub fn query<T>(conn: &Connection, sql: &str, params: &ParamBag, mut f: impl FnMut(&Row<'_>) -> rusqlite::Result<T>) -> Result<Vec<T>> {
    let bound = named_params(params);
    let mut stmt = conn.prepare(sql).map_err(|e| DrizzleError::Execution(e.to_string()))?;
    let rows = stmt
        .query_map(as_param_refs(&bound).as_slice(), |row| f(row))
        .map_err(|e| DrizzleError::Execution(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| DrizzleError::Execution(e.to_string()))?);
    }
    Ok(out)
}

/// Runs a compiled `SELECT` expected to match exactly one row, mapping it
/// with `f`. A `single`/`first` terminal already constrains row count at
/// the SQL level (`LIMIT 1`/`LIMIT 2`); this just surfaces the zero-row
/// case as [`DrizzleError::NotFound`] instead of an empty `Vec`.
pub fn query_one<T>(conn: &Connection, sql: &str, params: &ParamBag, f: impl FnMut(&Row<'_>) -> rusqlite::Result<T>) -> Result<T> {
    query(conn, sql, params, f)?.into_iter().next().ok_or(DrizzleError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SqliteEmitter;
    use drizzle_core::builder::Queryable;
    use drizzle_core::ir::{BoolExpr, CmpOp, ValueExpr};

    #[test]
    fn round_trips_a_parameterized_select_against_a_live_connection() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE users (id INTEGER, name TEXT)", []).unwrap();
        conn.execute("INSERT INTO users (id, name) VALUES (1, 'Ada')", []).unwrap();

        let op = Queryable::from("users")
            .where_(BoolExpr::Comparison {
                op: CmpOp::Eq,
                left: ValueExpr::column("id"),
                right: ValueExpr::param("id"),
            })
            .build();
        let mut bag = ParamBag::new();
        bag.insert("id".into(), ParamValue::Number(1.0));

        let (sql, bag) = drizzle_core::compile_select(&op, bag, &SqliteEmitter).unwrap();
        let names: Vec<String> = query(&conn, &sql, &bag, |row| row.get::<_, String>(1)).unwrap();
        assert_eq!(names, vec!["Ada".to_string()]);
    }
}
