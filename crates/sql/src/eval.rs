//! In-memory evaluation of a [`SqlPredicate`] against JSON rows.
//!
//! Follows SQL three-valued logic: a comparison involving `NULL` (or a
//! missing column) is unknown (`None`), and a row passes a `WHERE` clause
//! only when the predicate is `Some(true)`. Rows are keyed by column name.

use std::cmp::Ordering;

use rowguard_core::CompareOp;
use serde_json::{Map, Number, Value};

use crate::expr::SqlPredicate;

pub type Row = Map<String, Value>;

impl SqlPredicate {
    /// Three-valued truth of the predicate for `row`.
    pub fn evaluate(&self, row: &Row) -> Option<bool> {
        match self {
            SqlPredicate::Const(b) => Some(*b),
            SqlPredicate::Compare { column, op, value } => {
                compare(cell(row, &column.name), *op, value)
            }
            SqlPredicate::IsNull { column, negated } => {
                let is_null = cell(row, &column.name).is_null();
                Some(is_null != *negated)
            }
            SqlPredicate::InList { column, values } => in_list(cell(row, &column.name), values),
            SqlPredicate::And(parts) => {
                let mut result = Some(true);
                for part in parts {
                    match part.evaluate(row) {
                        Some(false) => return Some(false),
                        None => result = None,
                        Some(true) => {}
                    }
                }
                result
            }
            SqlPredicate::Or(parts) => {
                let mut result = Some(false);
                for part in parts {
                    match part.evaluate(row) {
                        Some(true) => return Some(true),
                        None => result = None,
                        Some(false) => {}
                    }
                }
                result
            }
            SqlPredicate::Not(inner) => inner.evaluate(row).map(|b| !b),
        }
    }

    /// Whether `row` passes this predicate as a `WHERE` clause.
    pub fn matches(&self, row: &Row) -> bool {
        self.evaluate(row) == Some(true)
    }

    /// Rows of `rows` that pass this predicate, in input order.
    pub fn filter_rows<'a>(&self, rows: &'a [Row]) -> Vec<&'a Row> {
        rows.iter().filter(|row| self.matches(row)).collect()
    }
}

static NULL: Value = Value::Null;

fn cell<'a>(row: &'a Row, column: &str) -> &'a Value {
    row.get(column).unwrap_or(&NULL)
}

fn compare(left: &Value, op: CompareOp, right: &Value) -> Option<bool> {
    match op {
        CompareOp::Eq => equal(left, right),
        CompareOp::Ne => equal(left, right).map(|eq| !eq),
        CompareOp::Gt => order(left, right).map(Ordering::is_gt),
        CompareOp::Gte => order(left, right).map(Ordering::is_ge),
        CompareOp::Lt => order(left, right).map(Ordering::is_lt),
        CompareOp::Lte => order(left, right).map(Ordering::is_le),
    }
}

fn in_list(left: &Value, values: &[Value]) -> Option<bool> {
    let mut result = Some(false);
    for value in values {
        match compare(left, CompareOp::Eq, value) {
            Some(true) => return Some(true),
            None => result = None,
            Some(false) => {}
        }
    }
    result
}

/// Equality test. `None` when either side is `NULL` or the kinds differ.
fn equal(left: &Value, right: &Value) -> Option<bool> {
    match (left, right) {
        (Value::Null, _) | (_, Value::Null) => None,
        (Value::Number(a), Value::Number(b)) => order_numbers(a, b).map(Ordering::is_eq),
        (Value::String(_), Value::String(_))
        | (Value::Bool(_), Value::Bool(_))
        | (Value::Array(_), Value::Array(_))
        | (Value::Object(_), Value::Object(_)) => Some(left == right),
        _ => None,
    }
}

/// Ordering for `<`, `>` and friends. `None` when either side is `NULL`
/// or the values have no natural order (arrays, objects, mixed kinds).
fn order(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => order_numbers(a, b),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

/// Integers compare exactly; `f64` only when a float is involved.
fn order_numbers(a: &Number, b: &Number) -> Option<Ordering> {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return Some(x.cmp(&y));
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return Some(x.cmp(&y));
    }
    // one side above i64::MAX, the other negative
    if a.is_u64() && b.is_i64() {
        return Some(Ordering::Greater);
    }
    if a.is_i64() && b.is_u64() {
        return Some(Ordering::Less);
    }
    a.as_f64()?.partial_cmp(&b.as_f64()?)
}
