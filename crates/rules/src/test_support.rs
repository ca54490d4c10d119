//! Test-only predicate backend that renders to canonical text, so tests
//! can assert on the exact shape the compiler produced.

use std::collections::HashMap;

use rowguard_core::{ColumnPredicate, CompareOp, Predicate};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Trace(pub String);

impl Trace {
    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

fn join(parts: Vec<Trace>, sep: &str) -> Trace {
    let inner: Vec<String> = parts.into_iter().map(|p| p.0).collect();
    Trace(format!("({})", inner.join(sep)))
}

impl Predicate for Trace {
    fn always_true() -> Self {
        Trace("TRUE".into())
    }

    fn always_false() -> Self {
        Trace("FALSE".into())
    }

    fn all(parts: Vec<Self>) -> Self {
        join(parts, " AND ")
    }

    fn any(parts: Vec<Self>) -> Self {
        join(parts, " OR ")
    }

    fn negate(self) -> Self {
        Trace(format!("NOT {}", self.0))
    }
}

impl ColumnPredicate for Trace {
    type Column = String;

    fn compare(column: &String, op: CompareOp, value: &Value) -> Self {
        Trace(format!("{} {} {}", column, op, value))
    }

    fn one_of(column: &String, values: &[Value]) -> Self {
        Trace(format!("{} IN {}", column, Value::Array(values.to_vec())))
    }
}

/// Columns of the `sites` table used throughout the tests.
pub(crate) fn sites_schema() -> HashMap<String, String> {
    [
        ("id", "id"),
        ("ownerId", "owner_id"),
        ("isPublic", "is_public"),
        ("archived", "archived"),
        ("category", "category"),
        ("views", "views"),
    ]
    .into_iter()
    .map(|(field, column)| (field.to_string(), column.to_string()))
    .collect()
}
