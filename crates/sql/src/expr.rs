//! SQL predicate tree produced by the rule compiler.

use rowguard_core::{ColumnPredicate, CompareOp, Predicate};
use serde_json::Value;

use crate::column::SqlColumn;

/// A boolean SQL expression over qualified columns.
///
/// Values are kept as JSON and bound as parameters when rendered, never
/// spliced into the SQL text.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlPredicate {
    Const(bool),
    Compare {
        column: SqlColumn,
        op: CompareOp,
        value: Value,
    },
    IsNull {
        column: SqlColumn,
        negated: bool,
    },
    InList {
        column: SqlColumn,
        values: Vec<Value>,
    },
    And(Vec<SqlPredicate>),
    Or(Vec<SqlPredicate>),
    Not(Box<SqlPredicate>),
}

impl SqlPredicate {
    /// `true` for the `TRUE` / `FALSE` constants.
    pub fn is_const(&self) -> bool {
        matches!(self, SqlPredicate::Const(_))
    }

    /// Columns referenced anywhere in the tree, in first-seen order.
    pub fn columns(&self) -> Vec<&SqlColumn> {
        let mut out: Vec<&SqlColumn> = Vec::new();
        self.collect_columns(&mut out);
        out
    }

    fn collect_columns<'a>(&'a self, out: &mut Vec<&'a SqlColumn>) {
        match self {
            SqlPredicate::Const(_) => {}
            SqlPredicate::Compare { column, .. }
            | SqlPredicate::IsNull { column, .. }
            | SqlPredicate::InList { column, .. } => {
                if !out.contains(&column) {
                    out.push(column);
                }
            }
            SqlPredicate::And(parts) | SqlPredicate::Or(parts) => {
                for part in parts {
                    part.collect_columns(out);
                }
            }
            SqlPredicate::Not(inner) => inner.collect_columns(out),
        }
    }
}

impl Predicate for SqlPredicate {
    fn always_true() -> Self {
        SqlPredicate::Const(true)
    }

    fn always_false() -> Self {
        SqlPredicate::Const(false)
    }

    fn all(parts: Vec<Self>) -> Self {
        SqlPredicate::And(parts)
    }

    fn any(parts: Vec<Self>) -> Self {
        SqlPredicate::Or(parts)
    }

    fn negate(self) -> Self {
        SqlPredicate::Not(Box::new(self))
    }
}

impl ColumnPredicate for SqlPredicate {
    type Column = SqlColumn;

    fn compare(column: &SqlColumn, op: CompareOp, value: &Value) -> Self {
        // `= NULL` never matches in SQL
        match (op, value) {
            (CompareOp::Eq, Value::Null) => SqlPredicate::IsNull {
                column: column.clone(),
                negated: false,
            },
            (CompareOp::Ne, Value::Null) => SqlPredicate::IsNull {
                column: column.clone(),
                negated: true,
            },
            _ => SqlPredicate::Compare {
                column: column.clone(),
                op,
                value: value.clone(),
            },
        }
    }

    fn one_of(column: &SqlColumn, values: &[Value]) -> Self {
        if values.is_empty() {
            return SqlPredicate::Const(false);
        }
        SqlPredicate::InList {
            column: column.clone(),
            values: values.to_vec(),
        }
    }
}
