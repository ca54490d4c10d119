//! Predicate algebra the compiler builds its output from.
//!
//! The compiler never inspects a predicate. It only needs the two
//! sentinels and the three combinators in [`Predicate`]. Leaf predicates
//! are produced by operators, and the built-in operators construct them
//! through [`ColumnPredicate`].

use std::fmt;

use serde_json::Value;

/// Boolean expression composable through conjunction, disjunction and negation.
pub trait Predicate: Sized {
    /// Matches every row.
    fn always_true() -> Self;

    /// Matches no row. Used as the fail-closed result.
    fn always_false() -> Self;

    /// Conjunction of `parts`.
    fn all(parts: Vec<Self>) -> Self;

    /// Disjunction of `parts`.
    fn any(parts: Vec<Self>) -> Self;

    fn negate(self) -> Self;
}

/// A predicate backend that can also build column-level leaf tests.
pub trait ColumnPredicate: Predicate {
    /// Handle to a queryable column, as returned by a [`Schema`](crate::Schema).
    type Column;

    /// `column <op> value`.
    fn compare(column: &Self::Column, op: CompareOp, value: &Value) -> Self;

    /// `column IN (values...)`.
    fn one_of(column: &Self::Column, values: &[Value]) -> Self;
}

/// Binary comparison used by leaf predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl CompareOp {
    /// SQL spelling of the operator.
    pub fn as_sql(self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}
