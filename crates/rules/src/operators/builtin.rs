//! Built-in operators.

use rowguard_core::{ColumnPredicate, CompareOp, Predicate};
use serde_json::Value;

use super::{Operator, OperatorError, IN, NIN};

/// `$eq`: equality test. Also used for plain literal conditions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Equals;

impl<P: ColumnPredicate> Operator<P> for Equals {
    fn apply(&self, column: &P::Column, operand: &Value) -> Result<P, OperatorError> {
        Ok(P::compare(column, CompareOp::Eq, operand))
    }
}

/// `$in`: set membership. The operand must be an array.
#[derive(Debug, Clone, Copy, Default)]
pub struct OneOf;

impl<P: ColumnPredicate> Operator<P> for OneOf {
    fn apply(&self, column: &P::Column, operand: &Value) -> Result<P, OperatorError> {
        let values = expect_array(IN, operand)?;
        Ok(P::one_of(column, values))
    }
}

/// `$nin`: negated set membership. The operand must be an array.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotOneOf;

impl<P: ColumnPredicate> Operator<P> for NotOneOf {
    fn apply(&self, column: &P::Column, operand: &Value) -> Result<P, OperatorError> {
        let values = expect_array(NIN, operand)?;
        Ok(P::one_of(column, values).negate())
    }
}

/// Binary comparison (`$ne`, `$gt`, `$gte`, `$lt`, `$lte`).
#[derive(Debug, Clone, Copy)]
pub struct Compare(pub CompareOp);

impl<P: ColumnPredicate> Operator<P> for Compare {
    fn apply(&self, column: &P::Column, operand: &Value) -> Result<P, OperatorError> {
        Ok(P::compare(column, self.0, operand))
    }
}

fn expect_array<'a>(operator: &str, operand: &'a Value) -> Result<&'a [Value], OperatorError> {
    operand
        .as_array()
        .map(|values| values.as_slice())
        .ok_or_else(|| OperatorError::InvalidOperand {
            operator: operator.to_string(),
            expected: "an array value",
        })
}
