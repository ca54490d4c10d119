//! Flat condition map → conjunction of column predicates.

use rowguard_core::{ColumnPredicate, Conditions, Predicate, Schema};
use serde_json::Value;

use crate::operators::{is_operator_symbol, Operator, OperatorRegistry, EQ};

use super::error::{CompileError, Result};

/// Compile one rule's conditions.
///
/// Returns `Ok(None)` when there is nothing to compile, so callers can tell
/// an unconditioned rule apart from one that denies everything.
pub(crate) fn compile_conditions<P, S>(
    conditions: &Conditions,
    schema: &S,
    operators: &OperatorRegistry<P>,
) -> Result<Option<P>>
where
    P: ColumnPredicate,
    S: Schema<Column = P::Column> + ?Sized,
{
    let mut parts = Vec::with_capacity(conditions.len());

    for (field, value) in conditions {
        let column = schema
            .column(field)
            .ok_or_else(|| CompileError::UnknownColumn(field.clone()))?;

        match value {
            Value::Object(entries) => {
                if entries.is_empty() {
                    return Err(CompileError::EmptyOperatorObject(field.clone()));
                }
                for (symbol, operand) in entries {
                    let operator = resolve(operators, symbol)?;
                    parts.push(apply(operator, field, column, operand)?);
                }
            }
            literal => {
                let eq = operators
                    .resolve(EQ)
                    .ok_or_else(|| CompileError::UnsupportedOperator(EQ.to_string()))?;
                parts.push(apply(eq, field, column, literal)?);
            }
        }
    }

    Ok(conjoin(parts))
}

fn resolve<'r, P: ColumnPredicate>(
    operators: &'r OperatorRegistry<P>,
    symbol: &str,
) -> Result<&'r dyn Operator<P>> {
    if !is_operator_symbol(symbol) {
        return Err(CompileError::UnsupportedOperator(symbol.to_string()));
    }
    operators
        .resolve(symbol)
        .ok_or_else(|| CompileError::UnsupportedOperator(symbol.to_string()))
}

fn apply<P: ColumnPredicate>(
    operator: &dyn Operator<P>,
    field: &str,
    column: &P::Column,
    operand: &Value,
) -> Result<P> {
    operator
        .apply(column, operand)
        .map_err(|source| CompileError::Operator {
            field: field.to_string(),
            source,
        })
}

/// AND the parts together; a single part is returned unchanged.
pub(crate) fn conjoin<P: Predicate>(mut parts: Vec<P>) -> Option<P> {
    match parts.len() {
        0 => None,
        1 => parts.pop(),
        _ => Some(P::all(parts)),
    }
}

/// OR the parts together; a single part is returned unchanged.
pub(crate) fn disjoin<P: Predicate>(mut parts: Vec<P>) -> Option<P> {
    match parts.len() {
        0 => None,
        1 => parts.pop(),
        _ => Some(P::any(parts)),
    }
}
