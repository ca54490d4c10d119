//! Rule compilation: permission rules → one row filter predicate.
//!
//! Rules are split into allow and deny groups, each rule's conditions are
//! compiled into a conjunction of column tests, and the groups are
//! combined as `any(allow) AND NOT any(deny)`. Whenever no allow rule
//! contributes a predicate the result is the always-false sentinel, so the
//! compiled filter never grants access by default.
//!
//! Unconditioned rules (no conditions, or an empty condition map)
//! contribute nothing. An unconditioned allow rule therefore does **not**
//! grant access to every row, and an unconditioned deny rule does not
//! revoke it. Both are logged at `warn` level when they are skipped.

mod conditions;
mod error;


use rowguard_core::{ColumnPredicate, Predicate, Rule, Schema};
use tracing::{debug, warn};

use crate::operators::OperatorRegistry;

pub use self::error::{CompileError, Result};

use conditions::{compile_conditions, disjoin};

/// Compile `rules` into a single predicate.
///
/// Fails fast: the first unknown column, unsupported operator or invalid
/// operand aborts the whole compilation and no partial predicate is
/// returned.
pub fn compile<P, S>(rules: &[Rule], schema: &S, operators: &OperatorRegistry<P>) -> Result<P>
where
    P: ColumnPredicate,
    S: Schema<Column = P::Column> + ?Sized,
{
    let (deny, allow): (Vec<&Rule>, Vec<&Rule>) = rules.iter().partition(|r| r.is_deny());

    let allow_filters = compile_group(&allow, schema, operators)?;
    let deny_filters = compile_group(&deny, schema, operators)?;

    debug!(
        rules = rules.len(),
        allow = allow_filters.len(),
        deny = deny_filters.len(),
        "compiled rule groups"
    );

    // No allow rule contributed: nothing is granted, whatever the deny side says.
    let Some(allow) = disjoin(allow_filters) else {
        return Ok(P::always_false());
    };

    match disjoin(deny_filters) {
        None => Ok(allow),
        Some(deny) => Ok(P::all(vec![allow, deny.negate()])),
    }
}

/// Compile every rule of one group, dropping unconditioned rules.
fn compile_group<P, S>(rules: &[&Rule], schema: &S, operators: &OperatorRegistry<P>) -> Result<Vec<P>>
where
    P: ColumnPredicate,
    S: Schema<Column = P::Column> + ?Sized,
{
    let mut filters = Vec::with_capacity(rules.len());
    for rule in rules {
        let compiled = match &rule.conditions {
            Some(conditions) => compile_conditions(conditions, schema, operators)?,
            None => None,
        };
        match compiled {
            Some(filter) => filters.push(filter),
            None => warn!(rule = %rule, "skipping unconditioned rule; it contributes no filter"),
        }
    }
    Ok(filters)
}
