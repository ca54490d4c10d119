//! Operator registry: symbol → operator lookup used by the condition compiler.
//!
//! A registry starts from the built-in defaults (`$eq`, `$in`) and callers
//! overlay their own operators on top. Entries registered later replace
//! earlier ones with the same symbol; untouched defaults stay available.
//! Once handed to an adapter the registry is only read.

mod builtin;


use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use rowguard_core::{ColumnPredicate, CompareOp};
use serde_json::Value;

pub use self::builtin::{Compare, Equals, NotOneOf, OneOf};

/// Every operator symbol starts with this sentinel.
pub const OPERATOR_PREFIX: char = '$';

pub const EQ: &str = "$eq";
pub const IN: &str = "$in";
pub const NE: &str = "$ne";
pub const GT: &str = "$gt";
pub const GTE: &str = "$gte";
pub const LT: &str = "$lt";
pub const LTE: &str = "$lte";
pub const NIN: &str = "$nin";

/// True for keys in the `$name` form.
pub fn is_operator_symbol(key: &str) -> bool {
    key.len() > 1 && key.starts_with(OPERATOR_PREFIX)
}

/// Errors raised by an operator for a malformed operand.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum OperatorError {
    /// The operand does not have the shape the operator accepts.
    #[error("{operator} operator expects {expected}")]
    InvalidOperand {
        operator: String,
        expected: &'static str,
    },

    #[error("{0}")]
    Other(String),
}

/// Turns `(column, operand)` into a predicate.
///
/// Implementations must not fail for operands of their documented shape.
pub trait Operator<P: ColumnPredicate>: Send + Sync {
    fn apply(&self, column: &P::Column, operand: &Value) -> Result<P, OperatorError>;
}

/// Adapts a closure into an [`Operator`].
struct FnOperator<F, P> {
    f: F,
    _predicate: PhantomData<fn() -> P>,
}

impl<F, P> Operator<P> for FnOperator<F, P>
where
    P: ColumnPredicate,
    F: Fn(&P::Column, &Value) -> Result<P, OperatorError> + Send + Sync,
{
    fn apply(&self, column: &P::Column, operand: &Value) -> Result<P, OperatorError> {
        (self.f)(column, operand)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Operator symbol '{0}' must start with '$'")]
    InvalidSymbol(String),
}

/// Immutable-after-construction map from operator symbol to operator.
pub struct OperatorRegistry<P: ColumnPredicate> {
    operators: HashMap<String, Arc<dyn Operator<P>>>,
}

impl<P: ColumnPredicate + 'static> OperatorRegistry<P> {
    /// Registry with the built-in defaults: `$eq` and `$in`.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.insert(EQ, Equals);
        registry.insert(IN, OneOf);
        registry
    }

    /// Registry without any operator. Useful for building a set of overrides.
    pub fn empty() -> Self {
        Self {
            operators: HashMap::new(),
        }
    }

    /// Add the comparison operators `$ne`, `$gt`, `$gte`, `$lt`, `$lte` and `$nin`.
    ///
    /// These are not defaults; callers opt in.
    pub fn with_comparisons(mut self) -> Self {
        self.insert(NE, Compare(CompareOp::Ne));
        self.insert(GT, Compare(CompareOp::Gt));
        self.insert(GTE, Compare(CompareOp::Gte));
        self.insert(LT, Compare(CompareOp::Lt));
        self.insert(LTE, Compare(CompareOp::Lte));
        self.insert(NIN, NotOneOf);
        self
    }

    /// Register `operator` under `symbol`, replacing any previous entry.
    pub fn register(
        &mut self,
        symbol: impl Into<String>,
        operator: impl Operator<P> + 'static,
    ) -> Result<(), RegistryError> {
        let symbol = symbol.into();
        if !is_operator_symbol(&symbol) {
            return Err(RegistryError::InvalidSymbol(symbol));
        }
        self.operators.insert(symbol, Arc::new(operator));
        Ok(())
    }

    /// Register a closure as the operator for `symbol`.
    pub fn register_fn<F>(&mut self, symbol: impl Into<String>, f: F) -> Result<(), RegistryError>
    where
        F: Fn(&P::Column, &Value) -> Result<P, OperatorError> + Send + Sync + 'static,
    {
        self.register(
            symbol,
            FnOperator {
                f,
                _predicate: PhantomData,
            },
        )
    }

    /// Copy every entry of `other` over this registry; `other` wins on collision.
    pub fn overlay(&mut self, other: &OperatorRegistry<P>) {
        for (symbol, operator) in &other.operators {
            self.operators.insert(symbol.clone(), Arc::clone(operator));
        }
    }

    fn insert(&mut self, symbol: &str, operator: impl Operator<P> + 'static) {
        self.operators.insert(symbol.to_string(), Arc::new(operator));
    }
}

impl<P: ColumnPredicate> OperatorRegistry<P> {
    /// Look up the operator for `symbol`.
    pub fn resolve(&self, symbol: &str) -> Option<&dyn Operator<P>> {
        self.operators.get(symbol).map(|op| op.as_ref())
    }

    pub fn contains(&self, symbol: &str) -> bool {
        self.operators.contains_key(symbol)
    }

    /// Registered symbols, sorted.
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.operators.keys().map(|s| s.as_str()).collect();
        symbols.sort_unstable();
        symbols
    }

    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }
}

impl<P: ColumnPredicate + 'static> Default for OperatorRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ColumnPredicate> Clone for OperatorRegistry<P> {
    fn clone(&self) -> Self {
        Self {
            operators: self.operators.clone(),
        }
    }
}

impl<P: ColumnPredicate> fmt::Debug for OperatorRegistry<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorRegistry")
            .field("symbols", &self.symbols())
            .finish()
    }
}
