//! Adapter binding a schema and an operator set to the two compilation entry points.

use std::fmt;
use std::sync::Arc;

use rowguard_core::{ColumnPredicate, Rule, Schema};
use tracing::debug;

use crate::compiler::{compile, Result};
use crate::operators::OperatorRegistry;
use crate::source::RuleSource;

/// Compiles permission rules into row filters for one schema.
///
/// Holds no per-request state: every call recompiles from scratch. Cloning
/// is cheap (the schema and registry are shared), and a single adapter can
/// serve any number of threads when its schema is `Sync`.
pub struct RowFilterAdapter<P: ColumnPredicate, S> {
    schema: Arc<S>,
    operators: Arc<OperatorRegistry<P>>,
}

impl<P, S> RowFilterAdapter<P, S>
where
    P: ColumnPredicate + 'static,
    S: Schema<Column = P::Column>,
{
    /// Adapter with the default operators (`$eq`, `$in`).
    pub fn new(schema: S) -> Self {
        Self::from_shared(Arc::new(schema), Arc::new(OperatorRegistry::new()))
    }

    /// Adapter whose operators are `custom` overlaid on the defaults.
    ///
    /// Custom operators extend the defaults; a custom entry replaces a
    /// default only when it uses the same symbol.
    pub fn with_operators(schema: S, custom: OperatorRegistry<P>) -> Self {
        let mut operators = OperatorRegistry::new();
        operators.overlay(&custom);
        Self::from_shared(Arc::new(schema), Arc::new(operators))
    }

    /// Adapter over an already shared schema and a fully built registry,
    /// used as-is (no defaults are added).
    pub fn from_shared(schema: Arc<S>, operators: Arc<OperatorRegistry<P>>) -> Self {
        Self { schema, operators }
    }

    /// Compile an explicit rule list.
    pub fn filter_from_rules(&self, rules: &[Rule]) -> Result<P> {
        compile(rules, self.schema.as_ref(), &self.operators)
    }

    /// Ask `source` for the rules of `action` on `subject`, then compile them.
    pub fn filter_from_source<R>(&self, source: &R, action: &str, subject: &str) -> Result<P>
    where
        R: RuleSource + ?Sized,
    {
        let rules = source.rules_for(action, subject);
        debug!(action, subject, rules = rules.len(), "compiling rules from source");
        self.filter_from_rules(&rules)
    }
}

impl<P: ColumnPredicate, S> RowFilterAdapter<P, S> {
    pub fn schema(&self) -> &S {
        &self.schema
    }

    pub fn operators(&self) -> &OperatorRegistry<P> {
        &self.operators
    }
}

impl<P: ColumnPredicate, S> Clone for RowFilterAdapter<P, S> {
    fn clone(&self) -> Self {
        Self {
            schema: Arc::clone(&self.schema),
            operators: Arc::clone(&self.operators),
        }
    }
}

impl<P: ColumnPredicate, S: fmt::Debug> fmt::Debug for RowFilterAdapter<P, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowFilterAdapter")
            .field("schema", &self.schema)
            .field("operators", &self.operators)
            .finish()
    }
}
