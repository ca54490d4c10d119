//! Compilation errors.

use crate::operators::OperatorError;

/// Any of these aborts compilation of the whole rule set.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompileError {
    /// A condition references a field the schema does not know.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// A condition uses an unregistered operator symbol, or an operator
    /// object contains a key that is not in `$name` form.
    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    /// An operator object with no entries.
    #[error("Empty operator object for field: {0}")]
    EmptyOperatorObject(String),

    /// An operator rejected its operand.
    #[error("Invalid condition on '{field}': {source}")]
    Operator {
        field: String,
        source: OperatorError,
    },
}

/// Result alias for compilation.
pub type Result<T> = std::result::Result<T, CompileError>;
