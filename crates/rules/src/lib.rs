//! Permission rule compiler for row-level access control.
//!
//! This crate provides:
//! - An extensible operator registry (`$eq`, `$in` by default)
//! - Compilation of allow/deny rules into a single fail-closed row filter
//! - [`RowFilterAdapter`] binding a schema and operators to the compile entry points
//! - Rule sources, including an in-memory [`PolicySet`] with action/subject matching
//! - A YAML policy loader

pub mod adapter;
pub mod compiler;
pub mod loader;
pub mod operators;
pub mod source;

#[cfg(test)]
pub(crate) mod test_support;

pub use adapter::RowFilterAdapter;
pub use compiler::{compile, CompileError};
pub use operators::{Operator, OperatorError, OperatorRegistry};
pub use source::{PolicySet, RuleSource};
