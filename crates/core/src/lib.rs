//! Shared building blocks for row-level access control.
//!
//! - [`Rule`]: allow/deny permission rules with flat field conditions
//! - [`Predicate`] / [`ColumnPredicate`]: the boolean algebra compiled output is built from
//! - [`Schema`]: field name to column resolution
//! - [`Config`]: environment-driven configuration

pub mod config;
pub mod predicate;
pub mod rule;
pub mod schema;

pub use config::Config;
pub use predicate::{ColumnPredicate, CompareOp, Predicate};
pub use rule::{Conditions, Rule};
pub use schema::Schema;
