//! SQL backend for compiled row filters.
//!
//! [`SqlPredicate`] implements the core predicate traits, so the rule
//! compiler can target it directly. The result renders to a parameterized
//! `WHERE` fragment ([`SqlPredicate::to_sql`]) or evaluates in memory
//! against JSON rows ([`SqlPredicate::evaluate`]).

pub mod column;
pub mod eval;
pub mod expr;
pub mod render;
pub mod table;

pub use column::{quote_ident, SqlColumn};
pub use eval::Row;
pub use expr::SqlPredicate;
pub use render::{Placeholder, SqlFragment};
pub use table::{SchemaError, TableDef, TableSchema};
