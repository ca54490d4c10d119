//! Filesystem policy loader.
//!
//! Reads YAML policy documents (`kind: Policy`) from a file or a directory
//! tree and merges their rules into a [`PolicySet`](crate::source::PolicySet).

mod core;
mod document;
mod error;

#[cfg(test)]
mod tests;

pub use self::core::{parse_policy, PolicyLoader};
pub use self::document::{PolicyDocument, PolicyMetadata, POLICY_KIND};
pub use self::error::{LoadError, LoadResult, LoadStatus, Result};
