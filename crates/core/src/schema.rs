//! Field-to-column resolution.

use std::collections::HashMap;
use std::sync::Arc;

/// Resolves rule field names to queryable column handles.
///
/// Implementations are read-only during compilation and may be shared
/// between any number of concurrent compilations.
pub trait Schema {
    type Column;

    /// Look up the column for `field`, or `None` when the schema has no such field.
    fn column(&self, field: &str) -> Option<&Self::Column>;
}

impl<C> Schema for HashMap<String, C> {
    type Column = C;

    fn column(&self, field: &str) -> Option<&C> {
        self.get(field)
    }
}

impl<C> Schema for indexmap::IndexMap<String, C> {
    type Column = C;

    fn column(&self, field: &str) -> Option<&C> {
        self.get(field)
    }
}

impl<S: Schema + ?Sized> Schema for &S {
    type Column = S::Column;

    fn column(&self, field: &str) -> Option<&Self::Column> {
        (**self).column(field)
    }
}

impl<S: Schema + ?Sized> Schema for Arc<S> {
    type Column = S::Column;

    fn column(&self, field: &str) -> Option<&Self::Column> {
        (**self).column(field)
    }
}
