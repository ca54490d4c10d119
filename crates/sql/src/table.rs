//! Table schema: rule field names → SQL columns of one table.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use rowguard_core::Schema;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::column::SqlColumn;

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// On-disk table definition.
///
/// ```yaml
/// table: sites
/// columns:
///   ownerId: owner_id
///   isPublic: is_public
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TableDef {
    pub table: String,
    pub columns: IndexMap<String, String>,
}

/// Resolves rule fields to columns of a single table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    table: String,
    columns: IndexMap<String, SqlColumn>,
}

impl TableSchema {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: IndexMap::new(),
        }
    }

    /// Map `field` to the column `column_name` of this table.
    pub fn with_column(mut self, field: impl Into<String>, column_name: impl Into<String>) -> Self {
        let column = SqlColumn::new(self.table.clone(), column_name);
        self.columns.insert(field.into(), column);
        self
    }

    pub fn from_def(def: TableDef) -> Result<Self, SchemaError> {
        if def.table.is_empty() {
            return Err(SchemaError::Validation("table name must not be empty".to_string()));
        }
        if def.columns.is_empty() {
            return Err(SchemaError::Validation(format!(
                "table '{}' declares no columns",
                def.table
            )));
        }
        Ok(def
            .columns
            .into_iter()
            .fold(Self::new(def.table), |schema, (field, column)| {
                schema.with_column(field, column)
            }))
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, SchemaError> {
        let def: TableDef = serde_yaml::from_str(contents)?;
        Self::from_def(def)
    }

    pub fn from_yaml_file(path: &Path) -> Result<Self, SchemaError> {
        let contents = fs::read_to_string(path)?;
        let schema = Self::from_yaml_str(&contents)?;
        info!(table = %schema.table, columns = schema.columns.len(), path = %path.display(), "loaded table schema");
        Ok(schema)
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Known rule field names, in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(|k| k.as_str())
    }
}

impl Schema for TableSchema {
    type Column = SqlColumn;

    fn column(&self, field: &str) -> Option<&SqlColumn> {
        self.columns.get(field)
    }
}
