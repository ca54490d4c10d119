use std::fmt;

use serde::{Deserialize, Serialize};

/// A column of one table, rendered as `"table"."column"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SqlColumn {
    pub table: String,
    pub name: String,
}

impl SqlColumn {
    pub fn new(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            name: name.into(),
        }
    }

    /// Qualified, quoted identifier.
    pub fn quoted(&self) -> String {
        format!("{}.{}", quote_ident(&self.table), quote_ident(&self.name))
    }
}

impl fmt::Display for SqlColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.quoted())
    }
}

/// Double-quote an identifier, doubling embedded quotes.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}
