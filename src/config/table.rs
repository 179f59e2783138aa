//! Fully-qualified table identifier (`catalog.schema.table`).
//!
//! The identifier is spliced into generated SQL, so every part is restricted
//! to `[A-Za-z0-9_]`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::settings::SettingsError;

/// A validated `catalog.schema.table` identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableIdent {
    catalog: String,
    schema: String,
    table: String,
}

impl TableIdent {
    /// Build an identifier from its three parts.
    pub fn new(catalog: &str, schema: &str, table: &str) -> Result<Self, SettingsError> {
        for part in [catalog, schema, table] {
            if !is_valid_part(part) {
                return Err(SettingsError::InvalidTable(format!(
                    "{catalog}.{schema}.{table}"
                )));
            }
        }
        Ok(Self {
            catalog: catalog.to_string(),
            schema: schema.to_string(),
            table: table.to_string(),
        })
    }

    /// Parse `catalog.schema.table`.
    pub fn parse(s: &str) -> Result<Self, SettingsError> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        match parts.as_slice() {
            [catalog, schema, table] => Self::new(catalog, schema, table),
            _ => Err(SettingsError::InvalidTable(s.to_string())),
        }
    }

    pub fn catalog(&self) -> &str {
        &self.catalog
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

fn is_valid_part(part: &str) -> bool {
    !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl fmt::Display for TableIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.catalog, self.schema, self.table)
    }
}

impl FromStr for TableIdent {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TableIdent {
    type Error = SettingsError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<TableIdent> for String {
    fn from(ident: TableIdent) -> Self {
        ident.to_string()
    }
}
