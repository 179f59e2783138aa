//! Databricks (Spark SQL) dialect.
//!
//! Databricks features used by the generator:
//! - Backtick identifier quoting (only when an identifier needs it)
//! - Unity Catalog three-part names (`catalog.schema.table`)
//! - `date_trunc`, `year`, `add_months` builtins
//! - NULLS LAST ordering

use super::helpers;
use super::SqlDialect;

/// Databricks (Spark SQL) dialect.
#[derive(Debug, Clone, Copy, Default)]
pub struct Databricks;

impl SqlDialect for Databricks {
    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_backtick_if_needed(ident)
    }
}
