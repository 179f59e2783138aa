//! SQL dialect definition and formatting rules.
//!
//! Generated statements target a single warehouse dialect (Databricks /
//! Spark SQL). The `SqlDialect` trait keeps the rendering rules in one place
//! so the token, expression and query layers never hard-code them:
//!
//! - Identifier quoting: bare when plain, `` ` `` otherwise
//! - Pagination: `LIMIT n`
//! - Date literals: `DATE 'YYYY-MM-DD'`
//! - NULLS LAST support
//!
//! # Usage
//!
//! ```ignore
//! use sluice::sql::dialect::{Databricks, SqlDialect};
//!
//! let quoted = Databricks.quote_identifier("order date"); // `order date`
//! ```

mod databricks;
pub mod helpers;

pub use databricks::Databricks;

use super::token::TokenStream;

/// SQL dialect trait - defines how SQL constructs are rendered.
///
/// The default implementations follow ANSI SQL where possible.
pub trait SqlDialect: std::fmt::Debug + Send + Sync {
    // =========================================================================
    // Identifier and Literal Quoting
    // =========================================================================

    /// Quote an identifier (table, column, alias).
    fn quote_identifier(&self, ident: &str) -> String;

    /// Quote a string literal.
    ///
    /// Single quotes with `''` for escaping.
    fn quote_string(&self, s: &str) -> String {
        helpers::quote_string_single(s)
    }

    /// Format a NULL literal.
    fn format_null(&self) -> &'static str {
        "NULL"
    }

    /// Format a date literal.
    fn format_date_literal(&self, date: &str) -> String {
        format!("DATE {}", self.quote_string(date))
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    /// Emit the row-cap clause.
    fn emit_limit(&self, limit: u64) -> TokenStream {
        helpers::emit_limit_standard(limit)
    }

    // =========================================================================
    // NULLS Ordering
    // =========================================================================

    /// Whether this dialect supports NULLS LAST in ORDER BY.
    fn supports_nulls_ordering(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_identifier() {
        assert_eq!(Databricks.quote_identifier("customer_name"), "customer_name");
        assert_eq!(Databricks.quote_identifier("ship mode"), "`ship mode`");
        assert_eq!(Databricks.quote_identifier("1st"), "`1st`");
    }

    #[test]
    fn test_quote_identifier_escaping() {
        assert_eq!(Databricks.quote_identifier("weird`name"), "`weird``name`");
    }

    #[test]
    fn test_quote_string_escaping() {
        assert_eq!(Databricks.quote_string("O'Brien"), "'O''Brien'");
    }

    #[test]
    fn test_date_literal() {
        assert_eq!(
            Databricks.format_date_literal("2024-12-30"),
            "DATE '2024-12-30'"
        );
    }

    #[test]
    fn test_supports_nulls_ordering() {
        assert!(Databricks.supports_nulls_ordering());
    }
}
