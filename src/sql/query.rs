//! Query builder - construct SQL queries with a fluent API.

use super::dialect::{Databricks, SqlDialect};
use super::expr::{Expr, ExprExt};
use super::token::{Token, TokenStream};
use crate::config::TableIdent;

// =============================================================================
// Select Expression (column with optional alias)
// =============================================================================

/// A SELECT list item: expression with optional alias.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct SelectExpr {
    pub expr: Expr,
    pub alias: Option<String>,
}

impl SelectExpr {
    pub fn new(expr: Expr) -> Self {
        Self { expr, alias: None }
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = self.expr.to_tokens();
        if let Some(alias) = &self.alias {
            ts.space()
                .push(Token::As)
                .space()
                .push(Token::Ident(alias.clone()));
        }
        ts
    }
}

impl From<Expr> for SelectExpr {
    fn from(expr: Expr) -> Self {
        SelectExpr::new(expr)
    }
}

// =============================================================================
// Table Reference
// =============================================================================

/// A table reference: `catalog.schema.table`, `schema.table` or `table`.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct TableRef {
    pub catalog: Option<String>,
    pub schema: Option<String>,
    pub table: String,
}

impl TableRef {
    pub fn new(table: &str) -> Self {
        Self {
            catalog: None,
            schema: None,
            table: table.into(),
        }
    }

    pub fn with_schema(mut self, schema: &str) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_catalog(mut self, catalog: &str) -> Self {
        self.catalog = Some(catalog.into());
        self
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::QualifiedIdent {
            catalog: self.catalog.clone(),
            schema: self.schema.clone(),
            name: self.table.clone(),
        });
        ts
    }
}

impl From<&TableIdent> for TableRef {
    fn from(ident: &TableIdent) -> Self {
        TableRef::new(ident.table())
            .with_schema(ident.schema())
            .with_catalog(ident.catalog())
    }
}

// =============================================================================
// ORDER BY
// =============================================================================

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

/// An ORDER BY expression.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct OrderByExpr {
    pub expr: Expr,
    pub dir: Option<SortDir>,
    /// Sort NULLs after every other value.
    pub nulls_last: bool,
}

impl OrderByExpr {
    pub fn asc(expr: Expr) -> Self {
        Self {
            expr,
            dir: Some(SortDir::Asc),
            nulls_last: false,
        }
    }

    pub fn desc(expr: Expr) -> Self {
        Self {
            expr,
            dir: Some(SortDir::Desc),
            nulls_last: false,
        }
    }

    pub fn nulls_last(mut self) -> Self {
        self.nulls_last = true;
        self
    }

    /// Convert to tokens for a specific dialect.
    ///
    /// Skips NULLS LAST for dialects that don't support it.
    pub fn to_tokens(&self, dialect: &dyn SqlDialect) -> TokenStream {
        let mut ts = self.expr.to_tokens();

        if let Some(dir) = &self.dir {
            ts.space().push(match dir {
                SortDir::Asc => Token::Asc,
                SortDir::Desc => Token::Desc,
            });
        }

        if self.nulls_last && dialect.supports_nulls_ordering() {
            ts.space().push(Token::NullsLast);
        }

        ts
    }
}

// =============================================================================
// Query Builder
// =============================================================================

/// A single-table SELECT query.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use = "Query has no effect until converted to SQL with to_sql() or to_tokens()"]
pub struct Query {
    pub select: Vec<SelectExpr>,
    pub from: Option<TableRef>,
    pub where_clause: Option<Expr>,
    pub group_by: Vec<Expr>,
    pub order_by: Vec<OrderByExpr>,
    pub limit: Option<u64>,
}

impl Query {
    /// Create a new empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the SELECT list.
    pub fn select(mut self, exprs: Vec<impl Into<SelectExpr>>) -> Self {
        self.select = exprs.into_iter().map(|e| e.into()).collect();
        self
    }

    /// SELECT *
    pub fn select_star(mut self) -> Self {
        self.select = vec![SelectExpr::new(super::expr::star())];
        self
    }

    /// Set the FROM table.
    pub fn from(mut self, table: TableRef) -> Self {
        self.from = Some(table);
        self
    }

    /// Add a WHERE condition (ANDed with existing conditions).
    pub fn filter(mut self, condition: Expr) -> Self {
        self.where_clause = Some(match self.where_clause {
            Some(existing) => existing.and(condition),
            None => condition,
        });
        self
    }

    /// Set the GROUP BY clause.
    pub fn group_by(mut self, exprs: Vec<Expr>) -> Self {
        self.group_by = exprs;
        self
    }

    /// Set the ORDER BY clause.
    pub fn order_by(mut self, exprs: Vec<OrderByExpr>) -> Self {
        self.order_by = exprs;
        self
    }

    /// Set LIMIT.
    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Convert to token stream for a specific dialect.
    pub fn to_tokens(&self, dialect: &dyn SqlDialect) -> TokenStream {
        let mut ts = TokenStream::new();

        // SELECT
        ts.push(Token::Select);
        for (i, select_expr) in self.select.iter().enumerate() {
            if i == 0 {
                ts.newline().indent(1);
            } else {
                ts.comma().newline().indent(1);
            }
            ts.append(&select_expr.to_tokens());
        }

        // FROM
        if let Some(from) = &self.from {
            ts.newline().push(Token::From).space();
            ts.append(&from.to_tokens());
        }

        // WHERE
        if let Some(where_clause) = &self.where_clause {
            ts.newline().push(Token::Where).space();
            ts.append(&where_clause.to_tokens());
        }

        // GROUP BY
        if !self.group_by.is_empty() {
            ts.newline().push(Token::GroupBy).space();
            for (i, expr) in self.group_by.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                ts.append(&expr.to_tokens());
            }
        }

        // ORDER BY
        if !self.order_by.is_empty() {
            ts.newline().push(Token::OrderBy).space();
            for (i, order_expr) in self.order_by.iter().enumerate() {
                if i > 0 {
                    ts.comma().space();
                }
                ts.append(&order_expr.to_tokens(dialect));
            }
        }

        // LIMIT
        if let Some(limit) = self.limit {
            ts.newline();
            ts.append(&dialect.emit_limit(limit));
        }

        ts
    }

    /// Generate SQL string for a specific dialect.
    pub fn to_sql(&self, dialect: &dyn SqlDialect) -> String {
        self.to_tokens(dialect).serialize(dialect)
    }
}

impl std::fmt::Display for Query {
    /// Formats the query for Databricks.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_sql(&Databricks))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::expr::{col, func, lit_str, sum};

    fn orders() -> TableRef {
        TableRef::new("orders")
            .with_schema("retail")
            .with_catalog("main")
    }

    #[test]
    fn test_select_star() {
        let q = Query::new().select_star().from(orders()).limit(100);
        assert_eq!(q.to_string(), "SELECT\n  *\nFROM main.retail.orders\nLIMIT 100");
    }

    #[test]
    fn test_filter() {
        let q = Query::new()
            .select(vec![col("region")])
            .from(TableRef::new("orders"))
            .filter(col("region").eq("West"))
            .filter(col("segment").eq("Consumer"));

        assert_eq!(
            q.to_string(),
            "SELECT\n  region\nFROM orders\nWHERE region = 'West' AND segment = 'Consumer'"
        );
    }

    #[test]
    fn test_aggregation() {
        let q = Query::new()
            .select(vec![
                func("date_trunc", vec![lit_str("month"), col("order_date")]).alias("month"),
                sum(col("sales")).alias("sales"),
            ])
            .from(orders())
            .group_by(vec![col("month")])
            .order_by(vec![OrderByExpr::asc(col("month"))]);

        assert_eq!(
            q.to_string(),
            "SELECT\n  date_trunc('month', order_date) AS month,\n  SUM(sales) AS sales\n\
             FROM main.retail.orders\nGROUP BY month\nORDER BY month ASC"
        );
    }

    #[test]
    fn test_order_by_nulls_last() {
        let q = Query::new()
            .select(vec![col("category")])
            .from(TableRef::new("orders"))
            .order_by(vec![OrderByExpr::desc(col("profit_margin")).nulls_last()]);

        assert!(q
            .to_string()
            .ends_with("ORDER BY profit_margin DESC NULLS LAST"));
    }

    #[test]
    fn test_table_ref_from_ident() {
        let ident = TableIdent::parse("main.retail.superstore").unwrap();
        let table = TableRef::from(&ident);
        assert_eq!(table.catalog.as_deref(), Some("main"));
        assert_eq!(table.schema.as_deref(), Some("retail"));
        assert_eq!(table.table, "superstore");
    }
}
