//! SQL generation module.
//!
//! This module provides a type-safe SQL builder for the statements the
//! translator emits. It includes:
//!
//! - [`query`] - single-table SELECT query builder
//! - [`expr`] - Expression AST and builder DSL
//! - [`token`] - Token types for SQL generation
//! - [`dialect`] - Databricks dialect rendering rules

pub mod dialect;
pub mod expr;
pub mod query;
pub mod token;

// Re-export commonly used types at the sql module level
pub use dialect::{Databricks, SqlDialect};
pub use expr::{
    case_when, cast, col, func, lit_date, lit_int, lit_null, lit_str, max, min, star, sum,
    BinaryOperator, Expr, ExprExt, Literal,
};
pub use query::{OrderByExpr, Query, SelectExpr, SortDir, TableRef};
pub use token::{Token, TokenStream};
