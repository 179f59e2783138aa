//! Rule-based translation of questions into SQL.
//!
//! ```text
//! text → Intent → year check → Shape → Query → SQL
//! ```
//!
//! # Example
//!
//! ```ignore
//! use sluice::translation::translate;
//!
//! let sql = translate("top 5 products by profit in 2022", &table, &bounds)?;
//! ```

mod generate;
mod shape;

pub use generate::{filter_expr, PREVIEW_LIMIT};
pub use shape::{plan, Shape};

use chrono::NaiveDate;
use serde::Serialize;

use crate::bounds::DateBounds;
use crate::config::TableIdent;
use crate::intent::Intent;
use crate::sql::{Databricks, Query, TableRef};

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during translation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslationError {
    #[error("No data for {year}. Data covers {min} to {max}.")]
    OutOfRangeYear {
        year: i32,
        min: NaiveDate,
        max: NaiveDate,
    },
}

pub type TranslationResult<T> = Result<T, TranslationError>;

// ============================================================================
// Result Types
// ============================================================================

/// A translated question with the reasoning behind it.
#[derive(Debug, Clone, Serialize)]
pub struct Translation {
    /// What was read from the text.
    pub intent: Intent,

    /// Which statement shape was chosen.
    pub shape: Shape,

    /// The generated SQL string.
    pub sql: String,
}

// ============================================================================
// Main API
// ============================================================================

/// Translate a question into a read-only SQL statement against `table`.
///
/// Fails with [`TranslationError::OutOfRangeYear`] when the question asks
/// for a year the dataset does not cover.
pub fn translate(text: &str, table: &TableIdent, bounds: &DateBounds) -> TranslationResult<String> {
    translate_explained(text, table, bounds).map(|t| t.sql)
}

/// Like [`translate`], also returning the intent and shape.
pub fn translate_explained(
    text: &str,
    table: &TableIdent,
    bounds: &DateBounds,
) -> TranslationResult<Translation> {
    let intent = Intent::from_text(text);
    let (shape, query) = build_query(&intent, table, bounds)?;
    Ok(Translation {
        sql: query.to_sql(&Databricks),
        intent,
        shape,
    })
}

/// Validate `intent` against `bounds` and build its statement.
pub fn build_query(
    intent: &Intent,
    table: &TableIdent,
    bounds: &DateBounds,
) -> TranslationResult<(Shape, Query)> {
    if let Some(year) = intent.year() {
        if !bounds.covers_year(year) {
            return Err(TranslationError::OutOfRangeYear {
                year,
                min: bounds.min(),
                max: bounds.max(),
            });
        }
    }

    let shape = plan(intent);
    tracing::debug!(?shape, "planned query shape");
    if shape == Shape::Preview && !intent.filters.is_empty() {
        tracing::debug!(filters = ?intent.filters, "preview shape ignores filters");
    }

    let query = generate::build(shape, intent, TableRef::from(table), bounds);
    Ok((shape, query))
}
