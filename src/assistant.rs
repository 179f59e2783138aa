//! End-to-end request handling, from question to approved SQL.
//!
//! ```text
//! text ─┬─ starts with SELECT/WITH ──► manual SQL ─┐
//!       └─ otherwise ──► provider ─────────────────┤
//!                                                  ▼
//!                           expand {FQTN} ──► safety gate ──► Answer
//! ```
//!
//! # Example
//!
//! ```ignore
//! use sluice::assistant::Assistant;
//!
//! let assistant = Assistant::new(provider, table, bounds_cache);
//! let answer = assistant.ask("top 5 products by profit in 2022").await?;
//! println!("{}", answer.sql);
//! ```

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::bounds::{BoundsCache, BoundsSource};
use crate::config::TableIdent;
use crate::guard::{self, Rejection};
use crate::provider::{ProviderError, SqlProvider};
use crate::translation::TranslationError;

// ============================================================================
// Error Types
// ============================================================================

/// Caller-facing failure of a request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AskError {
    #[error("No data for {year}. Data covers {min} to {max}.")]
    OutOfRangeYear {
        year: i32,
        min: NaiveDate,
        max: NaiveDate,
    },

    /// The reason stays internal; see [`AskError::user_message`].
    #[error("unsafe query: {0}")]
    UnsafeQuery(Rejection),

    #[error("provider failure: {0}")]
    ProviderFailure(String),
}

impl AskError {
    /// Text safe to show the person asking.
    pub fn user_message(&self) -> String {
        match self {
            AskError::OutOfRangeYear { .. } => self.to_string(),
            AskError::UnsafeQuery(_) => {
                "Only read-only single-statement SELECTs are allowed.".to_string()
            }
            AskError::ProviderFailure(_) => {
                "The query service failed or did not return SQL in time.".to_string()
            }
        }
    }
}

impl From<TranslationError> for AskError {
    fn from(err: TranslationError) -> Self {
        match err {
            TranslationError::OutOfRangeYear { year, min, max } => {
                AskError::OutOfRangeYear { year, min, max }
            }
        }
    }
}

impl From<ProviderError> for AskError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Translation(inner) => inner.into(),
            other => AskError::ProviderFailure(other.to_string()),
        }
    }
}

pub type AskResult<T> = Result<T, AskError>;

// ============================================================================
// Result Types
// ============================================================================

/// Where the approved statement came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Typed directly as SQL.
    Manual,
    /// Produced by the named provider.
    Provider(&'static str),
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Manual => f.write_str("manual SQL"),
            Origin::Provider(name) => f.write_str(name),
        }
    }
}

/// An approved statement, ready for execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub sql: String,
    pub origin: Origin,
}

// ============================================================================
// Assistant
// ============================================================================

/// Whether `text` is hand-written SQL rather than a question.
pub fn is_manual_sql(text: &str) -> bool {
    let lower = text.trim_start().to_lowercase();
    lower.starts_with("select") || lower.starts_with("with")
}

/// Routes a request through a provider and the safety gate.
pub struct Assistant<S: BoundsSource> {
    provider: Arc<dyn SqlProvider>,
    table: TableIdent,
    bounds: Arc<BoundsCache<S>>,
}

impl<S: BoundsSource> Assistant<S> {
    pub fn new(provider: Arc<dyn SqlProvider>, table: TableIdent, bounds: Arc<BoundsCache<S>>) -> Self {
        Self {
            provider,
            table,
            bounds,
        }
    }

    pub fn table(&self) -> &TableIdent {
        &self.table
    }

    /// Turn `text` into an approved statement.
    pub async fn ask(&self, text: &str) -> AskResult<Answer> {
        let text = text.trim();

        let (sql, origin) = if is_manual_sql(text) {
            (text.to_string(), Origin::Manual)
        } else {
            let bounds = self.bounds.get_or_fetch().await.map_err(|e| {
                tracing::warn!(error = %e, "date bounds unavailable");
                AskError::ProviderFailure(e.to_string())
            })?;
            let sql = self
                .provider
                .translate(text, &self.table, &bounds)
                .await
                .map_err(|e| {
                    tracing::warn!(provider = self.provider.name(), error = %e, "provider failed");
                    AskError::from(e)
                })?;
            (sql, Origin::Provider(self.provider.name()))
        };

        let sql = guard::expand_table_placeholder(&sql, &self.table);
        if let Err(rejection) = guard::inspect(&sql) {
            tracing::warn!(%origin, reason = %rejection, "rejected unsafe statement");
            return Err(AskError::UnsafeQuery(rejection));
        }

        tracing::debug!(%origin, "statement approved");
        Ok(Answer { sql, origin })
    }
}
