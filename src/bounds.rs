//! Dataset date bounds.
//!
//! The year and rolling-window filters are validated against the minimum and
//! maximum order date of the fact table. The bounds are fetched once through a
//! [`BoundsSource`] and then shared read-only via [`BoundsCache`]; a refresh
//! swaps the whole value under a write lock, so readers observe either the old
//! or the new bounds.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::config::TableIdent;
use crate::sql::{cast, col, max, min, Databricks, ExprExt, Query, TableRef};

/// Column holding the order date on the fact table.
pub const DATE_COLUMN: &str = "order_date";

/// Error type for bounds operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoundsError {
    #[error("Invalid date bounds: {min} is after {max}")]
    Inverted { min: NaiveDate, max: NaiveDate },

    #[error("Date bounds unavailable: {0}")]
    Unavailable(String),
}

/// Inclusive order-date coverage of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBounds {
    min: NaiveDate,
    max: NaiveDate,
}

impl DateBounds {
    pub fn new(min: NaiveDate, max: NaiveDate) -> Result<Self, BoundsError> {
        if min > max {
            return Err(BoundsError::Inverted { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> NaiveDate {
        self.min
    }

    pub fn max(&self) -> NaiveDate {
        self.max
    }

    pub fn min_year(&self) -> i32 {
        self.min.year()
    }

    pub fn max_year(&self) -> i32 {
        self.max.year()
    }

    /// Whether `year` lies within `[min.year, max.year]`.
    pub fn covers_year(&self, year: i32) -> bool {
        (self.min_year()..=self.max_year()).contains(&year)
    }
}

/// Where dataset bounds come from.
#[async_trait]
pub trait BoundsSource: Send + Sync {
    /// Fetch the min/max order date for `table`.
    async fn fetch(&self, table: &TableIdent) -> Result<DateBounds, BoundsError>;
}

/// Bounds known up front (settings file or command line).
#[derive(Debug, Clone, Copy)]
pub struct StaticBounds(pub DateBounds);

#[async_trait]
impl BoundsSource for StaticBounds {
    async fn fetch(&self, _table: &TableIdent) -> Result<DateBounds, BoundsError> {
        Ok(self.0)
    }
}

/// No bounds available; only requests that never read them can succeed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBounds;

#[async_trait]
impl BoundsSource for NoBounds {
    async fn fetch(&self, table: &TableIdent) -> Result<DateBounds, BoundsError> {
        Err(BoundsError::Unavailable(format!(
            "no date bounds configured for {table}"
        )))
    }
}

/// Fetch-once, read-many cache of the dataset bounds.
pub struct BoundsCache<S: BoundsSource> {
    source: Arc<S>,
    table: TableIdent,
    cached: RwLock<Option<DateBounds>>,
}

impl<S: BoundsSource> BoundsCache<S> {
    pub fn new(source: Arc<S>, table: TableIdent) -> Self {
        Self {
            source,
            table,
            cached: RwLock::new(None),
        }
    }

    /// Cached bounds, if already fetched.
    pub async fn current(&self) -> Option<DateBounds> {
        *self.cached.read().await
    }

    /// Return the cached bounds, fetching them on first use.
    pub async fn get_or_fetch(&self) -> Result<DateBounds, BoundsError> {
        if let Some(bounds) = *self.cached.read().await {
            return Ok(bounds);
        }

        let mut slot = self.cached.write().await;
        // Another task may have filled it while we waited for the lock.
        if let Some(bounds) = *slot {
            return Ok(bounds);
        }

        let bounds = self.source.fetch(&self.table).await?;
        tracing::debug!(table = %self.table, min = %bounds.min, max = %bounds.max, "fetched date bounds");
        *slot = Some(bounds);
        Ok(bounds)
    }

    /// Re-fetch and replace the cached bounds.
    ///
    /// On failure the previous value stays in place.
    pub async fn refresh(&self) -> Result<DateBounds, BoundsError> {
        let bounds = self.source.fetch(&self.table).await?;
        *self.cached.write().await = Some(bounds);
        tracing::info!(table = %self.table, min = %bounds.min, max = %bounds.max, "refreshed date bounds");
        Ok(bounds)
    }
}

/// The probe statement that reads the bounds from the fact table.
pub fn bounds_query(table: &TableIdent) -> String {
    Query::new()
        .select(vec![
            cast(min(col(DATE_COLUMN)), "DATE").alias("min_date"),
            cast(max(col(DATE_COLUMN)), "DATE").alias("max_date"),
        ])
        .from(TableRef::from(table))
        .to_sql(&Databricks)
}
