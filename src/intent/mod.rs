//! Intent extraction.
//!
//! Turns a free-form analytics question into a structured [`Intent`]:
//!
//! ```text
//! raw text ──► normalize ──► extractors (metric, grain, dimension, top-N, filters)
//!                                 │
//!                                 ▼
//!                             assemble ──► Intent
//! ```
//!
//! Extractors are independent pure functions over the normalized text; the
//! assembler applies the cross-field defaults. All patterns live in
//! [`rules`] as ordered tables, so priority is the table order.

mod assemble;
mod extract;
mod normalize;
pub mod rules;

pub use assemble::assemble;
pub use extract::{
    extract_dimension, extract_filters, extract_grain, extract_last_months, extract_metric,
    extract_region, extract_segment, extract_top_n, extract_year, MAX_COUNT,
};
pub use normalize::{normalize, NormalizedQuery};

use serde::Serialize;

// =============================================================================
// Closed enumerations
// =============================================================================

/// Measure being aggregated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    Sales,
    Profit,
    Quantity,
    Discount,
    /// Derived ratio `SUM(profit) / SUM(sales)`.
    ProfitMargin,
}

impl Metric {
    /// Column / alias name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Sales => "sales",
            Metric::Profit => "profit",
            Metric::Quantity => "quantity",
            Metric::Discount => "discount",
            Metric::ProfitMargin => "profit_margin",
        }
    }
}

/// Time bucket for time-series queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Grain {
    Month,
    Quarter,
    Year,
}

impl Grain {
    /// `date_trunc` unit, also used as the period alias.
    pub fn as_str(&self) -> &'static str {
        match self {
            Grain::Month => "month",
            Grain::Quarter => "quarter",
            Grain::Year => "year",
        }
    }
}

/// Categorical GROUP BY column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    CustomerName,
    ProductName,
    Category,
    Subcategory,
    Region,
    Segment,
    State,
    City,
    ShipMode,
}

impl Dimension {
    pub fn column(&self) -> &'static str {
        match self {
            Dimension::CustomerName => "customer_name",
            Dimension::ProductName => "product_name",
            Dimension::Category => "category",
            Dimension::Subcategory => "subcategory",
            Dimension::Region => "region",
            Dimension::Segment => "segment",
            Dimension::State => "state",
            Dimension::City => "city",
            Dimension::ShipMode => "ship_mode",
        }
    }
}

/// Sales region filter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Region {
    West,
    East,
    Central,
    South,
}

impl Region {
    /// Stored value in the `region` column.
    pub fn value(&self) -> &'static str {
        match self {
            Region::West => "West",
            Region::East => "East",
            Region::Central => "Central",
            Region::South => "South",
        }
    }
}

/// Customer segment filter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Segment {
    Consumer,
    Corporate,
    HomeOffice,
}

impl Segment {
    /// Stored value in the `segment` column.
    pub fn value(&self) -> &'static str {
        match self {
            Segment::Consumer => "Consumer",
            Segment::Corporate => "Corporate",
            Segment::HomeOffice => "Home Office",
        }
    }
}

/// One WHERE predicate. Only closed-enumeration values and integers are
/// carried, so rendering never splices user text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Filter {
    /// `year(order_date) = <year>`
    Year(i32),
    /// Trailing window of N months ending at the dataset's last order date.
    LastMonths(u32),
    Region(Region),
    Segment(Segment),
}

// =============================================================================
// Intent
// =============================================================================

/// Structured reading of a question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Intent {
    pub metric: Metric,
    pub grain: Option<Grain>,
    pub dimension: Option<Dimension>,
    pub top_n: Option<u32>,
    /// In WHERE order: year, rolling window, region, segment.
    pub filters: Vec<Filter>,
    /// Text asked for sales and profit together.
    pub wants_multi_metric: bool,
}

impl Intent {
    /// Normalize `raw` and assemble its intent.
    pub fn from_text(raw: &str) -> Self {
        assemble(&normalize(raw))
    }

    /// Year requested by a year filter, if any.
    pub fn year(&self) -> Option<i32> {
        self.filters.iter().find_map(|f| match f {
            Filter::Year(y) => Some(*y),
            _ => None,
        })
    }
}
