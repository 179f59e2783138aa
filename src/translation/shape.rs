//! Query shape selection.

use serde::Serialize;

use crate::intent::{Dimension, Grain, Intent, Metric};

/// The five mutually exclusive statement shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "shape")]
pub enum Shape {
    /// Aggregate per truncated date period, oldest first.
    TimeSeries { grain: Grain },
    /// Profit, sales and their ratio per dimension value.
    MarginBreakdown { dimension: Dimension },
    /// Best `limit` dimension values by the metric.
    TopN { dimension: Dimension, limit: u32 },
    /// Metric per dimension value.
    Breakdown { dimension: Dimension },
    /// First 100 rows of the table.
    Preview,
}

/// Pick the shape for `intent`.
///
/// Evaluated in priority order: time series, margin breakdown, top-N,
/// breakdown, preview.
pub fn plan(intent: &Intent) -> Shape {
    if let Some(grain) = intent.grain {
        return Shape::TimeSeries { grain };
    }
    match (intent.dimension, intent.top_n) {
        (Some(dimension), _) if intent.metric == Metric::ProfitMargin => {
            Shape::MarginBreakdown { dimension }
        }
        (Some(dimension), Some(limit)) => Shape::TopN { dimension, limit },
        (Some(dimension), None) => Shape::Breakdown { dimension },
        (None, _) => Shape::Preview,
    }
}
