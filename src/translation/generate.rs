//! Statement rendering for each [`Shape`].

use crate::bounds::{DateBounds, DATE_COLUMN};
use crate::intent::{Filter, Intent, Metric};
use crate::sql::{
    case_when, col, func, lit_date, lit_int, lit_null, lit_str, sum, Expr, ExprExt, OrderByExpr,
    Query, SelectExpr, TableRef,
};

use super::shape::Shape;

/// Row cap of the preview shape.
pub const PREVIEW_LIMIT: u64 = 100;

/// Build the statement for `shape`.
pub fn build(shape: Shape, intent: &Intent, table: TableRef, bounds: &DateBounds) -> Query {
    let metric = intent.metric;
    let query = Query::new().from(table);

    let query = match shape {
        Shape::Preview => return query.select_star().limit(PREVIEW_LIMIT),

        Shape::TimeSeries { grain } => {
            let period = grain.as_str();
            let mut select =
                vec![func("date_trunc", vec![lit_str(period), col(DATE_COLUMN)]).alias(period)];
            if intent.wants_multi_metric && matches!(metric, Metric::Sales | Metric::Profit) {
                select.extend(sales_and_profit());
            } else {
                select.extend(measures(metric));
            }
            query
                .select(select)
                .group_by(vec![col(period)])
                .order_by(vec![OrderByExpr::asc(col(period))])
        }

        Shape::MarginBreakdown { dimension } => {
            let mut select = vec![SelectExpr::new(col(dimension.column()))];
            select.extend(measures(Metric::ProfitMargin));
            query
                .select(select)
                .group_by(vec![col(dimension.column())])
                .order_by(vec![rank_by(Metric::ProfitMargin)])
        }

        Shape::TopN { dimension, limit } => {
            let mut select = vec![SelectExpr::new(col(dimension.column()))];
            select.extend(measures(metric));
            query
                .select(select)
                .group_by(vec![col(dimension.column())])
                .order_by(vec![rank_by(metric)])
                .limit(u64::from(limit))
        }

        Shape::Breakdown { dimension } => {
            let mut select = vec![SelectExpr::new(col(dimension.column()))];
            if intent.wants_multi_metric {
                select.extend(sales_and_profit());
            } else {
                select.extend(measures(metric));
            }
            query
                .select(select)
                .group_by(vec![col(dimension.column())])
                .order_by(vec![rank_by(metric)])
        }
    };

    intent
        .filters
        .iter()
        .fold(query, |q, filter| q.filter(filter_expr(*filter, bounds)))
}

/// Aggregated columns for `metric`.
fn measures(metric: Metric) -> Vec<SelectExpr> {
    match metric {
        Metric::ProfitMargin => vec![
            sum(col("profit")).alias("profit"),
            sum(col("sales")).alias("sales"),
            case_when(
                sum(col("sales")).eq(lit_int(0)),
                lit_null(),
                sum(col("profit")).div(sum(col("sales"))),
            )
            .alias("profit_margin"),
        ],
        m => vec![sum(col(m.as_str())).alias(m.as_str())],
    }
}

fn sales_and_profit() -> Vec<SelectExpr> {
    vec![
        sum(col("sales")).alias("sales"),
        sum(col("profit")).alias("profit"),
    ]
}

/// Highest metric first; the margin ratio puts NULL ratios last.
fn rank_by(metric: Metric) -> OrderByExpr {
    let order = OrderByExpr::desc(col(metric.as_str()));
    match metric {
        Metric::ProfitMargin => order.nulls_last(),
        _ => order,
    }
}

/// WHERE predicate for one filter.
///
/// The rolling window ends at the dataset's last order date, not today.
pub fn filter_expr(filter: Filter, bounds: &DateBounds) -> Expr {
    match filter {
        Filter::Year(year) => func("year", vec![col(DATE_COLUMN)]).eq(year),
        Filter::LastMonths(months) => {
            let end = bounds.max().to_string();
            col(DATE_COLUMN).between(
                func("add_months", vec![lit_date(&end), lit_int(-i64::from(months))]),
                lit_date(&end),
            )
        }
        Filter::Region(region) => col("region").eq(region.value()),
        Filter::Segment(segment) => col("segment").eq(segment.value()),
    }
}
