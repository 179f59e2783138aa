//! Integration tests for question → SQL translation.
//!
//! These tests drive `translate` end to end against a fixed table and
//! dataset bounds, and check every generated statement against the gate.

use chrono::NaiveDate;
use insta::assert_snapshot;
use sluice::bounds::DateBounds;
use sluice::config::TableIdent;
use sluice::guard::is_safe_select;
use sluice::intent::{Dimension, Intent, Metric};
use sluice::translation::{translate, TranslationError};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn table() -> TableIdent {
    TableIdent::parse("main.retail.sales").unwrap()
}

/// Dataset covering 2021 through 2023.
fn bounds() -> DateBounds {
    DateBounds::new(date(2021, 1, 3), date(2023, 12, 30)).unwrap()
}

fn sql(text: &str) -> String {
    translate(text, &table(), &bounds()).unwrap()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_sales_by_month() {
    let sql = sql("Show sales by month");

    assert!(sql.contains("date_trunc('month', order_date) AS month"));
    assert!(sql.contains("SUM(sales) AS sales"));
    assert!(sql.contains("GROUP BY month"));
    assert!(sql.contains("ORDER BY month ASC"));
    assert!(!sql.contains("WHERE"));
}

#[test]
fn test_top_products_by_profit_in_year() {
    assert_snapshot!(sql("top 5 products by profit in 2022"), @r"
    SELECT
      product_name,
      SUM(profit) AS profit
    FROM main.retail.sales
    WHERE year(order_date) = 2022
    GROUP BY product_name
    ORDER BY profit DESC
    LIMIT 5
    ");
}

#[test]
fn test_year_before_coverage_fails() {
    let err = translate("sales in 2019", &table(), &bounds()).unwrap_err();
    assert_eq!(
        err,
        TranslationError::OutOfRangeYear {
            year: 2019,
            min: date(2021, 1, 3),
            max: date(2023, 12, 30),
        }
    );
    assert_eq!(
        err.to_string(),
        "No data for 2019. Data covers 2021-01-03 to 2023-12-30."
    );
}

#[test]
fn test_year_coverage_is_inclusive() {
    assert!(translate("sales by region in 2021", &table(), &bounds()).is_ok());
    assert!(translate("sales by region in 2023", &table(), &bounds()).is_ok());
    assert!(translate("sales by region in 2024", &table(), &bounds()).is_err());
}

#[test]
fn test_unrecognized_text_previews_table() {
    assert_eq!(sql("hello"), "SELECT\n  *\nFROM main.retail.sales\nLIMIT 100");
}

#[test]
fn test_profit_margin_by_region() {
    assert_snapshot!(sql("profit margin by region in 2022"), @r"
    SELECT
      region,
      SUM(profit) AS profit,
      SUM(sales) AS sales,
      CASE WHEN SUM(sales) = 0 THEN NULL ELSE SUM(profit) / SUM(sales) END AS profit_margin
    FROM main.retail.sales
    WHERE year(order_date) = 2022
    GROUP BY region
    ORDER BY profit_margin DESC NULLS LAST
    ");
}

#[test]
fn test_breakdown_multi_metric() {
    assert_snapshot!(sql("sales and profit by segment"), @r"
    SELECT
      segment,
      SUM(sales) AS sales,
      SUM(profit) AS profit
    FROM main.retail.sales
    GROUP BY segment
    ORDER BY sales DESC
    ");
}

#[test]
fn test_time_series_margin_keeps_ratio_columns() {
    let sql = sql("profit % by year");
    assert!(sql.contains("date_trunc('year', order_date) AS year"));
    assert!(sql.contains("AS profit_margin"));
    assert!(sql.ends_with("ORDER BY year ASC"));
}

#[test]
fn test_time_series_multi_metric_only_for_sales_or_profit() {
    // "sales" outranks "discount", so the pair is projected.
    let paired = sql("discount by month sales and profit");
    assert!(paired.contains("SUM(sales) AS sales,\n  SUM(profit) AS profit"));

    let single = sql("quantity by month");
    assert!(single.contains("SUM(quantity) AS quantity"));
}

#[test]
fn test_all_filters_conjoined_in_order() {
    let sql = sql("segment consumer quantity by city in east last 3 months in 2023");
    assert!(sql.contains(
        "WHERE year(order_date) = 2023 \
         AND order_date BETWEEN add_months(DATE '2023-12-30', -3) AND DATE '2023-12-30' \
         AND region = 'East' AND segment = 'Consumer'"
    ));
}

#[test]
fn test_grouping_by_segment_drops_segment_filter() {
    let sql = sql("sales by segment segment consumer");
    assert!(sql.contains("GROUP BY segment"));
    assert!(!sql.contains("WHERE"));
}

// ============================================================================
// Pinned behaviors
// ============================================================================

/// The preview shape does not apply extracted filters.
#[test]
fn test_preview_ignores_filters() {
    assert_eq!(
        sql("sales in 2022"),
        "SELECT\n  *\nFROM main.retail.sales\nLIMIT 100"
    );
    assert_eq!(
        sql("anything in west last 6 months"),
        "SELECT\n  *\nFROM main.retail.sales\nLIMIT 100"
    );
}

/// The year check still runs when the preview shape is chosen.
#[test]
fn test_preview_still_checks_year() {
    assert!(translate("sales in 1999", &table(), &bounds()).is_err());
}

/// Rolling windows end at the dataset's last order date, never today.
#[test]
fn test_rolling_window_anchored_to_dataset_end() {
    let old = DateBounds::new(date(2014, 1, 3), date(2017, 12, 30)).unwrap();
    let sql = translate("sales by region last 12 months", &table(), &old).unwrap();

    assert!(sql.contains(
        "order_date BETWEEN add_months(DATE '2017-12-30', -12) AND DATE '2017-12-30'"
    ));
    let today = chrono::Local::now().date_naive().to_string();
    assert!(!sql.contains(&today));
}

#[test]
fn test_oversized_counts_saturate() {
    let top = sql("top 99999999999 products by sales");
    assert!(top.ends_with("LIMIT 2147483647"), "{top}");

    let window = sql("sales by region last 99999999999 months");
    assert!(
        window.contains("WHERE order_date BETWEEN add_months(DATE '2023-12-30', -2147483647)"),
        "{window}"
    );
}

#[test]
fn test_non_ascii_digits_are_not_counts() {
    let intent = Intent::from_text("top ٥ products by sales in 20٢٢ last ٦ months");
    assert_eq!(intent.top_n, None);
    assert!(intent.filters.is_empty(), "{:?}", intent.filters);
}

// ============================================================================
// Intent properties
// ============================================================================

#[test]
fn test_dimension_synonyms_resolve_to_same_column() {
    let groups: &[(&[&str], Dimension)] = &[
        (
            &["customer", "customers", "customer name", "customer names"],
            Dimension::CustomerName,
        ),
        (
            &["product", "products", "product name", "product names"],
            Dimension::ProductName,
        ),
        (&["region", "regions"], Dimension::Region),
        (&["segment", "segments"], Dimension::Segment),
        (&["state", "states"], Dimension::State),
        (&["city", "cities"], Dimension::City),
        (&["ship mode", "shipmode", "ship modes"], Dimension::ShipMode),
    ];

    for (words, expected) in groups {
        for word in *words {
            let intent = Intent::from_text(&format!("sales by {word}"));
            assert_eq!(intent.dimension, Some(*expected), "sales by {word}");
        }
    }
}

#[test]
fn test_profit_margin_phrases_never_read_as_profit() {
    for text in [
        "profit margin by category",
        "Profit % by category",
        "profit by category, profit margin",
        "show profit margin",
    ] {
        assert_eq!(Intent::from_text(text).metric, Metric::ProfitMargin, "{text}");
    }
}

// ============================================================================
// Round trip
// ============================================================================

#[test]
fn test_generated_sql_always_passes_gate() {
    let questions = [
        "Show sales by month",
        "sales and profit by quarter",
        "profit by year in 2022",
        "profit margin by category",
        "margin by ship mode in south",
        "top 10 customers by sales",
        "top 3 products by quantity last 6 months",
        "top 5 cities by discount segment home office",
        "revenue by state in 2023 in west",
        "sales and profit by region",
        "qty by subcategory",
        "hello",
        "",
        "drop table sales",
        "sales; delete everything -- please",
    ];

    for q in questions {
        let sql = translate(q, &table(), &bounds()).unwrap();
        assert!(is_safe_select(&sql), "generated SQL rejected for {q:?}:\n{sql}");
    }
}
