//! Integration tests for the read-only safety gate.

use sluice::bounds::bounds_query;
use sluice::config::TableIdent;
use sluice::guard::{expand_table_placeholder, inspect, is_safe_select, Rejection, BANNED_KEYWORDS};

#[test]
fn test_reference_cases() {
    assert!(is_safe_select("SELECT * FROM t LIMIT 100"));
    assert!(!is_safe_select("SELECT 1; DROP TABLE t"));
}

#[test]
fn test_every_banned_keyword_rejected_in_any_case() {
    for keyword in BANNED_KEYWORDS {
        let lower = format!("SELECT a FROM t WHERE b = 1 {keyword} x");
        let upper = format!("select a from t where b = 1 {} x", keyword.to_uppercase());
        assert_eq!(
            inspect(&lower),
            Err(Rejection::BannedKeyword(keyword.to_string())),
            "{keyword}"
        );
        assert!(!is_safe_select(&upper), "{keyword}");
    }
}

#[test]
fn test_banned_keyword_nested_in_cte() {
    assert!(!is_safe_select(
        "WITH x AS (SELECT * FROM t) SELECT * FROM x WHERE EXISTS (TRUNCATE t)"
    ));
}

#[test]
fn test_comment_markers_rejected() {
    for sql in [
        "SELECT * FROM t -- trailing",
        "SELECT * FROM t /* block */",
        "SELECT * FROM t */",
        "SELECT '--' FROM t",
    ] {
        assert_eq!(inspect(sql), Err(Rejection::Comment), "{sql}");
    }
}

#[test]
fn test_semicolon_anywhere_rejected() {
    assert_eq!(inspect("SELECT ';' FROM t"), Err(Rejection::Semicolon));
    assert_eq!(inspect("SELECT * FROM t;"), Err(Rejection::Semicolon));
}

#[test]
fn test_must_start_with_select_or_with() {
    assert_eq!(inspect("EXPLAIN SELECT 1"), Err(Rejection::NotSelect));
    assert_eq!(inspect("(SELECT 1)"), Err(Rejection::NotSelect));
    assert!(is_safe_select("\n   SELECT 1"));
}

#[test]
fn test_cte_must_reach_select() {
    assert_eq!(inspect("WITH x AS (VALUES 1)"), Err(Rejection::CteWithoutSelect));
    assert!(is_safe_select("WITH x AS (SELECT 1 AS a)\nSELECT a FROM x"));
}

#[test]
fn test_identifiers_containing_keywords_allowed() {
    assert!(is_safe_select(
        "SELECT updated_at, dropoff, settings_id, user_id FROM t"
    ));
}

#[test]
fn test_placeholder_then_gate() {
    let table = TableIdent::parse("main.retail_gold.vw_sales_daily").unwrap();
    let sql = expand_table_placeholder("SELECT region FROM {FQTN} LIMIT 10", &table);
    assert_eq!(sql, "SELECT region FROM main.retail_gold.vw_sales_daily LIMIT 10");
    assert!(is_safe_select(&sql));
}

#[test]
fn test_bounds_probe_passes_gate() {
    let table = TableIdent::parse("main.retail_gold.vw_sales_daily").unwrap();
    assert!(is_safe_select(&bounds_query(&table)));
}
