//! Integration tests for the request pipeline.
//!
//! Providers here are scripted so the tests can feed the gate arbitrary SQL.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use sluice::assistant::{AskError, Assistant, Origin};
use sluice::bounds::{BoundsCache, DateBounds, NoBounds, StaticBounds};
use sluice::config::TableIdent;
use sluice::guard::Rejection;
use sluice::provider::{ProviderError, ProviderResult, RulesProvider, SqlProvider};

fn table() -> TableIdent {
    TableIdent::parse("main.retail_gold.vw_sales_daily").unwrap()
}

fn bounds() -> DateBounds {
    DateBounds::new(
        NaiveDate::from_ymd_opt(2021, 1, 3).unwrap(),
        NaiveDate::from_ymd_opt(2023, 12, 30).unwrap(),
    )
    .unwrap()
}

fn assistant(provider: Arc<dyn SqlProvider>) -> Assistant<StaticBounds> {
    let cache = Arc::new(BoundsCache::new(Arc::new(StaticBounds(bounds())), table()));
    Assistant::new(provider, table(), cache)
}

/// Provider that always answers with the same statement.
struct Canned(&'static str);

#[async_trait]
impl SqlProvider for Canned {
    fn name(&self) -> &'static str {
        "canned"
    }

    async fn translate(&self, _: &str, _: &TableIdent, _: &DateBounds) -> ProviderResult<String> {
        Ok(self.0.to_string())
    }
}

/// Provider that never completes.
struct Stalled;

#[async_trait]
impl SqlProvider for Stalled {
    fn name(&self) -> &'static str {
        "stalled"
    }

    async fn translate(&self, _: &str, _: &TableIdent, _: &DateBounds) -> ProviderResult<String> {
        Err(ProviderError::TimedOut { attempts: 3 })
    }
}

#[tokio::test]
async fn test_rules_provider_answer() {
    let answer = assistant(Arc::new(RulesProvider))
        .ask("  top 5 products by profit in 2022 ")
        .await
        .unwrap();

    assert_eq!(answer.origin, Origin::Provider("rules"));
    assert!(answer.sql.contains("FROM main.retail_gold.vw_sales_daily"));
    assert!(answer.sql.ends_with("LIMIT 5"));
}

#[tokio::test]
async fn test_out_of_range_year_surfaces() {
    let err = assistant(Arc::new(RulesProvider))
        .ask("sales in 2019")
        .await
        .unwrap_err();

    assert!(matches!(err, AskError::OutOfRangeYear { year: 2019, .. }));
    assert_eq!(
        err.user_message(),
        "No data for 2019. Data covers 2021-01-03 to 2023-12-30."
    );
}

#[tokio::test]
async fn test_manual_sql_bypasses_provider_and_expands_placeholder() {
    let answer = assistant(Arc::new(Stalled))
        .ask("select region, sum(sales) from {FQTN} group by region")
        .await
        .unwrap();

    assert_eq!(answer.origin, Origin::Manual);
    assert_eq!(
        answer.sql,
        "select region, sum(sales) from main.retail_gold.vw_sales_daily group by region"
    );
}

#[tokio::test]
async fn test_manual_sql_still_gated() {
    let err = assistant(Arc::new(RulesProvider))
        .ask("SELECT 1; DROP TABLE {FQTN}")
        .await
        .unwrap_err();

    assert_eq!(err, AskError::UnsafeQuery(Rejection::Semicolon));
    assert_eq!(
        err.user_message(),
        "Only read-only single-statement SELECTs are allowed."
    );
}

#[tokio::test]
async fn test_provider_output_is_gated() {
    let err = assistant(Arc::new(Canned("DELETE FROM {FQTN}")))
        .ask("remove everything")
        .await
        .unwrap_err();
    assert_eq!(err, AskError::UnsafeQuery(Rejection::NotSelect));

    let err = assistant(Arc::new(Canned("SELECT * FROM t WHERE 1 = 1 OR vacuum")))
        .ask("anything")
        .await
        .unwrap_err();
    assert_eq!(err, AskError::UnsafeQuery(Rejection::BannedKeyword("vacuum".into())));
}

#[tokio::test]
async fn test_provider_placeholder_expanded() {
    let answer = assistant(Arc::new(Canned("SELECT * FROM {FQTN} LIMIT 5")))
        .ask("first rows")
        .await
        .unwrap();
    assert_eq!(answer.origin, Origin::Provider("canned"));
    assert_eq!(answer.sql, "SELECT * FROM main.retail_gold.vw_sales_daily LIMIT 5");
}

#[tokio::test]
async fn test_provider_failure_is_generic() {
    let err = assistant(Arc::new(Stalled)).ask("sales by month").await.unwrap_err();

    assert!(matches!(err, AskError::ProviderFailure(_)));
    assert_eq!(
        err.user_message(),
        "The query service failed or did not return SQL in time."
    );
}

#[tokio::test]
async fn test_manual_sql_without_bounds() {
    let cache = Arc::new(BoundsCache::new(Arc::new(NoBounds), table()));
    let assistant = Assistant::new(Arc::new(RulesProvider), table(), cache);

    let answer = assistant.ask("SELECT 1").await.unwrap();
    assert_eq!(answer.origin, Origin::Manual);
    assert_eq!(answer.sql, "SELECT 1");

    let err = assistant.ask("sales by month").await.unwrap_err();
    assert!(matches!(err, AskError::ProviderFailure(_)));
}
