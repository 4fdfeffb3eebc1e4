//! End-to-end: dataset catalogs on disk through search, fallback and comparison.

use price_scout::analyzer::{Comparer, PriceComparer};
use price_scout::config::AppConfig;
use price_scout::live::LiveSource;
use price_scout::model::{Listing, ScraperError};
use price_scout::search::{CatalogExpander, SearchOrchestrator, SearchOrigin};
use price_scout::source::registry::catalog_path;
use price_scout::source::{DatasetSource, ProductSource, SourceAggregator};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

fn datasets() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        catalog_path(dir.path(), "bigbasket"),
        r#"[
            {"product_name": "Amul Milk 1L", "price": 54, "brand": "Amul", "category": "Dairy"},
            {"product_name": "Britannia Bread 400g", "price": 45, "brand": "Britannia", "category": "Bakery"}
        ]"#,
    )
    .unwrap();
    fs::write(
        catalog_path(dir.path(), "blinkit"),
        r#"[
            {"product_name": "Amul Milk 1L", "price": 58, "brand": "Amul", "category": "Dairy"},
            {"product_name": "Britannia Bread 400g", "price": "n/a", "brand": "Britannia"}
        ]"#,
    )
    .unwrap();
    fs::write(catalog_path(dir.path(), "zepto"), "[{\"product_name\": ").unwrap();
    dir
}

fn aggregator(dir: &TempDir) -> Arc<SourceAggregator> {
    Arc::new(SourceAggregator::new(Box::new(DatasetSource::new(dir.path()))))
}

struct BlockedLive;

#[async_trait::async_trait]
impl LiveSource for BlockedLive {
    async fn search_all(&self, _query: &str, _max: usize) -> Result<Vec<Listing>, ScraperError> {
        Err(ScraperError::InvalidResponse(503))
    }
}

#[test]
fn milk_is_found_on_both_platforms_and_cheapest_flagged() {
    let dir = datasets();
    let source = DatasetSource::new(dir.path());

    let results = source.search("milk", None);
    assert_eq!(results.len(), 2);

    let compared = PriceComparer::new().compare(&results);
    assert_eq!(compared[0].listing.price, 54.0);
    assert_eq!(compared[0].listing.platform, "bigbasket");
    assert!(compared[0].is_best_price);
    assert_eq!(compared[1].listing.price, 58.0);
    assert!(!compared[1].is_best_price);
}

#[tokio::test]
async fn blocked_live_search_returns_dataset_results() {
    let dir = datasets();
    let aggregator = aggregator(&dir);
    let orchestrator =
        SearchOrchestrator::new(aggregator.clone(), &AppConfig::default()).with_live(Arc::new(BlockedLive));

    let outcome = orchestrator.search_outcome("bread", None).await;

    assert_eq!(outcome.origin, SearchOrigin::Dataset);
    assert_eq!(outcome.listings, aggregator.search("bread", None));
    // the blinkit bread has no usable price and never reaches the engine
    assert_eq!(outcome.listings.len(), 1);
}

#[tokio::test]
async fn smart_search_corrects_typos() {
    let dir = datasets();
    let aggregator = aggregator(&dir);
    let expander = CatalogExpander::from_catalog(&aggregator.all_products());
    let orchestrator =
        SearchOrchestrator::new(aggregator, &AppConfig::default()).with_expander(Arc::new(expander));

    let report = orchestrator.compare_query("mlik", true).await;

    assert_eq!(report.results.len(), 2);
    assert!(report.results.iter().all(|r| r.listing.product_name == "Amul Milk 1L"));
    let summary = report.summary.as_ref().unwrap();
    assert_eq!(summary.min_price, 54.0);
    assert_eq!(summary.max_price, 58.0);
    assert_eq!(summary.avg_price, 56.0);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["corrected_query"], "milk");
    assert_eq!(json["entities"]["categories"][0], "milk");
}

#[tokio::test]
async fn repeated_catalog_entries_reach_the_report_once() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        catalog_path(dir.path(), "zepto"),
        r#"[
            {"product_name": "Lays Chips", "price": 20},
            {"product_name": "Lays Chips", "price": 20}
        ]"#,
    )
    .unwrap();
    let orchestrator = SearchOrchestrator::new(aggregator(&dir), &AppConfig::default());

    assert_eq!(orchestrator.search("chips").await.len(), 1);
    let report = orchestrator.compare_query("chips", false).await;
    assert_eq!(report.results.len(), 1);
    assert!(report.results[0].is_best_price);
}

#[tokio::test]
async fn report_serializes_flat_listings() {
    let dir = datasets();
    let orchestrator = SearchOrchestrator::new(aggregator(&dir), &AppConfig::default());

    let report = orchestrator.compare_query("milk", false).await;
    let json = serde_json::to_value(&report).unwrap();

    assert_eq!(json["query"], "milk");
    assert_eq!(json["results"][0]["product_name"], "Amul Milk 1L");
    assert_eq!(json["results"][0]["is_best_price"], true);
    assert_eq!(json["results"][1]["is_best_price"], false);
    assert!(json["results"][0].get("rating").is_none());
    assert!(json.get("corrected_query").is_none());
    assert_eq!(json["summary"]["total_products"], 2);
}
