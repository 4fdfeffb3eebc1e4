use crate::analyzer::{Comparer, PriceComparer};
use crate::config::{AppConfig, FallbackPolicy};
use crate::live::LiveSource;
use crate::model::{ComparisonReport, Listing};
use crate::search::expansion::{ImageClassifier, NoClassifier, NoExpansion, QueryExpander};
use crate::source::registry::{category_datasets, category_keywords};
use crate::source::{ProductSource, dedupe_by_platform};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Which branch produced a search result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchOrigin {
    Live,
    Dataset,
    LiveAndDataset,
    Nothing,
}

#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub listings: Vec<Listing>,
    pub origin: SearchOrigin,
}

/// Runs a query through live search and the dataset fallback.
///
/// Every entry point returns a list, possibly empty; source failures are
/// logged and turned into fallback or empty results.
pub struct SearchOrchestrator {
    dataset: Arc<dyn ProductSource>,
    live: Option<Arc<dyn LiveSource>>,
    expander: Arc<dyn QueryExpander>,
    classifier: Arc<dyn ImageClassifier>,
    policy: FallbackPolicy,
    max_per_platform: usize,
    max_expanded_keywords: usize,
    max_visual_results: usize,
}

impl SearchOrchestrator {
    pub fn new(dataset: Arc<dyn ProductSource>, config: &AppConfig) -> Self {
        Self {
            dataset,
            live: None,
            expander: Arc::new(NoExpansion),
            classifier: Arc::new(NoClassifier),
            policy: config.fallback_policy,
            max_per_platform: config.live.max_per_platform,
            max_expanded_keywords: config.max_expanded_keywords,
            max_visual_results: config.max_visual_results,
        }
    }

    /// Enables live search. Without a live source every query goes to the datasets.
    pub fn with_live(mut self, live: Arc<dyn LiveSource>) -> Self {
        self.live = Some(live);
        self
    }

    pub fn with_expander(mut self, expander: Arc<dyn QueryExpander>) -> Self {
        self.expander = expander;
        self
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn ImageClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_policy(mut self, policy: FallbackPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> FallbackPolicy {
        self.policy
    }

    pub fn live_enabled(&self) -> bool {
        self.live.is_some()
    }

    pub async fn search(&self, query: &str) -> Vec<Listing> {
        self.search_outcome(query, None).await.listings
    }

    pub async fn search_on(&self, query: &str, platform: &str) -> Vec<Listing> {
        self.search_outcome(query, Some(platform)).await.listings
    }

    /// Live first; datasets when live is disabled, failed or found nothing.
    /// Under `FallbackPolicy::Merge` the datasets are searched after live success too.
    pub async fn search_outcome(&self, query: &str, platform: Option<&str>) -> SearchOutcome {
        let query = query.trim();
        if query.is_empty() {
            return SearchOutcome {
                listings: Vec::new(),
                origin: SearchOrigin::Nothing,
            };
        }

        let live_results = match &self.live {
            Some(live) => {
                info!("Searching live data for '{}'", query);
                match live.search_all(query, self.max_per_platform).await {
                    Ok(listings) => {
                        info!("Found {} live listings", listings.len());
                        listings
                    }
                    Err(e) => {
                        warn!("Live search failed, falling back to datasets: {}", e);
                        Vec::new()
                    }
                }
            }
            None => Vec::new(),
        };

        if !live_results.is_empty() && self.policy == FallbackPolicy::LiveFirst {
            return SearchOutcome {
                listings: dedupe_by_platform(live_results),
                origin: SearchOrigin::Live,
            };
        }

        let dataset_results = self.dataset.search(query, platform);
        if !dataset_results.is_empty() {
            info!("Found {} listings in local datasets", dataset_results.len());
        }

        let origin = match (live_results.is_empty(), dataset_results.is_empty()) {
            (false, false) => SearchOrigin::LiveAndDataset,
            (false, true) => SearchOrigin::Live,
            (true, false) => SearchOrigin::Dataset,
            (true, true) => SearchOrigin::Nothing,
        };

        let mut listings = live_results;
        listings.extend(dataset_results);

        SearchOutcome {
            listings: dedupe_by_platform(listings),
            origin,
        }
    }

    /// Searches each keyword in turn and merges the results without platform repeats.
    pub async fn search_keywords(&self, keywords: &[String]) -> Vec<Listing> {
        let mut all = Vec::new();
        for keyword in keywords {
            all.extend(self.search(keyword).await);
        }
        dedupe_by_platform(all)
    }

    pub async fn search_expanded(&self, query: &str) -> Vec<Listing> {
        let mut keywords = self.expander.expand(query);
        keywords.truncate(self.max_expanded_keywords);
        debug!("Expanded '{}' into {:?}", query, keywords);
        self.search_keywords(&keywords).await
    }

    pub async fn search_image(&self, image: &Path) -> Vec<Listing> {
        let keywords = self.classifier.classify(image);
        info!("Image {} classified as {:?}", image.display(), keywords);
        let mut listings = self.search_keywords(&keywords).await;
        listings.truncate(self.max_visual_results);
        listings
    }

    /// Category datasets, or a keyword search when none of them has listings.
    pub async fn browse_category(&self, category: &str) -> Vec<Listing> {
        let mut all = Vec::new();
        for dataset in category_datasets(category) {
            for mut listing in self.dataset.load(dataset) {
                listing.platform = dataset.to_string();
                all.push(listing);
            }
        }

        if all.is_empty() {
            let keywords: Vec<String> = category_keywords(category)
                .iter()
                .map(|k| k.to_string())
                .collect();
            debug!("No datasets for category '{}', searching {:?}", category, keywords);
            for keyword in &keywords {
                all.extend(self.search(keyword).await);
            }
        }

        dedupe_by_platform(all)
    }

    /// Search followed by price comparison, ready for presentation.
    pub async fn compare_query(&self, query: &str, smart: bool) -> ComparisonReport {
        if !smart {
            return build_report(query, &self.search(query).await);
        }

        let listings = self.search_expanded(query).await;
        let mut report = build_report(query, &listings);
        report.corrected_query = self.expander.corrected(query);
        report.entities = self.expander.entities(query);
        report
    }
}

pub fn build_report(query: &str, listings: &[Listing]) -> ComparisonReport {
    let comparer = PriceComparer::new();
    ComparisonReport {
        query: query.to_string(),
        corrected_query: None,
        entities: None,
        results: comparer.compare(listings),
        summary: comparer.summary(listings),
    }
}
