use crate::config::{AppConfig, DataSourceKind};
use crate::model::Listing;
use crate::source::registry::storefront_platforms;
use crate::source::{DatasetSource, ProductSource};
use std::collections::HashSet;
use tracing::{debug, info};

/// Marketplace API placeholder; serves no listings until API credentials exist.
pub struct ApiSource {
    api_key: Option<String>,
}

impl ApiSource {
    pub fn new(api_key: Option<String>) -> Self {
        Self { api_key }
    }
}

impl ProductSource for ApiSource {
    fn platforms(&self) -> Vec<String> {
        storefront_platforms().iter().map(|p| p.to_string()).collect()
    }

    fn load(&self, platform: &str) -> Vec<Listing> {
        debug!(
            "API source has no catalog for {} (key configured: {})",
            platform,
            self.api_key.is_some()
        );
        Vec::new()
    }

    fn search(&self, _query: &str, _platform: Option<&str>) -> Vec<Listing> {
        Vec::new()
    }
}

/// Uniform view over the configured product source.
pub struct SourceAggregator {
    source: Box<dyn ProductSource>,
}

impl SourceAggregator {
    pub fn new(source: Box<dyn ProductSource>) -> Self {
        Self { source }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let source: Box<dyn ProductSource> = match config.data_source {
            DataSourceKind::Dataset => Box::new(DatasetSource::new(config.datasets_dir.clone())),
            DataSourceKind::Api => Box::new(ApiSource::new(None)),
        };
        info!("Product source: {:?}", config.data_source);
        Self::new(source)
    }

    /// Every listing across the storefront platforms, each stamped with its platform.
    pub fn all_products(&self) -> Vec<Listing> {
        let mut all = Vec::new();
        for platform in storefront_platforms() {
            for mut listing in self.source.load(platform) {
                if listing.platform.is_empty() {
                    listing.platform = platform.to_string();
                }
                all.push(listing);
            }
        }
        all
    }
}

impl ProductSource for SourceAggregator {
    fn platforms(&self) -> Vec<String> {
        self.source.platforms()
    }

    fn load(&self, platform: &str) -> Vec<Listing> {
        self.source.load(platform)
    }

    fn search(&self, query: &str, platform: Option<&str>) -> Vec<Listing> {
        self.source.search(query, platform)
    }
}

/// Drops exact `(product_name, platform)` repeats, keeping the first occurrence.
pub fn dedupe_by_platform(listings: Vec<Listing>) -> Vec<Listing> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut unique = Vec::with_capacity(listings.len());

    for listing in listings {
        let key = (listing.product_name.clone(), listing.platform.clone());
        if seen.insert(key) {
            unique.push(listing);
        }
    }
    unique
}
