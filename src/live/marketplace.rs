use crate::config::LiveConfig;
use crate::live::fetcher::PageFetcher;
use crate::live::traits::LiveSource;
use crate::model::{Listing, ScraperError};
use crate::normalizer::normalize_all;
use crate::parser::{ListingParser, MarketplaceParser};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

const FASHION_KEYWORDS: &[&str] = &["shoe", "shirt", "jeans", "dress", "fashion", "clothes"];

/// A marketplace: how to build its search URL and how to read the result page.
pub struct Marketplace {
    search_url: Box<dyn Fn(&str) -> String + Send + Sync>,
    parser: Box<dyn ListingParser>,
    fashion_only: bool,
}

impl Marketplace {
    pub fn new(
        search_url: impl Fn(&str) -> String + Send + Sync + 'static,
        parser: Box<dyn ListingParser>,
    ) -> Self {
        Self {
            search_url: Box::new(search_url),
            parser,
            fashion_only: false,
        }
    }

    pub fn amazon() -> Self {
        Self::new(
            |q| format!("https://www.amazon.in/s?k={}", urlencoding::encode(q)),
            Box::new(MarketplaceParser::amazon()),
        )
    }

    pub fn flipkart() -> Self {
        Self::new(
            |q| format!("https://www.flipkart.com/search?q={}", urlencoding::encode(q)),
            Box::new(MarketplaceParser::flipkart()),
        )
    }

    pub fn myntra() -> Self {
        let mut marketplace = Self::new(
            |q| format!("https://www.myntra.com/{}", urlencoding::encode(q)),
            Box::new(MarketplaceParser::myntra()),
        );
        marketplace.fashion_only = true;
        marketplace
    }

    pub fn name(&self) -> &'static str {
        self.parser.platform()
    }

    pub fn search_url(&self, query: &str) -> String {
        (self.search_url)(query)
    }

    pub fn applies_to(&self, query: &str) -> bool {
        !self.fashion_only || is_fashion_query(query)
    }
}

pub fn is_fashion_query(query: &str) -> bool {
    let query = query.to_lowercase();
    FASHION_KEYWORDS.iter().any(|keyword| query.contains(keyword))
}

/// Scrapes every applicable marketplace and merges what each one yields.
pub struct LiveScraper {
    fetcher: PageFetcher,
    marketplaces: Vec<Arc<Marketplace>>,
    request_delay: Duration,
    parallel: bool,
}

impl LiveScraper {
    pub fn new(config: &LiveConfig) -> Result<Self, ScraperError> {
        Self::with_marketplaces(
            config,
            vec![Marketplace::amazon(), Marketplace::flipkart(), Marketplace::myntra()],
        )
    }

    pub fn with_marketplaces(config: &LiveConfig, marketplaces: Vec<Marketplace>) -> Result<Self, ScraperError> {
        Ok(Self {
            fetcher: PageFetcher::new(config)?,
            marketplaces: marketplaces.into_iter().map(Arc::new).collect(),
            request_delay: config.request_delay(),
            parallel: config.parallel,
        })
    }

    pub fn marketplaces_for(&self, query: &str) -> Vec<Arc<Marketplace>> {
        self.marketplaces
            .iter()
            .filter(|m| m.applies_to(query))
            .cloned()
            .collect()
    }

    /// One marketplace; every failure is logged and becomes an empty list.
    async fn scrape(&self, marketplace: &Marketplace, query: &str, max_results: usize) -> Vec<Listing> {
        let url = marketplace.search_url(query);
        info!("Scraping {}...", marketplace.name());

        let html = match self.fetcher.fetch(&url).await {
            Ok(html) => html,
            Err(e) => {
                warn!("{} scraping error: {}", marketplace.name(), e);
                return Vec::new();
            }
        };

        match marketplace.parser.parse(&html, max_results) {
            Ok(mut listings) => {
                normalize_all(&mut listings);
                info!("{}: {} listings", marketplace.name(), listings.len());
                listings
            }
            Err(e) => {
                warn!("{} parse error: {}", marketplace.name(), e);
                Vec::new()
            }
        }
    }
}

#[async_trait::async_trait]
impl LiveSource for LiveScraper {
    async fn search_all(&self, query: &str, max_per_platform: usize) -> Result<Vec<Listing>, ScraperError> {
        let marketplaces = self.marketplaces_for(query);
        info!("Searching for '{}' across {} marketplaces", query, marketplaces.len());

        let mut all = Vec::new();
        if self.parallel {
            let tasks = marketplaces
                .iter()
                .map(|m| self.scrape(m, query, max_per_platform));
            for listings in join_all(tasks).await {
                all.extend(listings);
            }
        } else {
            for marketplace in &marketplaces {
                all.extend(self.scrape(marketplace, query, max_per_platform).await);
                sleep(self.request_delay).await;
            }
        }

        info!("Found {} live listings for '{}'", all.len(), query);
        Ok(all)
    }
}
