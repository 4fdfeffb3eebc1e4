// Core structs: Listing, ComparedListing, PriceSummary, and the error types
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// One product observed at one platform at one price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    pub product_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub platform: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
}

impl Listing {
    pub fn new(product_name: impl Into<String>, price: f64, platform: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            brand: None,
            category: None,
            price,
            platform: platform.into(),
            image_url: None,
            rating: None,
        }
    }

    /// Grouping key used by the comparison engine.
    pub fn identity(&self) -> String {
        self.product_name.to_lowercase()
    }
}

/// A listing decorated by the comparison engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparedListing {
    #[serde(flatten)]
    pub listing: Listing,
    pub is_best_price: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSummary {
    pub min_price: f64,
    pub max_price: f64,
    pub avg_price: f64,
    pub total_products: usize,
}

/// What a free-text query says beyond its keywords.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryEntities {
    pub brands: Vec<String>,
    pub categories: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<f64>,
}

/// Search results plus comparison, as handed to the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub query: String,
    /// Spell-corrected query, present only when smart search changed it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corrected_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entities: Option<QueryEntities>,
    pub results: Vec<ComparedListing>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<PriceSummary>,
}

/// A catalog listing ranked against some reference listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredListing {
    #[serde(flatten)]
    pub listing: Listing,
    pub similarity_score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SimilarReport {
    pub product: Listing,
    pub similar_products: Vec<ScoredListing>,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("no catalog for platform '{0}'")]
    CatalogMissing(String),
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed catalog {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("unexpected status {0}")]
    InvalidResponse(u16),
    #[error("live search unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("invalid selector: {0}")]
    HtmlParseError(String),
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("unparsable price: {0:?}")]
    InvalidPrice(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
}
