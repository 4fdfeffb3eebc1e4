use crate::model::{Listing, SourceError};
use crate::source::ProductSource;
use crate::source::registry::{catalog_path, dataset_platforms};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// One catalog entry as stored on disk. Unknown fields are ignored.
#[derive(Debug, Deserialize)]
struct CatalogRecord {
    product_name: String,
    price: f64,
    #[serde(default)]
    brand: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    platform: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    rating: Option<serde_json::Value>,
}

impl CatalogRecord {
    fn into_listing(self) -> Option<Listing> {
        if !self.price.is_finite() || self.price < 0.0 {
            return None;
        }
        let rating = self.rating.and_then(|value| match value {
            serde_json::Value::String(s) => Some(s),
            serde_json::Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

        Some(Listing {
            product_name: self.product_name,
            brand: self.brand,
            category: self.category,
            price: self.price,
            platform: self.platform.unwrap_or_default(),
            image_url: self.image_url,
            rating,
        })
    }
}

/// Static per-platform JSON catalogs in one directory.
pub struct DatasetSource {
    datasets_dir: PathBuf,
    platforms: Vec<String>,
}

impl DatasetSource {
    pub fn new(datasets_dir: impl Into<PathBuf>) -> Self {
        Self {
            datasets_dir: datasets_dir.into(),
            platforms: dataset_platforms().iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Replaces the platform registry searched when no platform is given.
    pub fn with_platforms(mut self, platforms: Vec<String>) -> Self {
        self.platforms = platforms;
        self
    }

    pub fn datasets_dir(&self) -> &Path {
        &self.datasets_dir
    }

    /// Reads one catalog. Records without a usable name or price are dropped.
    pub fn read_catalog(&self, platform: &str) -> Result<Vec<Listing>, SourceError> {
        let path = catalog_path(&self.datasets_dir, platform);
        if !path.exists() {
            return Err(SourceError::CatalogMissing(platform.to_string()));
        }

        let content = fs::read_to_string(&path).map_err(|source| SourceError::Io {
            path: path.clone(),
            source,
        })?;
        let records: Vec<serde_json::Value> =
            serde_json::from_str(&content).map_err(|source| SourceError::Malformed {
                path: path.clone(),
                source,
            })?;

        let total = records.len();
        let listings: Vec<Listing> = records
            .into_iter()
            .filter_map(|value| serde_json::from_value::<CatalogRecord>(value).ok())
            .filter_map(CatalogRecord::into_listing)
            .collect();

        if listings.len() < total {
            debug!(
                "Skipped {} invalid records in {}",
                total - listings.len(),
                path.display()
            );
        }
        Ok(listings)
    }
}

/// Substring match over name, brand and category, or any query token over name and brand.
pub fn matches_query(listing: &Listing, query_lower: &str) -> bool {
    let name = listing.product_name.to_lowercase();
    let brand = listing.brand.as_deref().unwrap_or_default().to_lowercase();
    let category = listing.category.as_deref().unwrap_or_default().to_lowercase();

    name.contains(query_lower)
        || brand.contains(query_lower)
        || category.contains(query_lower)
        || query_lower
            .split_whitespace()
            .any(|word| name.contains(word) || brand.contains(word))
}

impl ProductSource for DatasetSource {
    fn platforms(&self) -> Vec<String> {
        self.platforms.clone()
    }

    fn load(&self, platform: &str) -> Vec<Listing> {
        match self.read_catalog(platform) {
            Ok(listings) => listings,
            Err(SourceError::CatalogMissing(_)) => Vec::new(),
            Err(e) => {
                warn!("Dataset load failed for {}: {}", platform, e);
                Vec::new()
            }
        }
    }

    fn search(&self, query: &str, platform: Option<&str>) -> Vec<Listing> {
        let query_lower = query.trim().to_lowercase();
        let platforms: Vec<&str> = match platform {
            Some(p) => vec![p],
            None => self.platforms.iter().map(String::as_str).collect(),
        };

        let mut results = Vec::new();
        for plat in platforms {
            let catalog = match self.read_catalog(plat) {
                Ok(listings) => listings,
                Err(SourceError::CatalogMissing(_)) => continue,
                Err(e) => {
                    warn!("Skipping platform {}: {}", plat, e);
                    continue;
                }
            };

            for mut listing in catalog {
                if matches_query(&listing, &query_lower) {
                    listing.platform = plat.to_string();
                    results.push(listing);
                }
            }
        }

        debug!("Dataset search '{}' matched {} listings", query, results.len());
        results
    }
}
