use crate::model::{Listing, ScraperError};

/// Searches external marketplaces for a query.
///
/// A per-platform failure contributes no listings; an `Err` means the live
/// path as a whole is unusable and the caller should fall back.
#[async_trait::async_trait]
pub trait LiveSource: Send + Sync {
    async fn search_all(&self, query: &str, max_per_platform: usize) -> Result<Vec<Listing>, ScraperError>;
}
