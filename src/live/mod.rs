// Live marketplace search: page fetching, per-site scraping and result caching.

pub mod cache;
pub mod fetcher;
pub mod marketplace;
pub mod traits;

pub use cache::CachedLiveSource;
pub use fetcher::PageFetcher;
pub use marketplace::{LiveScraper, Marketplace};
pub use traits::LiveSource;
