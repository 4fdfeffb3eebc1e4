// Source module: catalog-backed product sources and the aggregator over them.

pub mod aggregator;
pub mod dataset;
pub mod registry;

use crate::model::Listing;

pub use aggregator::{ApiSource, SourceAggregator, dedupe_by_platform};
pub use dataset::DatasetSource;

/// A source of listings that can be searched or loaded per platform.
///
/// Implementations swallow per-platform failures: a platform that cannot be
/// served contributes no listings instead of failing the call.
pub trait ProductSource: Send + Sync {
    /// Platforms this source knows about.
    fn platforms(&self) -> Vec<String>;

    /// Whole catalog for one platform; empty when the platform has none.
    fn load(&self, platform: &str) -> Vec<Listing>;

    /// Listings matching `query`, across every platform or only `platform`.
    fn search(&self, query: &str, platform: Option<&str>) -> Vec<Listing>;
}
