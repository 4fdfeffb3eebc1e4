// Analyzer module: best-price grouping, summary statistics and catalog similarity.

pub mod price_compare;
pub mod similarity;

pub use price_compare::{Comparer, PriceComparer};
pub use similarity::SimilarityRanker;
