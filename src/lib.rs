//! Price comparison across marketplaces: live scraping with dataset fallback,
//! per-product best-price flagging and price summaries.

pub mod analyzer;
pub mod config;
pub mod live;
pub mod model;
pub mod normalizer;
pub mod parser;
pub mod search;
pub mod source;
pub mod utils;
