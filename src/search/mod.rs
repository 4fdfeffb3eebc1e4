// Search module: query orchestration with live/dataset fallback and query expansion.

pub mod expansion;
pub mod orchestrator;

pub use expansion::{CatalogExpander, ImageClassifier, NoClassifier, NoExpansion, QueryExpander};
pub use orchestrator::{SearchOrchestrator, SearchOrigin, SearchOutcome, build_report};
