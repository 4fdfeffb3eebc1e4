// Parser module: marketplace search-page markup to listings.

pub mod marketplace;

use crate::model::{Listing, ParserError};
use scraper::{ElementRef, Selector};

pub use marketplace::MarketplaceParser;

pub trait ListingParser: Send + Sync {
    /// Display name stamped on every listing this parser produces.
    fn platform(&self) -> &'static str;

    /// Parses at most `max_results` items. Items that fail to parse are skipped;
    /// only an unusable selector table fails the whole page.
    fn parse(&self, html: &str, max_results: usize) -> Result<Vec<Listing>, ParserError>;
}

pub(crate) fn compile(css: &str) -> Result<Selector, ParserError> {
    Selector::parse(css).map_err(|e| ParserError::HtmlParseError(format!("{css}: {e}")))
}

pub(crate) fn compile_all(css: &[&str]) -> Result<Vec<Selector>, ParserError> {
    css.iter().map(|s| compile(s)).collect()
}

/// First element matching any of the selectors, tried in order.
pub(crate) fn first_match<'a>(item: &ElementRef<'a>, selectors: &[Selector]) -> Option<ElementRef<'a>> {
    selectors
        .iter()
        .find_map(|selector| item.select(selector).next())
}

pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    crate::utils::clean_text(&element.text().collect::<String>())
}
