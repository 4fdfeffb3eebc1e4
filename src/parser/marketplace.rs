//! Search-result parsers for the live marketplaces.
//!
//! The selectors track each site's current markup and will break when the
//! sites change; a broken item is skipped rather than failing the page.

use crate::model::{Listing, ParserError};
use crate::parser::{ListingParser, compile_all, element_text, first_match};
use crate::utils::parse_price_text;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

/// CSS selectors for one marketplace. Each field holds alternatives tried in order.
#[derive(Debug, Clone)]
pub struct SiteSelectors {
    pub item: &'static [&'static str],
    pub title: &'static [&'static str],
    pub price: &'static [&'static str],
    pub image: &'static [&'static str],
    pub rating: &'static [&'static str],
}

struct Compiled {
    item: Vec<Selector>,
    title: Vec<Selector>,
    price: Vec<Selector>,
    image: Vec<Selector>,
    rating: Vec<Selector>,
}

pub struct MarketplaceParser {
    platform: &'static str,
    selectors: SiteSelectors,
    fixed_category: Option<&'static str>,
}

impl MarketplaceParser {
    pub fn new(platform: &'static str, selectors: SiteSelectors) -> Self {
        Self {
            platform,
            selectors,
            fixed_category: None,
        }
    }

    pub fn amazon() -> Self {
        Self::new(
            "Amazon",
            SiteSelectors {
                item: &["div[data-component-type='s-search-result']"],
                title: &["h2.a-size-mini", "span.a-size-medium"],
                price: &["span.a-price-whole"],
                image: &["img.s-image"],
                rating: &["span.a-icon-alt"],
            },
        )
    }

    pub fn flipkart() -> Self {
        Self::new(
            "Flipkart",
            SiteSelectors {
                item: &["div._1AtVbE", "div._2kHMtA"],
                title: &["a.IRpwTa", "div._4rR01T"],
                price: &["div._30jeq3", "div._1_WHN1"],
                image: &["img._396cs4"],
                rating: &["div._3LWZlK"],
            },
        )
    }

    pub fn myntra() -> Self {
        let mut parser = Self::new(
            "Myntra",
            SiteSelectors {
                item: &["li.product-base"],
                title: &["h4.product-product"],
                price: &["span.product-discountedPrice"],
                image: &["img"],
                rating: &[],
            },
        );
        parser.fixed_category = Some("Fashion");
        parser
    }

    fn compile(&self) -> Result<Compiled, ParserError> {
        Ok(Compiled {
            item: compile_all(self.selectors.item)?,
            title: compile_all(self.selectors.title)?,
            price: compile_all(self.selectors.price)?,
            image: compile_all(self.selectors.image)?,
            rating: compile_all(self.selectors.rating)?,
        })
    }

    fn parse_item(&self, item: &ElementRef<'_>, sel: &Compiled) -> Result<Listing, ParserError> {
        let title = first_match(item, &sel.title)
            .map(|e| element_text(&e))
            .filter(|t| !t.is_empty())
            .ok_or(ParserError::MissingField("title"))?;

        let price_text = first_match(item, &sel.price)
            .map(|e| element_text(&e))
            .ok_or(ParserError::MissingField("price"))?;
        let price = parse_price_text(&price_text).ok_or(ParserError::InvalidPrice(price_text))?;

        let image_url = first_match(item, &sel.image)
            .and_then(|img| img.value().attr("src"))
            .map(str::to_string);
        let rating = first_match(item, &sel.rating)
            .map(|e| element_text(&e))
            .filter(|r| !r.is_empty());

        let mut listing = Listing::new(title, price, self.platform);
        listing.image_url = image_url;
        listing.rating = rating;
        listing.category = self.fixed_category.map(str::to_string);
        Ok(listing)
    }
}

impl ListingParser for MarketplaceParser {
    fn platform(&self) -> &'static str {
        self.platform
    }

    fn parse(&self, html: &str, max_results: usize) -> Result<Vec<Listing>, ParserError> {
        let sel = self.compile()?;
        let document = Html::parse_document(html);

        // Alternative item selectors are layouts, not unions: use the first that matches.
        let items: Vec<ElementRef<'_>> = sel
            .item
            .iter()
            .map(|selector| document.select(selector).collect::<Vec<_>>())
            .find(|found| !found.is_empty())
            .unwrap_or_default();

        let mut listings = Vec::new();
        for item in items.iter().take(max_results) {
            match self.parse_item(item, &sel) {
                Ok(listing) => listings.push(listing),
                Err(e) => debug!("Skipping {} item: {}", self.platform, e),
            }
        }

        Ok(listings)
    }
}
