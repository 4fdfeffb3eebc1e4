//! Content-based similar products and cheaper alternatives over a catalog.

use crate::model::{Listing, ScoredListing};
use crate::utils::tokenize;
use std::collections::HashSet;

const CATEGORY_WEIGHT: f64 = 0.5;
const PRICE_WEIGHT: f64 = 0.3;
const BRAND_WEIGHT: f64 = 0.2;
const NAME_WEIGHT: f64 = 0.5;

// Relative price difference under which two listings count as comparably priced.
const PRICE_BAND: f64 = 0.2;

/// Ranks catalog listings by how closely they resemble a reference listing.
///
/// A candidate must share the category, the brand or a name word with the
/// reference; a comparable price only raises the score of related candidates.
pub struct SimilarityRanker<'a> {
    catalog: &'a [Listing],
}

impl<'a> SimilarityRanker<'a> {
    pub fn new(catalog: &'a [Listing]) -> Self {
        Self { catalog }
    }

    /// Catalog listing with this name (case-insensitive), optionally on one platform.
    pub fn find(&self, product_name: &str, platform: Option<&str>) -> Option<&'a Listing> {
        let catalog: &'a [Listing] = self.catalog;
        catalog.iter().find(|listing| {
            listing.product_name.eq_ignore_ascii_case(product_name.trim())
                && platform.is_none_or(|p| listing.platform.eq_ignore_ascii_case(p))
        })
    }

    pub fn score(product: &Listing, candidate: &Listing) -> f64 {
        let mut score = 0.0;
        if same_label(&product.category, &candidate.category) {
            score += CATEGORY_WEIGHT;
        }
        if product.price > 0.0 && (candidate.price - product.price).abs() / product.price < PRICE_BAND {
            score += PRICE_WEIGHT;
        }
        if same_label(&product.brand, &candidate.brand) {
            score += BRAND_WEIGHT;
        }
        score + NAME_WEIGHT * name_overlap(&product.product_name, &candidate.product_name)
    }

    /// Up to `top_k` related listings, best match first. The reference itself is excluded.
    pub fn similar(&self, product: &Listing, top_k: usize) -> Vec<ScoredListing> {
        let mut scored: Vec<ScoredListing> = self
            .catalog
            .iter()
            .filter(|c| !(c.product_name == product.product_name && c.platform == product.platform))
            .filter(|c| is_related(product, c))
            .map(|c| ScoredListing {
                listing: c.clone(),
                similarity_score: Self::score(product, c),
            })
            .collect();

        scored.sort_by(|a, b| b.similarity_score.total_cmp(&a.similarity_score));
        scored.truncate(top_k);
        scored
    }

    /// Related listings priced below the reference, cheapest first.
    pub fn cheaper_alternatives(&self, product: &Listing, top_k: usize) -> Vec<ScoredListing> {
        let mut cheaper: Vec<ScoredListing> = self
            .similar(product, top_k.saturating_mul(3))
            .into_iter()
            .filter(|s| s.listing.price < product.price)
            .collect();

        cheaper.sort_by(|a, b| a.listing.price.total_cmp(&b.listing.price));
        cheaper.truncate(top_k);
        cheaper
    }
}

fn same_label(a: &Option<String>, b: &Option<String>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
        _ => false,
    }
}

/// Jaccard overlap of the two names' words.
fn name_overlap(a: &str, b: &str) -> f64 {
    let a: HashSet<String> = tokenize(a).into_iter().collect();
    let b: HashSet<String> = tokenize(b).into_iter().collect();
    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / union as f64
}

fn is_related(product: &Listing, candidate: &Listing) -> bool {
    same_label(&product.category, &candidate.category)
        || same_label(&product.brand, &candidate.brand)
        || name_overlap(&product.product_name, &candidate.product_name) > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(name: &str, price: f64, platform: &str, brand: &str, category: &str) -> Listing {
        let mut listing = Listing::new(name, price, platform);
        listing.brand = Some(brand.into());
        listing.category = Some(category.into());
        listing
    }

    fn catalog() -> Vec<Listing> {
        vec![
            listing("Amul Taaza Milk 1L", 54.0, "bigbasket", "Amul", "Dairy"),
            listing("Amul Taaza Milk 1L", 58.0, "blinkit", "Amul", "Dairy"),
            listing("Mother Dairy Milk 1L", 56.0, "zepto", "Mother Dairy", "Dairy"),
            listing("Amul Butter 100g", 56.0, "bigbasket", "Amul", "Dairy"),
            listing("Nestle Milkmaid", 140.0, "blinkit", "Nestle", "Sweets"),
            listing("Samsung Galaxy M34", 16999.0, "amazon", "Samsung", "Electronics"),
        ]
    }

    #[test]
    fn same_product_elsewhere_ranks_first_and_unrelated_is_excluded() {
        let catalog = catalog();
        let ranker = SimilarityRanker::new(&catalog);
        let milk = ranker.find("amul taaza milk 1l", Some("BLINKIT")).unwrap();

        let similar = ranker.similar(milk, 10);
        let names: Vec<_> = similar
            .iter()
            .map(|s| (s.listing.product_name.as_str(), s.listing.platform.as_str()))
            .collect();

        assert_eq!(names[0], ("Amul Taaza Milk 1L", "bigbasket"));
        assert!(!names.contains(&("Amul Taaza Milk 1L", "blinkit")));
        assert!(!names.iter().any(|(name, _)| name.starts_with("Samsung")));
        assert!(!names.iter().any(|(name, _)| name.starts_with("Nestle")));
        assert!(similar.windows(2).all(|w| w[0].similarity_score >= w[1].similarity_score));
    }

    #[test]
    fn cheaper_alternatives_are_related_and_sorted_by_price() {
        let catalog = catalog();
        let ranker = SimilarityRanker::new(&catalog);
        let milk = ranker.find("Amul Taaza Milk 1L", Some("blinkit")).unwrap();

        let cheaper = ranker.cheaper_alternatives(milk, 10);
        let prices: Vec<f64> = cheaper.iter().map(|s| s.listing.price).collect();
        assert_eq!(prices, vec![54.0, 56.0, 56.0]);

        assert_eq!(ranker.cheaper_alternatives(milk, 1).len(), 1);
        let cheapest = ranker.find("Amul Taaza Milk 1L", Some("bigbasket")).unwrap();
        assert!(ranker.cheaper_alternatives(cheapest, 10).is_empty());
    }

    #[test]
    fn score_weights() {
        let a = listing("Amul Milk", 100.0, "x", "Amul", "Dairy");
        let b = listing("Amul Milk", 110.0, "y", "Amul", "Dairy");
        assert!((SimilarityRanker::score(&a, &b) - 1.5).abs() < 1e-9);

        let mut bare = Listing::new("Something Else", 500.0, "z");
        bare.brand = None;
        assert_eq!(SimilarityRanker::score(&a, &bare), 0.0);
        assert!(SimilarityRanker::new(&[]).find("Amul Milk", None).is_none());
    }
}
