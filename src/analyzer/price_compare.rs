use crate::model::{ComparedListing, Listing, PriceSummary};
use std::collections::HashMap;

/// Trait defining the interface for a price comparer.
pub trait Comparer {
    /// Flags the cheapest listing(s) of each identity group and sorts everything by price.
    fn compare(&self, listings: &[Listing]) -> Vec<ComparedListing>;
    /// Basic statistics over the batch; `None` for an empty batch.
    fn summary(&self, listings: &[Listing]) -> Option<PriceSummary>;
}

/// Implementation of the price comparer.
///
/// Listings are grouped by case-insensitive product name. Prices are compared
/// exactly: two prices that differ only by float rounding are not a tie.
/// Callers must pass listings with finite, validated prices.
pub struct PriceComparer;

impl PriceComparer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PriceComparer {
    fn default() -> Self {
        Self::new()
    }
}

impl Comparer for PriceComparer {
    fn compare(&self, listings: &[Listing]) -> Vec<ComparedListing> {
        // Groups in order of first appearance, so equal prices keep a stable order.
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut groups: Vec<Vec<&Listing>> = Vec::new();
        for listing in listings {
            let slot = *index.entry(listing.identity()).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(listing);
        }

        let mut compared = Vec::with_capacity(listings.len());
        for group in groups {
            let min_price = group
                .iter()
                .map(|l| l.price)
                .fold(f64::INFINITY, f64::min);

            for listing in group {
                compared.push(ComparedListing {
                    listing: listing.clone(),
                    is_best_price: listing.price == min_price,
                });
            }
        }

        compared.sort_by(|a, b| a.listing.price.total_cmp(&b.listing.price));
        compared
    }

    fn summary(&self, listings: &[Listing]) -> Option<PriceSummary> {
        if listings.is_empty() {
            return None;
        }

        let prices = listings.iter().map(|l| l.price);
        let min_price = prices.clone().fold(f64::INFINITY, f64::min);
        let max_price = prices.clone().fold(f64::NEG_INFINITY, f64::max);
        let avg_price = prices.sum::<f64>() / listings.len() as f64;

        Some(PriceSummary {
            min_price,
            max_price,
            avg_price,
            total_products: listings.len(),
        })
    }
}
