//! Query expansion and image classification contracts, plus a catalog-backed expander.

use crate::model::Listing;
use crate::model::QueryEntities;
use crate::normalizer::known_brands;
use crate::utils::tokenize;
use std::collections::HashSet;
use std::path::Path;

/// Turns a raw query into ordered search keywords.
pub trait QueryExpander: Send + Sync {
    fn expand(&self, query: &str) -> Vec<String>;

    /// The query as the expander rewrote it, when it differs from what was typed.
    fn corrected(&self, _query: &str) -> Option<String> {
        None
    }

    fn entities(&self, _query: &str) -> Option<QueryEntities> {
        None
    }
}

/// Turns a product image into ordered search keywords.
pub trait ImageClassifier: Send + Sync {
    fn classify(&self, image: &Path) -> Vec<String>;
}

/// Passes the query through untouched.
pub struct NoExpansion;

impl QueryExpander for NoExpansion {
    fn expand(&self, query: &str) -> Vec<String> {
        let query = query.trim();
        if query.is_empty() {
            Vec::new()
        } else {
            vec![query.to_string()]
        }
    }
}

/// Classifier for deployments without an image model.
pub struct NoClassifier;

impl ImageClassifier for NoClassifier {
    fn classify(&self, _image: &Path) -> Vec<String> {
        Vec::new()
    }
}

const STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "or", "for", "with", "of", "in", "on", "to", "by", "at", "from", "is", "are",
    "best", "buy", "cheap", "under", "below",
];

const SYNONYMS: &[(&str, &[&str])] = &[
    ("phone", &["mobile", "smartphone", "cellphone", "handset"]),
    ("laptop", &["notebook", "computer", "pc"]),
    ("shoes", &["footwear", "sneakers", "boots", "sandals"]),
    ("shirt", &["tshirt", "t-shirt", "top", "tee"]),
    ("milk", &["dairy", "beverage"]),
    ("headphones", &["earphones", "headset", "earbuds"]),
];

// Store brands that never appear in scraped titles but must not be spell-corrected.
const STORE_BRANDS: &[&str] = &["nykaa"];

const MAX_EDIT_DISTANCE: usize = 2;

fn guarded_brands() -> HashSet<String> {
    known_brands()
        .chain(STORE_BRANDS.iter().copied())
        .map(str::to_lowercase)
        .collect()
}

/// `under N`, `below N` or `less than N`.
fn price_ceiling(tokens: &[String]) -> Option<f64> {
    let number = |at: usize| tokens.get(at)?.parse::<u64>().ok().map(|n| n as f64);
    tokens.iter().enumerate().find_map(|(i, token)| match token.as_str() {
        "under" | "below" => number(i + 1),
        "less" if tokens.get(i + 1).is_some_and(|t| t == "than") => number(i + 2),
        _ => None,
    })
}

/// Levenshtein distance over chars.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    for (i, ca) in a.iter().enumerate() {
        let mut current = vec![i + 1];
        for (j, cb) in b.iter().enumerate() {
            let substitution = previous[j] + usize::from(ca != cb);
            let insertion = previous[j + 1] + 1;
            let deletion = current[j] + 1;
            current.push(substitution.min(insertion).min(deletion));
        }
        previous = current;
    }
    previous[b.len()]
}

/// Typo-tolerant expander and autocompleter built from the catalog's own vocabulary.
#[derive(Debug)]
pub struct CatalogExpander {
    vocabulary: Vec<String>,
    product_names: Vec<String>,
    brands: HashSet<String>,
}

impl Default for CatalogExpander {
    fn default() -> Self {
        Self {
            vocabulary: Vec::new(),
            product_names: Vec::new(),
            brands: guarded_brands(),
        }
    }
}

impl CatalogExpander {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_catalog(listings: &[Listing]) -> Self {
        let mut expander = Self::new();
        expander.build_vocabulary(listings);
        expander
    }

    pub fn build_vocabulary(&mut self, listings: &[Listing]) {
        let mut seen = HashSet::new();
        self.vocabulary.clear();
        self.product_names.clear();

        for listing in listings {
            self.product_names.push(listing.product_name.clone());
            let brand = listing.brand.as_deref().unwrap_or_default();
            for token in tokenize(&listing.product_name).into_iter().chain(tokenize(brand)) {
                if seen.insert(token.clone()) {
                    self.vocabulary.push(token);
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }

    /// Nearest vocabulary word within the edit-distance limit, or the word itself.
    pub fn correct_word(&self, word: &str) -> String {
        if self.vocabulary.iter().any(|v| v == word) {
            return word.to_string();
        }

        let mut best: Option<(&str, usize)> = None;
        for candidate in &self.vocabulary {
            let distance = edit_distance(word, candidate);
            if best.is_none_or(|(_, d)| distance < d) {
                best = Some((candidate.as_str(), distance));
            }
        }

        match best {
            Some((candidate, distance)) if distance <= MAX_EDIT_DISTANCE => candidate.to_string(),
            _ => word.to_string(),
        }
    }

    /// Spell-corrects every token except known brands, numbers and very short words.
    pub fn correct_query(&self, query: &str) -> String {
        tokenize(query)
            .into_iter()
            .map(|token| {
                let numeric = token.chars().all(|c| c.is_ascii_digit());
                if numeric || token.chars().count() <= 2 || self.brands.contains(&token) {
                    token
                } else {
                    self.correct_word(&token)
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Brands, categories and a price ceiling mentioned in the query.
    pub fn extract_entities(&self, query: &str) -> QueryEntities {
        let tokens = tokenize(query);
        let mut entities = QueryEntities::default();

        for token in &tokens {
            if self.brands.contains(token) && !entities.brands.contains(token) {
                entities.brands.push(token.clone());
            }
        }
        for (category, synonyms) in SYNONYMS {
            let mentioned = tokens
                .iter()
                .any(|t| t == *category || synonyms.contains(&t.as_str()));
            if mentioned {
                entities.categories.push(category.to_string());
            }
        }
        entities.max_price = price_ceiling(&tokens);
        entities
    }

    /// Product names starting with `partial`, then names containing it.
    pub fn suggest(&self, partial: &str, max: usize) -> Vec<String> {
        let partial = partial.trim().to_lowercase();
        if partial.chars().count() < 2 {
            return Vec::new();
        }

        let mut suggestions: Vec<String> = Vec::new();
        let prefixed = self
            .product_names
            .iter()
            .filter(|name| name.to_lowercase().starts_with(&partial));
        let containing = self
            .product_names
            .iter()
            .filter(|name| name.to_lowercase().contains(&partial));

        for name in prefixed.chain(containing) {
            if suggestions.len() >= max {
                break;
            }
            if !suggestions.contains(name) {
                suggestions.push(name.clone());
            }
        }
        suggestions
    }
}

impl QueryExpander for CatalogExpander {
    fn expand(&self, query: &str) -> Vec<String> {
        let corrected = self.correct_query(query);
        if corrected.is_empty() {
            return Vec::new();
        }

        let mut keywords = vec![corrected.clone()];
        let mut push = |keyword: &str| {
            if !keywords.iter().any(|k| k == keyword) {
                keywords.push(keyword.to_string());
            }
        };

        for token in tokenize(&corrected) {
            if STOPWORDS.contains(&token.as_str()) {
                continue;
            }
            push(&token);
            if let Some((_, synonyms)) = SYNONYMS.iter().find(|(word, _)| *word == token) {
                for synonym in synonyms.iter() {
                    push(synonym);
                }
            }
        }
        keywords
    }

    fn corrected(&self, query: &str) -> Option<String> {
        let corrected = self.correct_query(query);
        (corrected != tokenize(query).join(" ")).then_some(corrected)
    }

    fn entities(&self, query: &str) -> Option<QueryEntities> {
        Some(self.extract_entities(&self.correct_query(query)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Listing> {
        let mut milk = Listing::new("Amul Taaza Milk 1L", 54.0, "bigbasket");
        milk.brand = Some("Amul".into());
        vec![
            milk,
            Listing::new("Samsung Galaxy Phone", 15999.0, "amazon"),
            Listing::new("Sony Headphones", 2999.0, "flipkart"),
            Listing::new("Adidas Running Shoes", 3999.0, "myntra"),
        ]
    }

    #[test]
    fn edit_distance_basics() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("milk", "milk"), 0);
    }

    #[test]
    fn corrects_typos_but_not_brands_or_short_words() {
        let expander = CatalogExpander::from_catalog(&catalog());

        assert_eq!(expander.correct_query("headphnes"), "headphones");
        assert_eq!(expander.correct_query("samsung fone"), "samsung phone");
        assert_eq!(expander.correct_query("tv"), "tv");
        assert_eq!(expander.correct_query("xylophone"), "xylophone");
    }

    #[test]
    fn expansion_keeps_corrected_query_first_and_adds_synonyms() {
        let expander = CatalogExpander::from_catalog(&catalog());
        let keywords = expander.expand("the milkk");

        assert_eq!(keywords[0], "the milk");
        assert_eq!(&keywords[1..], &["milk", "dairy", "beverage"]);
    }

    #[test]
    fn no_expansion_passthrough() {
        assert_eq!(NoExpansion.expand("  bread "), vec!["bread"]);
        assert!(NoExpansion.expand("   ").is_empty());
        assert!(NoClassifier.classify(Path::new("photo.jpg")).is_empty());
    }

    #[test]
    fn store_brands_are_never_corrected() {
        let mut listings = catalog();
        listings.push(Listing::new("Nyla Hair Oil", 199.0, "nykaa"));
        let expander = CatalogExpander::from_catalog(&listings);

        assert_eq!(expander.correct_query("nykaa lipstik"), "nykaa lipstik");
        assert_eq!(expander.correct_query("nyla"), "nyla");
    }

    #[test]
    fn entities_cover_brands_categories_and_price_ceiling() {
        let expander = CatalogExpander::from_catalog(&catalog());

        let entities = expander.extract_entities("Samsung mobile under 20000");
        assert_eq!(entities.brands, vec!["samsung"]);
        assert_eq!(entities.categories, vec!["phone"]);
        assert_eq!(entities.max_price, Some(20000.0));

        let entities = expander.extract_entities("nykaa lipstick less than 500");
        assert_eq!(entities.brands, vec!["nykaa"]);
        assert!(entities.categories.is_empty());
        assert_eq!(entities.max_price, Some(500.0));

        assert_eq!(expander.extract_entities("milk below cost").max_price, None);
    }

    #[test]
    fn corrected_only_reported_when_changed() {
        let expander = CatalogExpander::from_catalog(&catalog());

        assert_eq!(expander.corrected("Mlik").as_deref(), Some("milk"));
        assert_eq!(expander.corrected("Amul Milk"), None);
        assert_eq!(NoExpansion.corrected("mlik"), None);
        assert_eq!(
            expander.entities("sony headphnes").unwrap().categories,
            vec!["headphones"]
        );
    }

    #[test]
    fn suggestions_prefer_prefix_matches() {
        let mut listings = catalog();
        listings.push(Listing::new("Generic Samsung Charger", 499.0, "amazon"));
        let expander = CatalogExpander::from_catalog(&listings);

        assert_eq!(
            expander.suggest("sam", 10),
            vec!["Samsung Galaxy Phone", "Generic Samsung Charger"]
        );
        assert_eq!(expander.suggest("sam", 1), vec!["Samsung Galaxy Phone"]);
        assert!(expander.suggest("s", 10).is_empty());
    }
}
