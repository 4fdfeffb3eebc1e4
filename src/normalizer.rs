// Brand and category classification for scraped titles
use crate::model::Listing;

const KNOWN_BRANDS: &[&str] = &[
    "Apple", "Samsung", "Nike", "Adidas", "Puma", "Levi", "Sony", "LG", "Dell", "HP", "Lenovo",
    "Asus", "Amul", "Nestle", "Britannia", "Coca Cola", "Pepsi", "Lays", "Boat", "OnePlus",
    "Realme", "Xiaomi",
];

// Checked in order; the first category with a matching keyword wins.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Electronics",
        &["phone", "mobile", "laptop", "computer", "tablet", "headphone", "earphone", "camera", "tv", "watch"],
    ),
    ("Fashion", &["shoe", "shirt", "jeans", "dress", "t-shirt", "jacket", "sneaker", "sandal"]),
    ("Groceries", &["milk", "bread", "rice", "oil", "noodles", "chips", "snacks"]),
    ("Beauty", &["lipstick", "makeup", "cream", "shampoo", "perfume"]),
    ("Home", &["furniture", "chair", "table", "bed", "sofa"]),
    ("Sports", &["gym", "fitness", "yoga", "sports", "cricket", "football"]),
];

pub const DEFAULT_CATEGORY: &str = "General";

pub fn known_brands() -> impl Iterator<Item = &'static str> {
    KNOWN_BRANDS.iter().copied()
}

/// Known brand contained in the title, otherwise the title's first word.
pub fn extract_brand(title: &str) -> String {
    let title_upper = title.to_uppercase();
    for brand in KNOWN_BRANDS {
        if title_upper.contains(&brand.to_uppercase()) {
            return brand.to_string();
        }
    }

    title
        .split_whitespace()
        .next()
        .unwrap_or("Unknown")
        .to_string()
}

pub fn categorize(title: &str) -> &'static str {
    let title = title.to_lowercase();

    for (category, keywords) in CATEGORY_KEYWORDS {
        if keywords.iter().any(|keyword| title.contains(keyword)) {
            return category;
        }
    }

    DEFAULT_CATEGORY
}

/// Fills brand and category on scraped listings that lack them.
pub fn normalize_all(listings: &mut [Listing]) {
    for listing in listings.iter_mut() {
        normalize_listing(listing);
    }
}

fn normalize_listing(listing: &mut Listing) {
    if listing.brand.is_none() {
        listing.brand = Some(extract_brand(&listing.product_name));
    }
    if listing.category.is_none() {
        listing.category = Some(categorize(&listing.product_name).to_string());
    }
}
