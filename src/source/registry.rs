//! Static platform tables: dataset catalogs, storefront redirects and browse categories.

use std::path::{Path, PathBuf};

const DATASET_PLATFORMS: &[&str] = &[
    "amazon",
    "flipkart",
    "myntra",
    "ajio",
    "blinkit",
    "zepto",
    "instamart",
    "bigbasket",
    "meesho",
    "shopsy",
    "nykaa",
    "electronics_amazon",
    "fashion_myntra",
    "home_kitchen",
    "beauty_nykaa",
    "sports_fitness",
];

const STOREFRONT_PLATFORMS: &[&str] = &[
    "blinkit", "zepto", "instamart", "bigbasket", "flipkart", "amazon", "ajio", "myntra", "meesho",
    "shopsy", "nykaa",
];

const REDIRECT_TEMPLATES: &[(&str, &str)] = &[
    ("amazon", "https://www.amazon.in/s?k={}"),
    ("flipkart", "https://www.flipkart.com/search?q={}"),
    ("myntra", "https://www.myntra.com/{}"),
    ("blinkit", "https://blinkit.com/s/?q={}"),
    ("zepto", "https://www.zepto.com/search?query={}"),
    ("bigbasket", "https://www.bigbasket.com/ps/?q={}"),
    ("ajio", "https://www.ajio.com/search/?text={}"),
    ("meesho", "https://www.meesho.com/s/p/{}"),
    ("shopsy", "https://www.shopsy.in/search?q={}"),
    ("nykaa", "https://www.nykaa.com/search/result/?q={}"),
    ("instamart", "https://www.swiggy.com/instamart/search?custom_back=true&query={}"),
    ("electronics_amazon", "https://www.amazon.in/s?k={}"),
    ("fashion_myntra", "https://www.myntra.com/{}"),
    ("home_kitchen", "https://www.amazon.in/s?k={}"),
    ("beauty_nykaa", "https://www.nykaa.com/search/result/?q={}"),
    ("sports_fitness", "https://www.amazon.in/s?k={}"),
];

const CATEGORY_DATASETS: &[(&str, &[&str])] = &[
    ("groceries", &["blinkit", "zepto", "instamart", "bigbasket"]),
    ("electronics", &["amazon", "flipkart", "electronics_amazon"]),
    ("fashion", &["myntra", "ajio", "fashion_myntra"]),
    ("home", &["home_kitchen"]),
    ("homekitchen", &["home_kitchen"]),
    ("beauty", &["nykaa", "beauty_nykaa"]),
    ("sports", &["sports_fitness"]),
];

const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("groceries", &["milk", "bread", "rice", "oil", "sugar", "noodles", "chips"]),
    ("electronics", &["phone", "laptop", "headphones", "tablet", "camera", "tv"]),
    ("fashion", &["shoes", "jeans", "tshirt", "dress", "jacket", "sneakers"]),
    ("home", &["furniture", "appliances", "cookware", "decor"]),
    ("beauty", &["skincare", "makeup", "perfume", "haircare"]),
    ("sports", &["fitness", "outdoor", "sports"]),
];

/// Every platform that may have a dataset catalog.
pub fn dataset_platforms() -> &'static [&'static str] {
    DATASET_PLATFORMS
}

/// Platform names presented to users as marketplaces.
pub fn storefront_platforms() -> &'static [&'static str] {
    STOREFRONT_PLATFORMS
}

pub fn catalog_path(datasets_dir: &Path, platform: &str) -> PathBuf {
    datasets_dir.join(format!("{platform}_products.json"))
}

/// Storefront search URL for a listing, or `None` for an unknown platform.
pub fn redirect_url(platform: &str, product_name: &str) -> Option<String> {
    let platform = platform.to_lowercase();
    REDIRECT_TEMPLATES
        .iter()
        .find(|(name, _)| *name == platform)
        .map(|(_, template)| template.replace("{}", &product_name.replace(' ', "%20")))
}

pub fn category_datasets(category: &str) -> &'static [&'static str] {
    lookup(CATEGORY_DATASETS, category)
}

pub fn category_keywords(category: &str) -> &'static [&'static str] {
    lookup(CATEGORY_KEYWORDS, category)
}

fn lookup(table: &'static [(&'static str, &'static [&'static str])], key: &str) -> &'static [&'static str] {
    let key = key.to_lowercase();
    table
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, values)| *values)
        .unwrap_or(&[])
}
