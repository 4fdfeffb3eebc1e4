// Utility functions

/// Parses a marketplace price label such as `"₹1,299"` or `"Rs. 499"`.
pub fn parse_price_text(text: &str) -> Option<f64> {
    let cleaned: String = text
        .replace("Rs.", "")
        .replace(['₹', ','], "")
        .trim()
        .to_string();
    let price = cleaned.parse::<f64>().ok()?;
    (price.is_finite() && price >= 0.0).then_some(price)
}

/// Collapses inner whitespace the way a browser renders element text.
pub fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercased words of a product name or query; hyphenated words stay whole.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
