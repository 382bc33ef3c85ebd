//! Regex patterns for statement figures.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Optional "(" or "-", digits with optional thousands separators and
    // decimal part, optional ")". e.g. 1,234,567  (1,234)  -250  12.5
    pub static ref AMOUNT_PATTERN: Regex = Regex::new(
        r"[(-]?\d+(?:,\d{3})*(?:\.\d+)?\)?"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(text: &str) -> Vec<&str> {
        AMOUNT_PATTERN.find_iter(text).map(|m| m.as_str()).collect()
    }

    #[test]
    fn test_amount_pattern() {
        assert_eq!(matches("1,234,567"), vec!["1,234,567"]);
        assert_eq!(matches("(1,234)"), vec!["(1,234)"]);
        assert_eq!(matches("-250.50"), vec!["-250.50"]);
        assert_eq!(matches("£12,000 and 3"), vec!["12,000", "3"]);
        assert!(matches("nil").is_empty());
    }
}
