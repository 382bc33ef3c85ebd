//! Page classification and unit scale detection.

use serde::{Deserialize, Serialize};

use super::tokens::PositionedToken;

/// Headings that mark a profit and loss account or a balance sheet.
const STATEMENT_MARKERS: [&str; 4] = [
    "comprehensive income",
    "profit and loss",
    "balance sheet",
    "financial position",
];

const MILLION_MARKERS: [&str; 2] = ["millions", "£m"];
const THOUSAND_MARKERS: [&str; 3] = ["thousands", "£'000", "£000"];

/// Concatenate a page's token text, lower-cased, in token order.
pub fn page_text(tokens: &[PositionedToken]) -> String {
    tokens
        .iter()
        .map(|t| t.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Whether lower-cased page text belongs to a primary financial statement.
pub fn is_financial_page(text: &str) -> bool {
    STATEMENT_MARKERS.iter().any(|m| text.contains(m))
}

/// Monetary unit declared on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleFactor {
    #[default]
    Units,
    Thousands,
    Millions,
}

impl ScaleFactor {
    pub fn multiplier(&self) -> f64 {
        match self {
            ScaleFactor::Units => 1.0,
            ScaleFactor::Thousands => 1_000.0,
            ScaleFactor::Millions => 1_000_000.0,
        }
    }
}

/// Detect the scale of a page from its lower-cased text. Millions take
/// priority over thousands.
pub fn detect_scale(text: &str) -> ScaleFactor {
    if MILLION_MARKERS.iter().any(|m| text.contains(m)) {
        ScaleFactor::Millions
    } else if THOUSAND_MARKERS.iter().any(|m| text.contains(m)) {
        ScaleFactor::Thousands
    } else {
        ScaleFactor::Units
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_financial_markers() {
        assert!(is_financial_page("consolidated statement of comprehensive income"));
        assert!(is_financial_page("profit and loss account for the year"));
        assert!(is_financial_page("balance sheet as at 31 march"));
        assert!(is_financial_page("statement of financial position"));
        assert!(!is_financial_page("directors' report 2023 turnover 1,234,567"));
    }

    #[test]
    fn test_page_text_lowercases_and_joins() {
        let tokens = vec![
            PositionedToken::new("Balance", 0.1, 0.1),
            PositionedToken::new("SHEET", 0.2, 0.1),
        ];
        assert_eq!(page_text(&tokens), "balance sheet");
        assert!(is_financial_page(&page_text(&tokens)));
    }

    #[test]
    fn test_scale_priority() {
        assert_eq!(detect_scale("amounts in £m"), ScaleFactor::Millions);
        assert_eq!(detect_scale("in millions, comparatives in thousands"), ScaleFactor::Millions);
        assert_eq!(detect_scale("£'000"), ScaleFactor::Thousands);
        assert_eq!(detect_scale("£000 notes"), ScaleFactor::Thousands);
        assert_eq!(detect_scale("thousands"), ScaleFactor::Thousands);
        assert_eq!(detect_scale("£"), ScaleFactor::Units);
    }

    #[test]
    fn test_multiplier() {
        assert_eq!(ScaleFactor::Units.multiplier(), 1.0);
        assert_eq!(ScaleFactor::Thousands.multiplier(), 1_000.0);
        assert_eq!(ScaleFactor::Millions.multiplier(), 1_000_000.0);
    }
}
