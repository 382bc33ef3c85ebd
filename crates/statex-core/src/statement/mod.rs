//! Coordinate-based financial statement extraction.
//!
//! Pages are turned into positioned tokens, classified, grouped into rows
//! and each row's leftmost value-column figure is mapped to a canonical
//! field through [`rules::LINE_ITEM_RULES`].

pub mod candidates;
pub mod classifier;
mod extractor;
pub mod rows;
pub mod rules;
pub mod tokens;

pub use candidates::{NumericCandidate, best_value, extract_candidates, parse_amount};
pub use classifier::{ScaleFactor, detect_scale, is_financial_page};
pub use extractor::{
    CancelFlag, ExtractOptions, ExtractionReport, PageAnalysis, PageSummary, StatementExtractor,
    analyze_page, open_document,
};
pub use rows::{Row, cluster_rows};
pub use rules::{FieldRule, LINE_ITEM_RULES, SignRule, map_row};
pub use tokens::{PageTokens, PositionedToken, TokenModality, acquire_tokens};
