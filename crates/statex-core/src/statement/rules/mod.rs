//! Keyword rules that map statement rows to canonical fields.

pub mod line_items;
pub mod patterns;

pub use line_items::LINE_ITEM_RULES;
pub use patterns::AMOUNT_PATTERN;

use crate::models::statement::{CanonicalField, ProposedUpdate, UpdatePolicy};

/// Sign handling applied to a row's value before it is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignRule {
    AsIs,
    /// Liabilities are stored positive whatever their presentation.
    Absolute,
}

impl SignRule {
    pub fn apply(&self, value: f64) -> f64 {
        match self {
            SignRule::AsIs => value,
            SignRule::Absolute => value.abs(),
        }
    }
}

/// One line-item rule: a predicate over lower-cased row text, the field it
/// feeds and how it updates that field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: CanonicalField,
    pub matches: fn(&str) -> bool,
    pub policy: UpdatePolicy,
    pub sign: SignRule,
}

/// Evaluate `rules` in order against one row. Rules are independent, so a
/// row may feed several fields.
pub fn map_row(
    rules: &[FieldRule],
    page_index: u32,
    row_index: usize,
    row_text: &str,
    value: f64,
) -> Vec<ProposedUpdate> {
    rules
        .iter()
        .filter(|rule| (rule.matches)(row_text))
        .map(|rule| ProposedUpdate {
            page_index,
            row_index,
            field: rule.field,
            value: rule.sign.apply(value),
            policy: rule.policy,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_rule() {
        assert_eq!(SignRule::AsIs.apply(-5.0), -5.0);
        assert_eq!(SignRule::Absolute.apply(-5.0), 5.0);
    }

    #[test]
    fn test_map_row_tags_position() {
        let updates = map_row(LINE_ITEM_RULES, 3, 7, "turnover", 100.0);
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].page_index, 3);
        assert_eq!(updates[0].row_index, 7);
        assert_eq!(updates[0].field, CanonicalField::IsRevenue);
    }

    #[test]
    fn test_map_row_no_match() {
        assert!(map_row(LINE_ITEM_RULES, 0, 0, "administrative expenses", 100.0).is_empty());
    }
}
