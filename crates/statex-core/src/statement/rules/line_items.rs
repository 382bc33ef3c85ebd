//! The line-item table for UK small and medium company accounts.

use super::{FieldRule, SignRule};
use crate::models::statement::{CanonicalField, UpdatePolicy};

/// Rules in evaluation order.
pub static LINE_ITEM_RULES: &[FieldRule] = &[
    FieldRule {
        field: CanonicalField::IsRevenue,
        matches: is_revenue,
        policy: UpdatePolicy::FirstWins,
        sign: SignRule::AsIs,
    },
    FieldRule {
        field: CanonicalField::IsEbit,
        matches: is_operating_result,
        policy: UpdatePolicy::FirstWins,
        sign: SignRule::AsIs,
    },
    FieldRule {
        field: CanonicalField::IsNetIncome,
        matches: is_profit_for_year,
        policy: UpdatePolicy::FirstWins,
        sign: SignRule::AsIs,
    },
    FieldRule {
        field: CanonicalField::BsTotalAssets,
        matches: is_net_assets,
        policy: UpdatePolicy::LastWins,
        sign: SignRule::AsIs,
    },
    FieldRule {
        field: CanonicalField::BsCurrLiab,
        matches: is_short_term_creditors,
        policy: UpdatePolicy::LastWins,
        sign: SignRule::Absolute,
    },
    FieldRule {
        field: CanonicalField::BsTotalLiab,
        matches: is_long_term_creditors,
        policy: UpdatePolicy::LastWins,
        sign: SignRule::Absolute,
    },
    FieldRule {
        field: CanonicalField::BsCurrAssets,
        matches: is_current_assets,
        policy: UpdatePolicy::FirstWins,
        sign: SignRule::AsIs,
    },
];

fn is_revenue(text: &str) -> bool {
    text.contains("turnover") || text.contains("revenue")
}

fn is_operating_result(text: &str) -> bool {
    text.contains("operating") && (text.contains("profit") || text.contains("loss"))
}

fn is_profit_for_year(text: &str) -> bool {
    text.contains("profit")
        && (text.contains("financial year") || text.contains("for the year"))
        && !text.contains("before")
}

fn is_net_assets(text: &str) -> bool {
    text.contains("net assets") && !text.contains("current")
}

fn is_short_term_creditors(text: &str) -> bool {
    text.contains("creditors") && text.contains("within one year")
}

fn is_long_term_creditors(text: &str) -> bool {
    text.contains("creditors") && text.contains("more than one year")
}

fn is_current_assets(text: &str) -> bool {
    text.contains("current assets") && !text.contains("less") && !text.contains("net")
}

#[cfg(test)]
mod tests {
    use super::super::map_row;
    use super::*;
    use pretty_assertions::assert_eq;

    fn fields(text: &str) -> Vec<CanonicalField> {
        map_row(LINE_ITEM_RULES, 0, 0, text, -10.0)
            .into_iter()
            .map(|u| u.field)
            .collect()
    }

    #[test]
    fn test_income_statement_rows() {
        assert_eq!(fields("turnover 3 1,000"), vec![CanonicalField::IsRevenue]);
        assert_eq!(fields("revenue"), vec![CanonicalField::IsRevenue]);
        assert_eq!(fields("operating profit"), vec![CanonicalField::IsEbit]);
        assert_eq!(fields("operating loss"), vec![CanonicalField::IsEbit]);
        assert_eq!(
            fields("profit for the financial year"),
            vec![CanonicalField::IsNetIncome]
        );
        assert!(fields("profit before taxation for the year").is_empty());
    }

    #[test]
    fn test_balance_sheet_rows() {
        assert_eq!(fields("net assets"), vec![CanonicalField::BsTotalAssets]);
        assert!(fields("net current assets").is_empty());
        assert_eq!(fields("current assets"), vec![CanonicalField::BsCurrAssets]);
        assert!(fields("total assets less current liabilities").is_empty());
        assert_eq!(
            fields("creditors: amounts falling due within one year"),
            vec![CanonicalField::BsCurrLiab]
        );
        assert_eq!(
            fields("creditors: amounts falling due after more than one year"),
            vec![CanonicalField::BsTotalLiab]
        );
    }

    #[test]
    fn test_row_can_feed_several_fields() {
        assert_eq!(
            fields("operating profit and turnover"),
            vec![CanonicalField::IsRevenue, CanonicalField::IsEbit]
        );
    }

    #[test]
    fn test_creditors_stored_absolute() {
        let updates = map_row(LINE_ITEM_RULES, 0, 0, "creditors within one year", -10.0);
        assert_eq!(updates[0].value, 10.0);

        let updates = map_row(LINE_ITEM_RULES, 0, 0, "net assets", -10.0);
        assert_eq!(updates[0].value, -10.0);
    }

    #[test]
    fn test_policies() {
        let policy = |field| {
            LINE_ITEM_RULES
                .iter()
                .find(|r| r.field == field)
                .map(|r| r.policy)
        };
        assert_eq!(policy(CanonicalField::IsRevenue), Some(UpdatePolicy::FirstWins));
        assert_eq!(policy(CanonicalField::BsTotalAssets), Some(UpdatePolicy::LastWins));
        assert_eq!(policy(CanonicalField::BsCurrAssets), Some(UpdatePolicy::FirstWins));
        assert_eq!(policy(CanonicalField::CfOperating), None);
    }
}
