//! Financial statement result model.

use serde::{Deserialize, Serialize};

/// Canonical line items the engine tries to populate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalField {
    /// Turnover / revenue.
    IsRevenue,
    /// Operating profit or loss.
    IsEbit,
    /// Profit for the financial year.
    IsNetIncome,
    /// Net assets.
    BsTotalAssets,
    /// Current assets.
    BsCurrAssets,
    /// Creditors falling due within one year.
    BsCurrLiab,
    /// Creditors falling due after more than one year.
    BsTotalLiab,
    /// Net cash from operating activities (reserved).
    CfOperating,
    /// Net cash from investing activities (reserved).
    CfInvesting,
    /// Net cash from financing activities (reserved).
    CfFinancing,
}

impl CanonicalField {
    /// Every field, in serialisation order.
    pub const ALL: [CanonicalField; 10] = [
        CanonicalField::IsRevenue,
        CanonicalField::IsEbit,
        CanonicalField::IsNetIncome,
        CanonicalField::BsTotalAssets,
        CanonicalField::BsCurrAssets,
        CanonicalField::BsCurrLiab,
        CanonicalField::BsTotalLiab,
        CanonicalField::CfOperating,
        CanonicalField::CfInvesting,
        CanonicalField::CfFinancing,
    ];

    /// Field name as it appears in the output record.
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::IsRevenue => "is_revenue",
            CanonicalField::IsEbit => "is_ebit",
            CanonicalField::IsNetIncome => "is_net_income",
            CanonicalField::BsTotalAssets => "bs_total_assets",
            CanonicalField::BsCurrAssets => "bs_curr_assets",
            CanonicalField::BsCurrLiab => "bs_curr_liab",
            CanonicalField::BsTotalLiab => "bs_total_liab",
            CanonicalField::CfOperating => "cf_operating",
            CanonicalField::CfInvesting => "cf_investing",
            CanonicalField::CfFinancing => "cf_financing",
        }
    }
}

impl std::fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of processing one filing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParsingStatus {
    /// The scan ran to completion (fields may still be absent).
    #[default]
    Success,
    /// The filing only exists as a PDF (reported by the retrieval layer).
    PdfOnly,
    /// Filing metadata could not be fetched.
    MetadataFailed,
    /// Filing content could not be downloaded.
    DownloadFailed,
    /// The scan was stopped early; fields hold whatever had accumulated.
    Cancelled,
    /// The document could not be processed at all.
    Error,
}

impl ParsingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParsingStatus::Success => "success",
            ParsingStatus::PdfOnly => "pdf_only",
            ParsingStatus::MetadataFailed => "metadata_failed",
            ParsingStatus::DownloadFailed => "download_failed",
            ParsingStatus::Cancelled => "cancelled",
            ParsingStatus::Error => "error",
        }
    }
}

/// Values found for each canonical field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinancialFields {
    pub is_revenue: Option<f64>,
    pub is_ebit: Option<f64>,
    pub is_net_income: Option<f64>,
    pub bs_total_assets: Option<f64>,
    pub bs_curr_assets: Option<f64>,
    pub bs_curr_liab: Option<f64>,
    pub bs_total_liab: Option<f64>,
    pub cf_operating: Option<f64>,
    pub cf_investing: Option<f64>,
    pub cf_financing: Option<f64>,
}

impl FinancialFields {
    /// Read a field.
    pub fn get(&self, field: CanonicalField) -> Option<f64> {
        match field {
            CanonicalField::IsRevenue => self.is_revenue,
            CanonicalField::IsEbit => self.is_ebit,
            CanonicalField::IsNetIncome => self.is_net_income,
            CanonicalField::BsTotalAssets => self.bs_total_assets,
            CanonicalField::BsCurrAssets => self.bs_curr_assets,
            CanonicalField::BsCurrLiab => self.bs_curr_liab,
            CanonicalField::BsTotalLiab => self.bs_total_liab,
            CanonicalField::CfOperating => self.cf_operating,
            CanonicalField::CfInvesting => self.cf_investing,
            CanonicalField::CfFinancing => self.cf_financing,
        }
    }

    fn slot_mut(&mut self, field: CanonicalField) -> &mut Option<f64> {
        match field {
            CanonicalField::IsRevenue => &mut self.is_revenue,
            CanonicalField::IsEbit => &mut self.is_ebit,
            CanonicalField::IsNetIncome => &mut self.is_net_income,
            CanonicalField::BsTotalAssets => &mut self.bs_total_assets,
            CanonicalField::BsCurrAssets => &mut self.bs_curr_assets,
            CanonicalField::BsCurrLiab => &mut self.bs_curr_liab,
            CanonicalField::BsTotalLiab => &mut self.bs_total_liab,
            CanonicalField::CfOperating => &mut self.cf_operating,
            CanonicalField::CfInvesting => &mut self.cf_investing,
            CanonicalField::CfFinancing => &mut self.cf_financing,
        }
    }

    /// Number of fields holding a value.
    pub fn populated(&self) -> usize {
        CanonicalField::ALL
            .iter()
            .filter(|f| self.get(**f).is_some())
            .count()
    }
}

/// How a field reacts to a second matching row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdatePolicy {
    /// Keep the first value seen in document order.
    FirstWins,
    /// Every match overwrites the previous one.
    LastWins,
}

/// A field update proposed by one row of one page.
#[derive(Debug, Clone, PartialEq)]
pub struct ProposedUpdate {
    /// 0-based page index.
    pub page_index: u32,
    /// Row index within the page, top to bottom.
    pub row_index: usize,
    pub field: CanonicalField,
    /// Scaled, sign-adjusted value.
    pub value: f64,
    pub policy: UpdatePolicy,
}

/// Structured record produced for one filing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub parsing_status: ParsingStatus,

    #[serde(flatten)]
    pub fields: FinancialFields,
}

impl ExtractionResult {
    /// Create an empty result ready for a document scan.
    pub fn new() -> Self {
        Self::default()
    }

    /// A result with every field absent and the given status.
    ///
    /// Used for precondition failures reported by the retrieval layer and
    /// for document level failures inside the engine.
    pub fn with_status(status: ParsingStatus) -> Self {
        Self {
            parsing_status: status,
            fields: FinancialFields::default(),
        }
    }

    /// Read a field.
    pub fn get(&self, field: CanonicalField) -> Option<f64> {
        self.fields.get(field)
    }

    /// Apply a single update according to its policy. Returns whether the
    /// stored value changed.
    pub fn apply(&mut self, update: &ProposedUpdate) -> bool {
        let slot = self.fields.slot_mut(update.field);
        match update.policy {
            UpdatePolicy::FirstWins if slot.is_some() => false,
            _ => {
                let changed = *slot != Some(update.value);
                *slot = Some(update.value);
                changed
            }
        }
    }

    /// Apply updates in document order: by page, then by row. The sort is
    /// stable, so updates from the same row keep their rule order.
    pub fn merge(&mut self, mut updates: Vec<ProposedUpdate>) {
        updates.sort_by_key(|u| (u.page_index, u.row_index));
        for update in &updates {
            self.apply(update);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn update(page: u32, row: usize, field: CanonicalField, value: f64, policy: UpdatePolicy) -> ProposedUpdate {
        ProposedUpdate {
            page_index: page,
            row_index: row,
            field,
            value,
            policy,
        }
    }

    #[test]
    fn test_first_wins_keeps_earliest() {
        let mut result = ExtractionResult::new();
        assert!(result.apply(&update(0, 1, CanonicalField::IsRevenue, 100.0, UpdatePolicy::FirstWins)));
        assert!(!result.apply(&update(1, 0, CanonicalField::IsRevenue, 200.0, UpdatePolicy::FirstWins)));
        assert_eq!(result.get(CanonicalField::IsRevenue), Some(100.0));
    }

    #[test]
    fn test_last_wins_overwrites() {
        let mut result = ExtractionResult::new();
        result.apply(&update(0, 1, CanonicalField::BsTotalAssets, 100.0, UpdatePolicy::LastWins));
        result.apply(&update(1, 0, CanonicalField::BsTotalAssets, 200.0, UpdatePolicy::LastWins));
        assert_eq!(result.get(CanonicalField::BsTotalAssets), Some(200.0));
    }

    #[test]
    fn test_merge_matches_sequential_order() {
        let updates = vec![
            update(2, 0, CanonicalField::IsRevenue, 3.0, UpdatePolicy::FirstWins),
            update(2, 0, CanonicalField::BsTotalAssets, 30.0, UpdatePolicy::LastWins),
            update(0, 5, CanonicalField::IsRevenue, 1.0, UpdatePolicy::FirstWins),
            update(0, 5, CanonicalField::BsTotalAssets, 10.0, UpdatePolicy::LastWins),
            update(1, 3, CanonicalField::BsTotalAssets, 20.0, UpdatePolicy::LastWins),
        ];

        let mut sequential = ExtractionResult::new();
        let mut ordered = updates.clone();
        ordered.sort_by_key(|u| (u.page_index, u.row_index));
        for u in &ordered {
            sequential.apply(u);
        }

        let mut merged = ExtractionResult::new();
        merged.merge(updates);

        assert_eq!(merged, sequential);
        assert_eq!(merged.get(CanonicalField::IsRevenue), Some(1.0));
        assert_eq!(merged.get(CanonicalField::BsTotalAssets), Some(30.0));
    }

    #[test]
    fn test_serialises_flat_record_with_nulls() {
        let mut result = ExtractionResult::new();
        result.fields.is_revenue = Some(1234.0);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["parsing_status"], "success");
        assert_eq!(json["is_revenue"], 1234.0);
        assert!(json["cf_operating"].is_null());
        assert!(json["bs_total_liab"].is_null());
    }

    #[test]
    fn test_with_status_has_no_fields() {
        let result = ExtractionResult::with_status(ParsingStatus::PdfOnly);
        assert_eq!(result.fields.populated(), 0);
        assert_eq!(
            serde_json::to_value(&result).unwrap()["parsing_status"],
            "pdf_only"
        );
    }
}
