//! Data models: configuration and the extracted statement record.

pub mod config;
pub mod statement;

pub use config::{ExtractionConfig, OcrConfig, PdfConfig, StatexConfig};
pub use statement::{
    CanonicalField, ExtractionResult, FinancialFields, ParsingStatus, ProposedUpdate,
    UpdatePolicy,
};
