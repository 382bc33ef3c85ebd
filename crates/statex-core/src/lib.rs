//! Core library for financial statement extraction from company filings.
//!
//! This crate provides:
//! - PDF processing (positioned text layer and page images)
//! - OCR fallback for scanned pages using PaddleOCR models
//! - Statement page detection, row reconstruction and line-item mapping
//! - The extracted statement record and its parsing status

pub mod error;
pub mod models;
pub mod ocr;
pub mod pdf;
pub mod statement;

pub use error::{Result, StatexError};
pub use models::{CanonicalField, ExtractionResult, ParsingStatus, StatexConfig};
pub use ocr::{OcrBackend, OcrResult, TextBox};
#[cfg(feature = "native")]
pub use ocr::PureOcrEngine;
pub use pdf::{ImageDocument, PdfExtractor, PdfProcessor};
pub use statement::{
    CancelFlag, ExtractOptions, ExtractionReport, PageSummary, StatementExtractor,
};
