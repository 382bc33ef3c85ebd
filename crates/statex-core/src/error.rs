//! Error types for the statex-core library.

use thiserror::Error;

/// Main error type for the statex library.
#[derive(Error, Debug)]
pub enum StatexError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// Statement extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to read the text layer of a page.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// Failed to produce a raster image of a page.
    #[error("failed to render page: {0}")]
    Render(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page index requested.
    #[error("invalid page index: {0}")]
    InvalidPage(u32),
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Recognition over an image failed.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// Recognition did not finish within the page budget.
    #[error("OCR timed out after {0} ms")]
    Timeout(u64),

    /// A recognition abandoned by an earlier timeout is still running.
    #[error("OCR engine is still busy with an abandoned page")]
    Busy,

    /// Invalid image format or dimensions.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Errors raised while turning page content into statement fields.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// A single page produced no usable tokens from either source.
    #[error("page {page}: token acquisition failed: {reason}")]
    TokenAcquisition { page: u32, reason: String },

    /// A matched figure could not be read as a number.
    #[error("failed to parse numeric value: {0}")]
    NumericParse(String),

    /// The document as a whole could not be read.
    #[error("document failure: {0}")]
    Document(String),
}

/// Result type for the statex library.
pub type Result<T> = std::result::Result<T, StatexError>;
