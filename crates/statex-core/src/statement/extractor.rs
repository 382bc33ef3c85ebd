//! Document-level statement extraction.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, warn};

use super::candidates::{best_value, extract_candidates};
use super::classifier::{ScaleFactor, detect_scale, is_financial_page, page_text};
use super::rows::cluster_rows;
use super::rules::{LINE_ITEM_RULES, map_row};
use super::tokens::{PositionedToken, TokenModality, acquire_tokens};
use crate::error::{ExtractionError, Result};
use crate::models::config::{ExtractionConfig, StatexConfig};
use crate::models::statement::{ExtractionResult, ParsingStatus, ProposedUpdate};
use crate::ocr::{OcrBackend, TimeoutOcr};
use crate::pdf::{ImageDocument, PdfExtractor, PdfProcessor};

/// Shared flag a caller sets to stop a running extraction.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Per-call limits for an extraction.
#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Overrides `pdf.max_pages` from the configuration.
    pub max_pages: Option<u32>,
    /// Stop scanning once this instant has passed.
    pub deadline: Option<Instant>,
    pub cancel: CancelFlag,
}

impl ExtractOptions {
    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = Some(max_pages);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    pub fn with_cancel(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    fn should_stop(&self) -> bool {
        self.cancel.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Outcome of analysing one page's tokens.
#[derive(Debug, Clone, Default)]
pub struct PageAnalysis {
    pub financial: bool,
    pub scale: Option<ScaleFactor>,
    pub rows: usize,
    pub updates: Vec<ProposedUpdate>,
}

/// Analyse a page in isolation.
///
/// Only financial pages are clustered and scanned. The proposed updates
/// carry `page_index` and their row index so they can be merged in
/// document order.
pub fn analyze_page(
    page_index: u32,
    tokens: &[PositionedToken],
    config: &ExtractionConfig,
) -> PageAnalysis {
    let text = page_text(tokens);
    if !is_financial_page(&text) {
        return PageAnalysis::default();
    }

    let scale = detect_scale(&text);
    let rows = cluster_rows(tokens, config.row_tolerance);
    let mut updates = Vec::new();

    for (row_index, row) in rows.iter().enumerate() {
        let ordered = row.reading_order();
        let candidates = extract_candidates(&ordered, config);
        let Some(value) = best_value(&candidates) else {
            continue;
        };

        let row_text = row.text();
        let row_updates = map_row(
            LINE_ITEM_RULES,
            page_index,
            row_index,
            &row_text,
            value * scale.multiplier(),
        );
        for update in &row_updates {
            debug!(
                "Page {} row {}: {} = {} ({:?})",
                page_index, row_index, update.field, update.value, row_text
            );
        }
        updates.extend(row_updates);
    }

    PageAnalysis {
        financial: true,
        scale: Some(scale),
        rows: rows.len(),
        updates,
    }
}

/// What happened on one page.
#[derive(Debug, Clone, Serialize)]
pub struct PageSummary {
    pub page_index: u32,
    pub modality: TokenModality,
    pub tokens: usize,
    pub financial: bool,
    pub scale: Option<ScaleFactor>,
    pub rows: usize,
    pub updates: usize,
}

/// Result of an extraction with per-page diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionReport {
    pub result: ExtractionResult,
    pub pages: Vec<PageSummary>,
    pub warnings: Vec<String>,
    pub processing_time_ms: u64,
}

/// Drives token acquisition and page analysis over a document.
pub struct StatementExtractor {
    config: StatexConfig,
    ocr: Option<Arc<dyn OcrBackend>>,
}

impl StatementExtractor {
    /// Create an extractor with no OCR backend.
    pub fn new(config: StatexConfig) -> Self {
        Self { config, ocr: None }
    }

    /// Set the OCR backend used for pages without a text layer.
    ///
    /// With a non-zero `ocr.timeout_ms` the backend is wrapped once in a
    /// [`TimeoutOcr`], so a worker abandoned on one page is still tracked on
    /// later pages and documents.
    pub fn with_ocr(mut self, backend: Arc<dyn OcrBackend>) -> Self {
        let timeout_ms = self.config.ocr.timeout_ms;
        self.ocr = Some(if timeout_ms == 0 {
            backend
        } else {
            Arc::new(TimeoutOcr::new(backend, Duration::from_millis(timeout_ms)))
        });
        self
    }

    pub fn config(&self) -> &StatexConfig {
        &self.config
    }

    fn ocr_backend(&self) -> Option<Arc<dyn OcrBackend>> {
        if !self.config.ocr.enabled {
            return None;
        }
        self.ocr.clone()
    }

    /// Scan a loaded document.
    ///
    /// Page failures are recorded as warnings and skipped. A cancelled
    /// scan keeps what it has found and reports `cancelled`.
    pub fn extract(&self, doc: &dyn PdfProcessor, options: &ExtractOptions) -> ExtractionReport {
        let start = Instant::now();
        let ocr = self.ocr_backend();
        let max_pages = options.max_pages.unwrap_or(self.config.pdf.max_pages);
        let page_count = doc.page_count().min(max_pages);

        let mut status = ParsingStatus::Success;
        let mut pages = Vec::new();
        let mut warnings = Vec::new();
        let mut updates = Vec::new();

        for page in 0..page_count {
            if options.should_stop() {
                warn!("Extraction cancelled before page {}", page);
                warnings.push(format!("cancelled before page {}", page));
                status = ParsingStatus::Cancelled;
                break;
            }

            let page_tokens = match acquire_tokens(doc, page, &self.config.pdf, ocr.as_deref()) {
                Ok(t) => t,
                Err(e) => {
                    warn!("Skipping page: {}", e);
                    warnings.push(e.to_string());
                    pages.push(PageSummary::skipped(page));
                    continue;
                }
            };

            if page_tokens.is_empty() {
                debug!("Page {}: no tokens", page);
                pages.push(PageSummary::skipped(page));
                continue;
            }

            let analysis = analyze_page(page, &page_tokens.tokens, &self.config.extraction);
            pages.push(PageSummary {
                page_index: page,
                modality: page_tokens.modality,
                tokens: page_tokens.tokens.len(),
                financial: analysis.financial,
                scale: analysis.scale,
                rows: analysis.rows,
                updates: analysis.updates.len(),
            });
            updates.extend(analysis.updates);
        }

        let mut result = ExtractionResult::with_status(status);
        result.merge(updates);

        let processing_time_ms = start.elapsed().as_millis() as u64;
        info!(
            "Extracted {} fields from {} pages in {}ms ({})",
            result.fields.populated(),
            pages.len(),
            processing_time_ms,
            result.parsing_status.as_str()
        );

        ExtractionReport {
            result,
            pages,
            warnings,
            processing_time_ms,
        }
    }

    /// Load document bytes (PDF or a single scanned image) and scan them.
    pub fn extract_bytes(&self, data: &[u8], options: &ExtractOptions) -> Result<ExtractionReport> {
        let doc = open_document(data)?;
        Ok(self.extract(doc.as_ref(), options))
    }

    /// Scan document bytes with default options. Never fails: any error or
    /// panic yields a record with status `error` and no fields.
    pub fn extract_document(&self, data: &[u8]) -> ExtractionResult {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            self.extract_bytes(data, &ExtractOptions::default())
        }));

        match outcome {
            Ok(Ok(report)) => report.result,
            Ok(Err(e)) => {
                warn!("Document failed: {}", e);
                ExtractionResult::with_status(ParsingStatus::Error)
            }
            Err(_) => {
                warn!("Document processing panicked");
                ExtractionResult::with_status(ParsingStatus::Error)
            }
        }
    }
}

impl Default for StatementExtractor {
    fn default() -> Self {
        Self::new(StatexConfig::default())
    }
}

impl PageSummary {
    fn skipped(page_index: u32) -> Self {
        Self {
            page_index,
            modality: TokenModality::None,
            tokens: 0,
            financial: false,
            scale: None,
            rows: 0,
            updates: 0,
        }
    }
}

/// Open bytes as a PDF, or as an image when they are not one.
pub fn open_document(data: &[u8]) -> Result<Box<dyn PdfProcessor>> {
    let head = &data[..data.len().min(1024)];
    let is_pdf = head.windows(5).any(|w| w == b"%PDF-");

    if !is_pdf && image::guess_format(data).is_ok() {
        let mut doc = ImageDocument::new();
        doc.load(data)?;
        return Ok(Box::new(doc));
    }

    let doc = PdfExtractor::from_bytes(data).map_err(|e| ExtractionError::Document(e.to_string()))?;
    Ok(Box::new(doc))
}
