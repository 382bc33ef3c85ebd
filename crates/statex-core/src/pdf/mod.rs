//! PDF processing module.
//!
//! Provides the document primitives the statement engine depends on: page
//! count, the positioned digital text layer of a page, and a raster image of
//! a page for OCR.

mod extractor;
mod image_source;
mod text_layer;

pub use extractor::PdfExtractor;
pub use image_source::ImageDocument;
pub use text_layer::{PageText, TextWord};

use crate::error::PdfError;
use image::DynamicImage;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for page-oriented document sources.
///
/// Page indices are 0-based.
pub trait PdfProcessor {
    /// Load a document from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the document.
    fn page_count(&self) -> u32;

    /// Positioned words of the page's digital text layer.
    fn page_text(&self, page: u32) -> Result<PageText>;

    /// Render a page as an image, scaled linearly by `scale`.
    fn render_page(&self, page: u32, scale: f32) -> Result<DynamicImage>;
}

/// Resize an image by a linear factor.
pub(crate) fn upscale(image: DynamicImage, scale: f32) -> DynamicImage {
    if (scale - 1.0).abs() < f32::EPSILON || scale <= 0.0 {
        return image;
    }
    let width = ((image.width() as f32) * scale).round().max(1.0) as u32;
    let height = ((image.height() as f32) * scale).round().max(1.0) as u32;
    image.resize_exact(width, height, image::imageops::FilterType::Triangle)
}
