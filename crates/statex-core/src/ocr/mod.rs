//! OCR collaborator: recognized text boxes over a page image.

#[cfg(feature = "native")]
mod pure_engine;
mod timeout;

#[cfg(feature = "native")]
pub use pure_engine::PureOcrEngine;
pub use timeout::TimeoutOcr;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::OcrError;

/// A detected text box with its coordinates and content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextBox {
    /// Bounding box coordinates (x1, y1, x2, y2, x3, y3, x4, y4) for quadrilateral.
    pub bbox: [f32; 8],

    /// Recognized text content.
    pub text: String,

    /// Recognition confidence score (0.0 - 1.0).
    pub confidence: f32,
}

impl TextBox {
    /// Build a box from an axis-aligned rectangle.
    pub fn from_rect(left: f32, top: f32, right: f32, bottom: f32, text: impl Into<String>) -> Self {
        Self {
            bbox: [left, top, right, top, right, bottom, left, bottom],
            text: text.into(),
            confidence: 1.0,
        }
    }

    /// Get the axis-aligned bounding rectangle `(min_x, min_y, max_x, max_y)`.
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }

    /// Left edge in pixels.
    pub fn left(&self) -> f32 {
        self.rect().0
    }

    /// Top edge in pixels.
    pub fn top(&self) -> f32 {
        self.rect().1
    }
}

/// Result of OCR processing on an image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrResult {
    /// Detected and recognized text boxes.
    pub boxes: Vec<TextBox>,

    /// Processing time in milliseconds.
    pub processing_time_ms: u64,

    /// Image dimensions (width, height).
    pub image_size: (u32, u32),
}

impl OcrResult {
    /// Create an empty result.
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            boxes: Vec::new(),
            processing_time_ms: 0,
            image_size: (width, height),
        }
    }
}

/// Trait for OCR engines.
///
/// Implementations must be shareable across threads: a page's recognition
/// may run on a worker thread so that it can be bounded by a timeout.
pub trait OcrBackend: Send + Sync {
    /// Recognize text boxes in an image. Coordinates are pixels of `image`.
    fn recognize(&self, image: &DynamicImage) -> Result<OcrResult, OcrError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_of_skewed_box() {
        let text_box = TextBox {
            bbox: [10.0, 22.0, 90.0, 20.0, 92.0, 40.0, 12.0, 42.0],
            text: "Turnover".to_string(),
            confidence: 0.9,
        };
        assert_eq!(text_box.rect(), (10.0, 20.0, 92.0, 42.0));
        assert_eq!(text_box.left(), 10.0);
        assert_eq!(text_box.top(), 20.0);
    }

    #[test]
    fn test_from_rect() {
        let text_box = TextBox::from_rect(5.0, 6.0, 50.0, 16.0, "1,234");
        assert_eq!(text_box.rect(), (5.0, 6.0, 50.0, 16.0));
    }
}
