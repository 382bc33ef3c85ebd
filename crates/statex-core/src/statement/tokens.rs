//! Positioned tokens and the adapter that acquires them for a page.

use image::GenericImageView;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::ExtractionError;
use crate::models::config::PdfConfig;
use crate::ocr::OcrBackend;
use crate::pdf::{PageText, PdfProcessor};

/// A unit of page content with its position.
///
/// Both coordinates are fractions of the page: `x_frac` of its width
/// (0 = left edge) and `y` of its height (0 = top edge).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionedToken {
    pub text: String,
    pub x_frac: f32,
    pub y: f32,
}

impl PositionedToken {
    pub fn new(text: impl Into<String>, x_frac: f32, y: f32) -> Self {
        Self {
            text: text.into(),
            x_frac,
            y,
        }
    }
}

/// Where a page's tokens came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenModality {
    Digital,
    Ocr,
    /// Neither source produced anything.
    None,
}

/// Tokens acquired for one page.
#[derive(Debug, Clone)]
pub struct PageTokens {
    pub modality: TokenModality,
    pub tokens: Vec<PositionedToken>,
}

impl PageTokens {
    pub fn empty() -> Self {
        Self {
            modality: TokenModality::None,
            tokens: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Acquire a page's tokens, preferring its digital text layer.
///
/// The text layer is used when it holds more than `min_digital_tokens`
/// words. Otherwise the page is rendered and passed through `ocr`; with no
/// OCR backend the page yields no tokens.
pub fn acquire_tokens(
    doc: &dyn PdfProcessor,
    page: u32,
    config: &PdfConfig,
    ocr: Option<&dyn OcrBackend>,
) -> Result<PageTokens, ExtractionError> {
    match doc.page_text(page) {
        Ok(text) if text.words.len() > config.min_digital_tokens => {
            debug!("Page {}: using {} digital words", page, text.words.len());
            return Ok(PageTokens {
                modality: TokenModality::Digital,
                tokens: digital_tokens(&text),
            });
        }
        Ok(text) => trace!("Page {}: text layer has only {} words", page, text.words.len()),
        Err(e) => debug!("Page {}: text layer unreadable: {}", page, e),
    }

    let Some(ocr) = ocr else {
        return Ok(PageTokens::empty());
    };

    let image = doc
        .render_page(page, config.render_scale)
        .map_err(|e| acquisition_error(page, e))?;
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(acquisition_error(page, "rendered page is empty"));
    }

    let result = ocr.recognize(&image).map_err(|e| acquisition_error(page, e))?;

    let tokens: Vec<PositionedToken> = result
        .boxes
        .iter()
        .filter(|b| !b.text.trim().is_empty())
        .map(|b| {
            PositionedToken::new(
                b.text.trim(),
                fraction(b.left(), width as f32),
                fraction(b.top(), height as f32),
            )
        })
        .collect();

    debug!("Page {}: OCR produced {} tokens", page, tokens.len());

    if tokens.is_empty() {
        return Ok(PageTokens::empty());
    }
    Ok(PageTokens {
        modality: TokenModality::Ocr,
        tokens,
    })
}

fn digital_tokens(text: &PageText) -> Vec<PositionedToken> {
    text.words
        .iter()
        .map(|w| {
            PositionedToken::new(
                w.text.clone(),
                fraction(w.x, text.width),
                fraction(w.y, text.height),
            )
        })
        .collect()
}

fn fraction(value: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        return 0.0;
    }
    (value / extent).clamp(0.0, 1.0)
}

fn acquisition_error(page: u32, reason: impl ToString) -> ExtractionError {
    ExtractionError::TokenAcquisition {
        page,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{OcrError, PdfError};
    use crate::ocr::{OcrResult, TextBox};
    use crate::pdf::TextWord;
    use image::DynamicImage;

    struct FakeDoc {
        words: usize,
        renders: bool,
    }

    impl PdfProcessor for FakeDoc {
        fn load(&mut self, _data: &[u8]) -> crate::pdf::Result<()> {
            Ok(())
        }

        fn page_count(&self) -> u32 {
            1
        }

        fn page_text(&self, _page: u32) -> crate::pdf::Result<PageText> {
            Ok(PageText {
                width: 600.0,
                height: 800.0,
                words: (0..self.words)
                    .map(|i| TextWord {
                        text: format!("w{}", i),
                        x: 300.0,
                        y: 400.0,
                    })
                    .collect(),
            })
        }

        fn render_page(&self, _page: u32, _scale: f32) -> crate::pdf::Result<DynamicImage> {
            if self.renders {
                Ok(DynamicImage::new_rgb8(200, 100))
            } else {
                Err(PdfError::Render("no raster".to_string()))
            }
        }
    }

    struct FixedOcr;

    impl OcrBackend for FixedOcr {
        fn recognize(&self, image: &DynamicImage) -> Result<OcrResult, OcrError> {
            let mut result = OcrResult::empty(image.width(), image.height());
            result.boxes.push(TextBox::from_rect(50.0, 25.0, 90.0, 35.0, "Turnover"));
            result.boxes.push(TextBox::from_rect(150.0, 25.0, 190.0, 35.0, "  "));
            Ok(result)
        }
    }

    struct FailingOcr;

    impl OcrBackend for FailingOcr {
        fn recognize(&self, _image: &DynamicImage) -> Result<OcrResult, OcrError> {
            Err(OcrError::Recognition("boom".to_string()))
        }
    }

    #[test]
    fn test_digital_path_normalises_positions() {
        let doc = FakeDoc { words: 11, renders: false };
        let page = acquire_tokens(&doc, 0, &PdfConfig::default(), None).unwrap();

        assert_eq!(page.modality, TokenModality::Digital);
        assert_eq!(page.tokens.len(), 11);
        assert_eq!(page.tokens[0].x_frac, 0.5);
        assert_eq!(page.tokens[0].y, 0.5);
    }

    #[test]
    fn test_exactly_threshold_words_falls_back_to_ocr() {
        let doc = FakeDoc { words: 10, renders: true };
        let page = acquire_tokens(&doc, 0, &PdfConfig::default(), Some(&FixedOcr)).unwrap();

        assert_eq!(page.modality, TokenModality::Ocr);
        assert_eq!(page.tokens, vec![PositionedToken::new("Turnover", 0.25, 0.25)]);
    }

    #[test]
    fn test_without_ocr_sparse_page_is_empty() {
        let doc = FakeDoc { words: 3, renders: true };
        let page = acquire_tokens(&doc, 0, &PdfConfig::default(), None).unwrap();
        assert!(page.is_empty());
        assert_eq!(page.modality, TokenModality::None);
    }

    #[test]
    fn test_ocr_failure_is_acquisition_error() {
        let doc = FakeDoc { words: 0, renders: true };
        let err = acquire_tokens(&doc, 4, &PdfConfig::default(), Some(&FailingOcr)).unwrap_err();
        assert!(matches!(err, ExtractionError::TokenAcquisition { page: 4, .. }));
    }

    #[test]
    fn test_render_failure_is_acquisition_error() {
        let doc = FakeDoc { words: 0, renders: false };
        let err = acquire_tokens(&doc, 0, &PdfConfig::default(), Some(&FixedOcr)).unwrap_err();
        assert!(matches!(err, ExtractionError::TokenAcquisition { page: 0, .. }));
    }
}
