//! Positioned words from a page's digital text layer.
//!
//! pdf-extract interprets the content stream, including font encodings and
//! `ToUnicode` maps, and reports every glyph with its text rendering matrix.
//! [`WordCollector`] joins those glyphs into words by baseline and
//! horizontal gap.

use std::panic::{self, AssertUnwindSafe};

use pdf_extract::{Document, MediaBox, OutputDev, OutputError, Transform};
use tracing::trace;

use super::Result;
use crate::error::PdfError;

/// A word from the digital text layer, in page units.
#[derive(Debug, Clone, PartialEq)]
pub struct TextWord {
    pub text: String,
    /// Distance from the left edge of the page.
    pub x: f32,
    /// Distance of the baseline from the top edge of the page.
    pub y: f32,
}

/// The text layer of one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageText {
    /// Page width in page units.
    pub width: f32,
    /// Page height in page units.
    pub height: f32,
    /// Words in content-stream order.
    pub words: Vec<TextWord>,
}

/// Horizontal gap, in ems, that ends a word.
const WORD_GAP_EM: f64 = 0.3;

/// One glyph in top-down page coordinates.
#[derive(Debug, Clone)]
struct Glyph {
    text: String,
    x: f64,
    y: f64,
    advance: f64,
    size: f64,
}

/// Output device that records glyph positions for a single page.
#[derive(Debug, Default)]
struct WordCollector {
    origin: (f64, f64),
    width: f64,
    height: f64,
    glyphs: Vec<Glyph>,
}

impl OutputDev for WordCollector {
    fn begin_page(
        &mut self,
        _page_num: u32,
        media_box: &MediaBox,
        _art_box: Option<(f64, f64, f64, f64)>,
    ) -> std::result::Result<(), OutputError> {
        // Top-left corner of the page in user space.
        self.origin = (
            media_box.llx.min(media_box.urx),
            media_box.lly.max(media_box.ury),
        );
        self.width = (media_box.urx - media_box.llx).abs();
        self.height = (media_box.ury - media_box.lly).abs();
        Ok(())
    }

    fn end_page(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }

    fn output_character(
        &mut self,
        trm: &Transform,
        width: f64,
        _spacing: f64,
        font_size: f64,
        char: &str,
    ) -> std::result::Result<(), OutputError> {
        let scale = (trm.m11 * trm.m22 - trm.m12 * trm.m21).abs().sqrt();
        let size = font_size * scale;
        self.glyphs.push(Glyph {
            text: char.to_string(),
            x: trm.m31 - self.origin.0,
            y: self.origin.1 - trm.m32,
            advance: width * size,
            size,
        });
        Ok(())
    }

    fn begin_word(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }

    fn end_word(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }

    fn end_line(&mut self) -> std::result::Result<(), OutputError> {
        Ok(())
    }
}

impl WordCollector {
    fn finish(self) -> PageText {
        PageText {
            width: self.width as f32,
            height: self.height as f32,
            words: group_words(&self.glyphs),
        }
    }
}

/// Read the positioned words of one page (0-based).
pub fn read_page_text(doc: &Document, page: u32) -> Result<PageText> {
    let mut collector = WordCollector::default();

    // The interpreter asserts on some malformed font and page dictionaries.
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::output_doc_page(doc, &mut collector, page + 1)
    }));
    match outcome {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return Err(PdfError::TextExtraction(e.to_string())),
        Err(_) => {
            return Err(PdfError::TextExtraction(format!(
                "text layer of page {} could not be interpreted",
                page
            )));
        }
    }

    let text = collector.finish();
    trace!("Read {} words from page {}", text.words.len(), page);
    Ok(text)
}

/// Join glyphs into words. Whitespace, a baseline change, or a horizontal
/// gap wider than `WORD_GAP_EM` starts a new word.
fn group_words(glyphs: &[Glyph]) -> Vec<TextWord> {
    let mut words = Vec::new();
    let mut current: Option<TextWord> = None;
    let mut last: Option<&Glyph> = None;

    for glyph in glyphs {
        let visible: String = glyph
            .text
            .chars()
            .filter(|c| !c.is_whitespace() && !c.is_control())
            .collect();
        if glyph.text.is_empty() {
            // Unmapped code: keeps its advance but adds no text.
            last = Some(glyph);
            continue;
        }
        if visible.is_empty() {
            words.extend(current.take());
            last = None;
            continue;
        }

        if let Some(prev) = last {
            let same_line = (glyph.y - prev.y).abs() <= prev.size * 0.5;
            let gap = glyph.x - (prev.x + prev.advance);
            if !same_line || gap > prev.size * WORD_GAP_EM || gap < -prev.size {
                words.extend(current.take());
            }
        }

        current
            .get_or_insert_with(|| TextWord {
                text: String::new(),
                x: glyph.x as f32,
                y: glyph.y as f32,
            })
            .text
            .push_str(&visible);
        last = Some(glyph);
    }

    words.extend(current);
    words
}
