//! A scanned page delivered as a plain image file.

use image::{DynamicImage, GenericImageView};

use super::{PageText, PdfProcessor, Result, upscale};
use crate::error::PdfError;

/// One-page document wrapping a raster image. It has no text layer, so every
/// extraction over it goes through OCR.
#[derive(Default)]
pub struct ImageDocument {
    image: Option<DynamicImage>,
}

impl ImageDocument {
    /// Create an empty image document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an already decoded image.
    pub fn from_image(image: DynamicImage) -> Self {
        Self { image: Some(image) }
    }

    fn image(&self, page: u32) -> Result<&DynamicImage> {
        match (&self.image, page) {
            (Some(image), 0) => Ok(image),
            (Some(_), _) => Err(PdfError::InvalidPage(page)),
            (None, _) => Err(PdfError::Parse("No image loaded".to_string())),
        }
    }
}

impl PdfProcessor for ImageDocument {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let image = image::load_from_memory(data).map_err(|e| PdfError::Parse(e.to_string()))?;
        self.image = Some(image);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        u32::from(self.image.is_some())
    }

    fn page_text(&self, page: u32) -> Result<PageText> {
        let (width, height) = self.image(page)?.dimensions();
        Ok(PageText {
            width: width as f32,
            height: height as f32,
            words: Vec::new(),
        })
    }

    fn render_page(&self, page: u32, scale: f32) -> Result<DynamicImage> {
        Ok(upscale(self.image(page)?.clone(), scale))
    }
}
