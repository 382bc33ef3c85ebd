//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, StatexError};

/// Main configuration for the statex pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatexConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Statement extraction configuration.
    pub extraction: ExtractionConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to scan from the start of a document.
    pub max_pages: u32,

    /// The text layer is used only when a page yields more tokens than this.
    pub min_digital_tokens: usize,

    /// Linear upscaling applied to a page image before OCR.
    pub render_scale: f32,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 61,
            min_digital_tokens: 10,
            render_scale: 2.0,
        }
    }
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Fall back to OCR for pages without a usable text layer.
    pub enabled: bool,

    /// Per-page OCR budget in milliseconds (0 = unbounded).
    pub timeout_ms: u64,

    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,

    /// Keep `[UNK]` markers emitted by the recognizer instead of blanking them.
    pub keep_unk: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_ms: 30_000,
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
            keep_unk: false,
        }
    }
}

/// Statement extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum vertical gap between consecutive tokens of a row, as a
    /// fraction of page height.
    pub row_tolerance: f32,

    /// Only tokens at or right of this page-width fraction carry values.
    pub value_column_start: f32,

    /// Values with a smaller magnitude are treated as note/page references.
    pub min_magnitude: f64,

    /// Values strictly between `year_floor` and `year_ceiling` are year labels.
    pub year_floor: f64,

    /// See `year_floor`.
    pub year_ceiling: f64,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            row_tolerance: 0.012,
            value_column_start: 0.5,
            min_magnitude: 50.0,
            year_floor: 2018.0,
            year_ceiling: 2030.0,
        }
    }
}

impl StatexConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| StatexError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| StatexError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
