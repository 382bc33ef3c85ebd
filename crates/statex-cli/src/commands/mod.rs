//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod extract;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use statex_core::models::config::StatexConfig;
use statex_core::{PureOcrEngine, StatementExtractor};

/// Extensions accepted as filings.
pub const SUPPORTED_EXTENSIONS: [&str; 7] = ["pdf", "png", "jpg", "jpeg", "tif", "tiff", "bmp"];

/// Lower-cased extension of `path`, if it is a supported filing type.
pub fn supported_extension(path: &Path) -> Option<String> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    SUPPORTED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Load the configuration from `--config`, the user config file, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<StatexConfig> {
    if let Some(path) = config_path {
        return Ok(StatexConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using config from {}", default_path.display());
        return Ok(StatexConfig::from_file(&default_path)?);
    }

    Ok(StatexConfig::default())
}

/// Build an extractor, attaching the OCR engine when it is enabled and its
/// models can be loaded. Without models, scanned pages are skipped.
pub fn build_extractor(
    mut config: StatexConfig,
    model_dir: Option<PathBuf>,
    no_ocr: bool,
) -> StatementExtractor {
    if no_ocr {
        config.ocr.enabled = false;
    }
    if let Some(dir) = model_dir {
        config.ocr.model_dir = dir;
    }

    if !config.ocr.enabled {
        return StatementExtractor::new(config);
    }

    match PureOcrEngine::from_config(&config.ocr) {
        Ok(engine) => StatementExtractor::new(config).with_ocr(Arc::new(engine)),
        Err(e) => {
            warn!("OCR unavailable, scanned pages will be skipped: {}", e);
            StatementExtractor::new(config)
        }
    }
}
