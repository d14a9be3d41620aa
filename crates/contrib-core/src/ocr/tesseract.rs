//! Tesseract backend through `leptess`. Requires system libtesseract and
//! libleptonica.

use std::path::{Path, PathBuf};

use leptess::LepTess;
use tracing::debug;

use crate::error::OcrError;

use super::TextRecognizer;

/// Runs Tesseract with a fresh engine per page.
pub struct TesseractRecognizer {
    data_path: Option<PathBuf>,
}

impl TesseractRecognizer {
    pub fn new(data_path: Option<PathBuf>) -> Self {
        Self { data_path }
    }
}

impl TextRecognizer for TesseractRecognizer {
    fn recognize(&self, image_path: &Path, language: &str) -> Result<String, OcrError> {
        let data_path = self
            .data_path
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned());

        let mut lt = LepTess::new(data_path.as_deref(), language)
            .map_err(|e| OcrError::UnsupportedLanguage(format!("{}: {}", language, e)))?;

        lt.set_image(image_path).map_err(|e| OcrError::InvalidImage {
            path: image_path.display().to_string(),
            reason: e.to_string(),
        })?;

        debug!("Running tesseract ({}) on {}", language, image_path.display());

        lt.get_utf8_text()
            .map_err(|e| OcrError::Recognition(e.to_string()))
    }
}
