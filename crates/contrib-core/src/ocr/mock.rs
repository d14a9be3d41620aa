//! Deterministic recognizer for tests.

use std::collections::HashMap;
use std::path::Path;

use crate::error::OcrError;

use super::TextRecognizer;

/// Returns preset text keyed by image file name, or a fallback text.
#[derive(Debug, Clone, Default)]
pub struct MockRecognizer {
    pages: HashMap<String, String>,
    fallback: Option<String>,
}

impl MockRecognizer {
    /// Return `text` for every image.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            pages: HashMap::new(),
            fallback: Some(text.into()),
        }
    }

    /// Return `text` for the image named `file_name`.
    pub fn with_page(mut self, file_name: impl Into<String>, text: impl Into<String>) -> Self {
        self.pages.insert(file_name.into(), text.into());
        self
    }
}

impl TextRecognizer for MockRecognizer {
    fn recognize(&self, image_path: &Path, _language: &str) -> Result<String, OcrError> {
        let name = image_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        self.pages
            .get(name)
            .or(self.fallback.as_ref())
            .cloned()
            .ok_or_else(|| OcrError::InvalidImage {
                path: image_path.display().to_string(),
                reason: "no preset text".to_string(),
            })
    }
}
