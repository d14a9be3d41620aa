//! Recognizer that reads text already produced by an earlier OCR run.

use std::path::{Path, PathBuf};

use tracing::trace;

use crate::error::OcrError;

use super::TextRecognizer;

/// Reads the page text from a `.txt` file next to each image
/// (`page_05.png` -> `page_05.txt`). The language is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct SidecarTextRecognizer;

impl SidecarTextRecognizer {
    pub fn new() -> Self {
        Self
    }

    /// Path of the text file for `image_path`.
    pub fn sidecar_path(image_path: &Path) -> PathBuf {
        image_path.with_extension("txt")
    }
}

impl TextRecognizer for SidecarTextRecognizer {
    fn recognize(&self, image_path: &Path, _language: &str) -> Result<String, OcrError> {
        let path = Self::sidecar_path(image_path);
        trace!("Reading page text from {}", path.display());

        std::fs::read_to_string(&path).map_err(|e| OcrError::InvalidImage {
            path: image_path.display().to_string(),
            reason: format!("no readable text file {}: {}", path.display(), e),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_reads_text_next_to_image() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("page_05.png"), b"png").unwrap();
        fs::write(dir.path().join("page_05.txt"), "01/02/2020 Doe, Jane 100\n").unwrap();

        let text = SidecarTextRecognizer::new()
            .recognize(&dir.path().join("page_05.png"), "eng")
            .unwrap();
        assert_eq!(text, "01/02/2020 Doe, Jane 100\n");
    }

    #[test]
    fn test_missing_text_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SidecarTextRecognizer::new()
            .recognize(&dir.path().join("page_06.png"), "eng")
            .unwrap_err();
        assert!(matches!(err, OcrError::InvalidImage { reason, .. } if reason.contains("page_06.txt")));
    }
}
