//! Configuration structures for the ledger pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ContribError, Result};

/// Main configuration for the contrib pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContribConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Batch directory processing configuration.
    pub batch: BatchConfig,

    /// Output configuration.
    pub output: OutputConfig,

    /// PDF image extraction configuration.
    pub pdf: PdfConfig,
}

/// Which text recognition engine to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrBackendKind {
    /// Pure Rust ONNX engine (PaddleOCR models).
    Onnx,
    /// System Tesseract through leptess.
    Tesseract,
    /// Pre-recognized `.txt` files next to each image.
    Text,
}

impl std::fmt::Display for OcrBackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Onnx => write!(f, "onnx"),
            Self::Tesseract => write!(f, "tesseract"),
            Self::Text => write!(f, "text"),
        }
    }
}

/// OCR engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Recognition backend.
    pub backend: OcrBackendKind,

    /// Language code handed to the recognizer.
    pub language: String,

    /// Directory containing `det.onnx`, `latin_rec.onnx` and `latin_dict.txt`.
    pub model_dir: PathBuf,

    /// Tesseract data directory (system default when unset).
    pub tessdata_path: Option<PathBuf>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            backend: OcrBackendKind::Onnx,
            language: "eng".to_string(),
            model_dir: PathBuf::from("models"),
            tessdata_path: None,
        }
    }
}

/// Batch directory processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Number of leading directory entries to skip (cover and instruction pages).
    pub skip_entries: usize,

    /// Sort the listing by file name before skipping.
    pub sort_entries: bool,

    /// File extensions treated as page images (lowercase, no dot).
    pub extensions: Vec<String>,

    /// Number of parallel OCR workers.
    pub jobs: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            skip_entries: 5,
            sort_entries: true,
            extensions: ["png", "jpg", "jpeg", "tif", "tiff", "bmp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            jobs: 1,
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default CSV path for directory runs.
    pub csv_path: PathBuf,

    /// Pretty-print JSON for single-image runs.
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("./output.csv"),
            pretty_json: true,
        }
    }
}

/// Image format written by the PDF image extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageImageFormat {
    Png,
    Jpeg,
}

impl PageImageFormat {
    /// File extension for this format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    /// Matching `image` crate format.
    pub fn image_format(&self) -> image::ImageFormat {
        match self {
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

/// PDF image extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Format of the written page images.
    pub image_format: PageImageFormat,

    /// File name prefix for written page images.
    pub file_prefix: String,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            image_format: PageImageFormat::Png,
            file_prefix: "page".to_string(),
        }
    }
}

impl ContribConfig {
    /// Load and validate configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Reject values no run can work with.
    pub fn validate(&self) -> Result<()> {
        if self.batch.jobs == 0 {
            return Err(ContribError::Config("batch.jobs must be at least 1".to_string()));
        }
        if self.ocr.language.trim().is_empty() {
            return Err(ContribError::Config("ocr.language must not be empty".to_string()));
        }
        if self.batch.extensions.iter().any(|ext| ext.starts_with('.')) {
            return Err(ContribError::Config(
                "batch.extensions are listed without a leading dot".to_string(),
            ));
        }
        Ok(())
    }
}
