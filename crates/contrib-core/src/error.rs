//! Error types for the contrib-core library.

use thiserror::Error;

/// Main error type for the contrib library.
#[derive(Error, Debug)]
pub enum ContribError {
    /// OCR processing error.
    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    /// CSV output error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Malformed configuration file.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration value out of range.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract or write images.
    #[error("failed to extract images: {0}")]
    ImageExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Reading the PDF or writing into the output directory failed.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors related to OCR processing.
#[derive(Error, Debug)]
pub enum OcrError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// The image could not be read or decoded.
    #[error("invalid image {path}: {reason}")]
    InvalidImage { path: String, reason: String },

    /// The engine does not support the requested language.
    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// The engine failed while recognizing text.
    #[error("text recognition failed: {0}")]
    Recognition(String),

    /// The configured backend was not compiled into this build.
    #[error("OCR backend '{0}' is not available in this build")]
    BackendUnavailable(String),
}

/// Errors raised for a single ledger anchor line.
///
/// Both variants are recoverable: the page extractor skips the anchor and
/// keeps scanning.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The anchor sits too close to the end of the page for its window.
    #[error("anchor at line {anchor} needs line {index} but the page has {line_count} lines")]
    OutOfRange {
        anchor: usize,
        /// Absolute index of the first missing line.
        index: usize,
        line_count: usize,
    },

    /// The anchor line does not carry date, last name, first name and amount.
    #[error("anchor at line {position} has {token_count} tokens, expected at least 4")]
    MalformedAnchorLine { position: usize, token_count: usize },
}

/// Result type for the contrib library.
pub type Result<T> = std::result::Result<T, ContribError>;
