//! Core library for contribution ledger OCR processing.
//!
//! This crate provides:
//! - Ledger page parsing (anchor lines, address windows, record assembly)
//! - Batch processing of page image directories with streaming output
//! - Text recognition backends (pure Rust ONNX, optional Tesseract)
//! - PDF page image extraction

pub mod batch;
pub mod error;
pub mod ledger;
pub mod models;
pub mod ocr;
pub mod pdf;

pub use batch::{BatchProcessor, BatchSummary, CsvRecordSink, MemorySink, RecordSink};
pub use error::{ContribError, ExtractionError, OcrError, PdfError, Result};
pub use ledger::{extract_page, PageExtraction, PageExtractor, SkippedAnchor};
pub use models::config::ContribConfig;
pub use models::record::ContributionRecord;
pub use ocr::{recognizer_from_config, TextRecognizer};
pub use pdf::{ImageExtractor, PdfImageExtractor};
