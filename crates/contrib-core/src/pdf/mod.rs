//! Splitting ledger PDFs into page images.

mod extractor;

pub use extractor::PdfImageExtractor;

use std::path::{Path, PathBuf};

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Writes the page images of a PDF into a directory.
pub trait ImageExtractor {
    /// Extract images from `pdf_path` into `output_dir`, creating the
    /// directory if needed. Returns the written files in page order.
    fn extract_images(&self, pdf_path: &Path, output_dir: &Path) -> Result<Vec<PathBuf>>;
}
