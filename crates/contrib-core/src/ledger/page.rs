//! Page-level extraction: scan every line, assemble a record per anchor.

use crate::error::ExtractionError;
use crate::models::record::ContributionRecord;

use super::assembler::assemble_record;
use super::lines::tokenize_lines;
use super::matcher::{classify, LineKind};
use super::window::extract_address;

/// An anchor line that could not be turned into a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedAnchor {
    /// Zero-based line index of the anchor.
    pub position: usize,
    /// Anchor line text.
    pub line: String,
    /// Why the anchor was skipped.
    pub reason: ExtractionError,
}

/// Result of extracting one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageExtraction {
    /// Records in page order.
    pub records: Vec<ContributionRecord>,
    /// Anchors dropped because their window or tokens were incomplete.
    pub skipped: Vec<SkippedAnchor>,
    /// Number of lines on the page.
    pub line_count: usize,
}

/// Turns a page of OCR text into contribution records.
#[derive(Debug, Clone, Copy, Default)]
pub struct PageExtractor;

impl PageExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract all records from a page.
    ///
    /// A failing anchor is recorded in [`PageExtraction::skipped`] and the
    /// scan continues with the next line.
    pub fn extract(&self, text: &str) -> PageExtraction {
        let lines = tokenize_lines(text);
        let mut extraction = PageExtraction {
            line_count: lines.len(),
            ..Default::default()
        };

        for line in &lines {
            if classify(line) == LineKind::Noise {
                continue;
            }

            let record = extract_address(&lines, line.position)
                .and_then(|address| assemble_record(line, address));

            match record {
                Ok(record) => extraction.records.push(record),
                Err(reason) => extraction.skipped.push(SkippedAnchor {
                    position: line.position,
                    line: line.text.to_string(),
                    reason,
                }),
            }
        }

        extraction
    }
}

/// Extract records from a page with the default extractor.
pub fn extract_page(text: &str) -> PageExtraction {
    PageExtractor::new().extract(text)
}
