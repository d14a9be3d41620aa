//! WASM bindings for contribution ledger extraction.
//!
//! OCR runs on the JavaScript side; this crate turns the recognized page text
//! into contribution records.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use contrib_core::ledger::{self, PageExtraction, PageExtractor};
use contrib_core::models::record::{ContributionRecord, CSV_HEADER};
use contrib_core::ocr::{reading_order_text, TextBox};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Extract contribution records from the OCR text of one ledger page.
#[wasm_bindgen]
pub fn extract_records(text: &str) -> Result<JsValue, JsValue> {
    to_js(&ledger::extract_page(text).records)
}

/// Whether a line starts a ledger entry (first token is an `MM/DD/YYYY` date).
#[wasm_bindgen]
pub fn is_ledger_anchor(line: &str) -> bool {
    ledger::is_anchor(line)
}

/// CSV header used for batch output.
#[wasm_bindgen]
pub fn csv_header() -> String {
    CSV_HEADER.join(",")
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[derive(Debug, Serialize)]
struct SkippedAnchorJs {
    position: usize,
    line: String,
    reason: String,
}

#[derive(Debug, Serialize)]
struct ExtractionJs {
    records: Vec<ContributionRecord>,
    skipped: Vec<SkippedAnchorJs>,
    line_count: usize,
}

impl From<PageExtraction> for ExtractionJs {
    fn from(extraction: PageExtraction) -> Self {
        Self {
            records: extraction.records,
            skipped: extraction
                .skipped
                .into_iter()
                .map(|s| SkippedAnchorJs {
                    position: s.position,
                    line: s.line,
                    reason: s.reason.to_string(),
                })
                .collect(),
            line_count: extraction.line_count,
        }
    }
}

/// Ledger extractor class for browser use.
#[wasm_bindgen]
pub struct LedgerExtractor {
    extractor: PageExtractor,
}

#[wasm_bindgen]
impl LedgerExtractor {
    /// Create a new ledger extractor.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            extractor: PageExtractor::new(),
        }
    }

    /// Extract records from page text.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&self.extractor.extract(text).records)
    }

    /// Extract records together with the anchors that were skipped and why.
    #[wasm_bindgen]
    pub fn extract_with_diagnostics(&self, text: &str) -> Result<JsValue, JsValue> {
        to_js(&ExtractionJs::from(self.extractor.extract(text)))
    }
}

impl Default for LedgerExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// OCR result from browser-side processing.
///
/// Collects positioned text fragments and rebuilds the page text in reading
/// order before extraction.
#[wasm_bindgen]
pub struct OcrPageJs {
    boxes: Vec<TextBox>,
}

#[wasm_bindgen]
impl OcrPageJs {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self { boxes: Vec::new() }
    }

    /// Add a recognized fragment with its quadrilateral.
    #[allow(clippy::too_many_arguments)]
    #[wasm_bindgen]
    pub fn add_box(
        &mut self,
        text: &str,
        x1: f32, y1: f32,
        x2: f32, y2: f32,
        x3: f32, y3: f32,
        x4: f32, y4: f32,
    ) {
        self.boxes.push(TextBox {
            bbox: [x1, y1, x2, y2, x3, y3, x4, y4],
            text: text.to_string(),
        });
    }

    /// Page text in reading order.
    #[wasm_bindgen]
    pub fn get_text(&self) -> String {
        let mut boxes = self.boxes.clone();
        reading_order_text(&mut boxes)
    }

    /// Extract records from this page.
    #[wasm_bindgen]
    pub fn extract_records(&self) -> Result<JsValue, JsValue> {
        extract_records(&self.get_text())
    }
}

impl Default for OcrPageJs {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    const PAGE: &str = "01/02/2020 Doe, Jane 100\nSUBTOTAL\n123 | Main St\n| Springfield";

    #[wasm_bindgen_test]
    fn test_is_ledger_anchor() {
        assert!(is_ledger_anchor("01/02/2020 Doe, Jane 100"));
        assert!(!is_ledger_anchor("1/2/2020 Doe, Jane 100"));
        assert!(!is_ledger_anchor("SUBTOTAL"));
    }

    #[wasm_bindgen_test]
    fn test_csv_header() {
        assert_eq!(csv_header(), "Date,First Name,Last Name,Amount,Address");
    }

    #[wasm_bindgen_test]
    fn test_extract_records() {
        let value = extract_records(PAGE).unwrap();
        let records: Vec<ContributionRecord> = serde_wasm_bindgen::from_value(value).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].last_name, "Doe");
        assert_eq!(records[0].address, "123  Main St  Springfield");
    }

    #[wasm_bindgen_test]
    fn test_diagnostics_report_skipped_anchor() {
        let extraction = ExtractionJs::from(PageExtractor::new().extract("01/02/2020 Doe, Jane 100\nSUBTOTAL"));
        assert!(extraction.records.is_empty());
        assert_eq!(extraction.skipped.len(), 1);
        assert_eq!(extraction.skipped[0].position, 0);
        assert!(extraction.skipped[0].reason.contains("needs line"));
    }

    #[wasm_bindgen_test]
    fn test_ocr_page_reading_order() {
        let mut page = OcrPageJs::new();
        page.add_box("Jane 100", 120.0, 0.0, 200.0, 0.0, 200.0, 10.0, 120.0, 10.0);
        page.add_box("01/02/2020 Doe,", 0.0, 0.0, 110.0, 0.0, 110.0, 10.0, 0.0, 10.0);
        page.add_box("SUBTOTAL", 0.0, 30.0, 80.0, 30.0, 80.0, 40.0, 0.0, 40.0);
        assert_eq!(page.get_text(), "01/02/2020 Doe, Jane 100\nSUBTOTAL");
    }
}
