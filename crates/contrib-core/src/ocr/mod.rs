//! Text recognition backends.
//!
//! The ledger pipeline only needs `image path + language -> text`, so every
//! engine sits behind [`TextRecognizer`].

mod mock;
#[cfg(feature = "native")]
mod onnx;
mod sidecar;
#[cfg(feature = "tesseract")]
mod tesseract;

pub use mock::MockRecognizer;
#[cfg(feature = "native")]
pub use onnx::OnnxRecognizer;
pub use sidecar::SidecarTextRecognizer;
#[cfg(feature = "tesseract")]
pub use tesseract::TesseractRecognizer;

use std::path::Path;

use crate::error::OcrError;
use crate::models::config::{OcrBackendKind, OcrConfig};

/// An OCR engine turning one page image into a text blob.
///
/// Instances are not assumed to be safe for concurrent use; parallel batch
/// workers each build their own.
pub trait TextRecognizer {
    /// Recognize the text of the image at `image_path` in `language`.
    fn recognize(&self, image_path: &Path, language: &str) -> Result<String, OcrError>;
}

impl<T: TextRecognizer + ?Sized> TextRecognizer for Box<T> {
    fn recognize(&self, image_path: &Path, language: &str) -> Result<String, OcrError> {
        (**self).recognize(image_path, language)
    }
}

impl<T: TextRecognizer + ?Sized> TextRecognizer for &T {
    fn recognize(&self, image_path: &Path, language: &str) -> Result<String, OcrError> {
        (**self).recognize(image_path, language)
    }
}

/// Build the recognizer selected in the configuration.
pub fn recognizer_from_config(config: &OcrConfig) -> Result<Box<dyn TextRecognizer>, OcrError> {
    match config.backend {
        OcrBackendKind::Onnx => onnx_recognizer(config),
        OcrBackendKind::Tesseract => tesseract_recognizer(config),
        OcrBackendKind::Text => Ok(Box::new(SidecarTextRecognizer::new())),
    }
}

#[cfg(feature = "native")]
fn onnx_recognizer(config: &OcrConfig) -> Result<Box<dyn TextRecognizer>, OcrError> {
    Ok(Box::new(OnnxRecognizer::from_dir(&config.model_dir)?))
}

#[cfg(not(feature = "native"))]
fn onnx_recognizer(_config: &OcrConfig) -> Result<Box<dyn TextRecognizer>, OcrError> {
    Err(OcrError::BackendUnavailable(OcrBackendKind::Onnx.to_string()))
}

#[cfg(feature = "tesseract")]
fn tesseract_recognizer(config: &OcrConfig) -> Result<Box<dyn TextRecognizer>, OcrError> {
    Ok(Box::new(TesseractRecognizer::new(config.tessdata_path.clone())))
}

#[cfg(not(feature = "tesseract"))]
fn tesseract_recognizer(_config: &OcrConfig) -> Result<Box<dyn TextRecognizer>, OcrError> {
    Err(OcrError::BackendUnavailable(OcrBackendKind::Tesseract.to_string()))
}

/// A recognized text fragment with its quadrilateral.
#[derive(Debug, Clone)]
pub struct TextBox {
    /// Bounding box coordinates (x1, y1, x2, y2, x3, y3, x4, y4).
    pub bbox: [f32; 8],

    /// Recognized text content.
    pub text: String,
}

impl TextBox {
    /// Get the axis-aligned bounding rectangle.
    pub fn rect(&self) -> (f32, f32, f32, f32) {
        let xs = [self.bbox[0], self.bbox[2], self.bbox[4], self.bbox[6]];
        let ys = [self.bbox[1], self.bbox[3], self.bbox[5], self.bbox[7]];

        let min_x = xs.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_x = xs.iter().cloned().fold(f32::NEG_INFINITY, f32::max);
        let min_y = ys.iter().cloned().fold(f32::INFINITY, f32::min);
        let max_y = ys.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        (min_x, min_y, max_x, max_y)
    }
}

/// Sort boxes top-to-bottom in 20 px bands, then left-to-right.
///
/// Fragments sharing a band are joined with a space so a ledger row split by
/// the detector comes back as one line; bands are joined with newlines.
pub fn reading_order_text(boxes: &mut [TextBox]) -> String {
    let band = |b: &TextBox| (b.rect().1 / 20.0) as i32;

    boxes.sort_by(|a, b| {
        band(a)
            .cmp(&band(b))
            .then_with(|| a.rect().0.partial_cmp(&b.rect().0).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines: Vec<String> = Vec::new();
    let mut current_band = None;
    for b in boxes.iter() {
        let row = band(b);
        match lines.last_mut() {
            Some(line) if current_band == Some(row) => {
                line.push(' ');
                line.push_str(&b.text);
            }
            _ => lines.push(b.text.clone()),
        }
        current_band = Some(row);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_box(x: f32, y: f32, text: &str) -> TextBox {
        TextBox {
            bbox: [x, y, x + 50.0, y, x + 50.0, y + 10.0, x, y + 10.0],
            text: text.to_string(),
        }
    }

    #[test]
    fn test_reading_order() {
        let mut boxes = vec![
            text_box(200.0, 45.0, "Springfield"),
            text_box(300.0, 2.0, "100"),
            text_box(0.0, 5.0, "01/02/2020"),
            text_box(0.0, 41.0, "123 Main St"),
        ];
        let text = reading_order_text(&mut boxes);
        assert_eq!(text, "01/02/2020 100\n123 Main St Springfield");
    }

    #[test]
    fn test_rect() {
        let b = text_box(10.0, 20.0, "x");
        assert_eq!(b.rect(), (10.0, 20.0, 60.0, 30.0));
    }

    #[test]
    fn test_boxed_recognizer_delegates() {
        let recognizer: Box<dyn TextRecognizer> = Box::new(MockRecognizer::new("hello"));
        assert_eq!(
            recognizer.recognize(Path::new("page.png"), "eng").unwrap(),
            "hello"
        );
    }

    #[cfg(not(feature = "tesseract"))]
    #[test]
    fn test_missing_backend_reported() {
        let config = OcrConfig {
            backend: OcrBackendKind::Tesseract,
            ..OcrConfig::default()
        };
        let err = recognizer_from_config(&config).err().unwrap();
        assert!(matches!(err, OcrError::BackendUnavailable(name) if name == "tesseract"));
    }

    #[test]
    fn test_text_backend_always_available() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("p.txt"), "page text").unwrap();

        let config = OcrConfig {
            backend: OcrBackendKind::Text,
            ..OcrConfig::default()
        };
        let recognizer = recognizer_from_config(&config).unwrap();
        assert_eq!(
            recognizer.recognize(&dir.path().join("p.png"), "eng").unwrap(),
            "page text"
        );
    }
}
