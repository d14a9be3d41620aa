//! Pure Rust OCR engine wrapper using `pure-onnx-ocr`.

use std::path::Path;
use std::time::Instant;

use image::GenericImageView;
use tracing::{debug, info};

use crate::error::OcrError;

use super::{reading_order_text, TextBox, TextRecognizer};

/// Language codes served by the Latin recognition model.
const LATIN_LANGUAGES: [&str; 3] = ["eng", "en", "latin"];

/// OCR engine backed by `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).
pub struct OnnxRecognizer {
    engine: pure_onnx_ocr::engine::OcrEngine,
}

impl OnnxRecognizer {
    /// Create an engine from model files in a directory.
    pub fn from_dir(model_dir: &Path) -> Result<Self, OcrError> {
        let det_path = model_dir.join("det.onnx");
        let rec_path = model_dir.join("latin_rec.onnx");
        let dict_path = model_dir.join("latin_dict.txt");

        for path in [&det_path, &rec_path, &dict_path] {
            if !path.exists() {
                return Err(OcrError::ModelLoad(format!(
                    "missing model file {}",
                    path.display()
                )));
            }
        }

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| OcrError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", model_dir.display());

        Ok(Self { engine })
    }
}

impl TextRecognizer for OnnxRecognizer {
    fn recognize(&self, image_path: &Path, language: &str) -> Result<String, OcrError> {
        if !LATIN_LANGUAGES.contains(&language.to_lowercase().as_str()) {
            return Err(OcrError::UnsupportedLanguage(language.to_string()));
        }

        let start = Instant::now();
        let image = image::open(image_path).map_err(|e| OcrError::InvalidImage {
            path: image_path.display().to_string(),
            reason: e.to_string(),
        })?;
        let (width, height) = image.dimensions();

        debug!("Processing image {}: {}x{}", image_path.display(), width, height);

        let results = self
            .engine
            .run_from_image(&image)
            .map_err(|e| OcrError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        let mut boxes: Vec<TextBox> = results
            .iter()
            .map(|r| TextBox {
                bbox: polygon_to_bbox(&r.bounding_box),
                text: r.text.replace("[UNK]", " "),
            })
            .collect();

        let text = reading_order_text(&mut boxes);

        debug!(
            "OCR complete: {} text boxes in {}ms",
            boxes.len(),
            start.elapsed().as_millis()
        );

        Ok(text)
    }
}

/// Convert a `Polygon<f64>` to our `[f32; 8]` bbox format.
fn polygon_to_bbox(polygon: &pure_onnx_ocr::Polygon<f64>) -> [f32; 8] {
    let mut bbox = [0.0f32; 8];
    for (i, coord) in polygon.exterior().coords().take(4).enumerate() {
        bbox[i * 2] = coord.x as f32;
        bbox[i * 2 + 1] = coord.y as f32;
    }
    bbox
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_models() {
        let dir = tempfile::tempdir().unwrap();
        let err = OnnxRecognizer::from_dir(dir.path()).err().unwrap();
        assert!(matches!(err, OcrError::ModelLoad(msg) if msg.contains("det.onnx")));
    }
}
