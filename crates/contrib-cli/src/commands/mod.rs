//! CLI subcommands.

pub mod config;
pub mod extract_images;
pub mod parse_dir;
pub mod parse_image;

use std::path::{Path, PathBuf};

use clap::Args;
use tracing::debug;

use contrib_core::models::config::{ContribConfig, OcrBackendKind, OcrConfig};

/// Default location of the user configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("contrib")
        .join("config.json")
}

/// Load the configuration from `--config`, falling back to the user config
/// file and then to the built-in defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<ContribConfig> {
    if let Some(path) = config_path {
        debug!("Loading config from {}", path);
        return ContribConfig::from_file(Path::new(path))
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {}", path, e));
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Loading config from {}", default_path.display());
        return Ok(ContribConfig::from_file(&default_path)?);
    }

    Ok(ContribConfig::default())
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum BackendArg {
    /// Pure Rust ONNX engine
    Onnx,
    /// System Tesseract (requires the `tesseract` feature)
    Tesseract,
    /// Read `<image>.txt` files written by an earlier OCR run
    Text,
}

impl From<BackendArg> for OcrBackendKind {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Onnx => OcrBackendKind::Onnx,
            BackendArg::Tesseract => OcrBackendKind::Tesseract,
            BackendArg::Text => OcrBackendKind::Text,
        }
    }
}

/// OCR overrides shared by the image commands.
#[derive(Args, Debug)]
pub struct OcrArgs {
    /// OCR backend
    #[arg(long, value_enum)]
    backend: Option<BackendArg>,

    /// Recognition language code
    #[arg(short, long)]
    language: Option<String>,

    /// Model directory for the ONNX backend
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Tesseract data directory
    #[arg(long)]
    tessdata: Option<PathBuf>,
}

impl OcrArgs {
    /// Apply the flags given on the command line on top of `config`.
    pub fn apply(&self, config: &mut OcrConfig) {
        if let Some(backend) = self.backend {
            config.backend = backend.into();
        }
        if let Some(language) = &self.language {
            config.language = language.clone();
        }
        if let Some(model_dir) = &self.model_dir {
            config.model_dir = model_dir.clone();
        }
        if let Some(tessdata) = &self.tessdata {
            config.tessdata_path = Some(tessdata.clone());
        }
    }
}
