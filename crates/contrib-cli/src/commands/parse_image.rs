//! Parse-image command - OCR one ledger page and print its records as JSON.

use std::path::PathBuf;

use clap::Args;
use tracing::{info, warn};

use contrib_core::{recognizer_from_config, PageExtractor, TextRecognizer};

use super::OcrArgs;

/// Arguments for the parse-image command.
#[derive(Args)]
pub struct ParseImageArgs {
    /// Page image to recognize
    #[arg(long)]
    image_file_path: PathBuf,

    /// Print compact JSON instead of pretty JSON
    #[arg(long)]
    compact: bool,

    #[command(flatten)]
    ocr: OcrArgs,
}

pub async fn run(args: ParseImageArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = super::load_config(config_path)?;
    args.ocr.apply(&mut config.ocr);

    if !args.image_file_path.is_file() {
        anyhow::bail!("Image file not found: {}", args.image_file_path.display());
    }

    info!(
        "Parsing {} with the {} backend",
        args.image_file_path.display(),
        config.ocr.backend
    );

    let recognizer = recognizer_from_config(&config.ocr)?;
    let text = recognizer.recognize(&args.image_file_path, &config.ocr.language)?;
    let extraction = PageExtractor::new().extract(&text);

    for skipped in &extraction.skipped {
        warn!(
            "Skipping anchor at line {} ({:?}): {}",
            skipped.position, skipped.line, skipped.reason
        );
    }

    let output = if config.output.pretty_json && !args.compact {
        serde_json::to_string_pretty(&extraction.records)?
    } else {
        serde_json::to_string(&extraction.records)?
    };
    println!("{}", output);

    Ok(())
}
