//! Extract-contribution-images command - split a scanned PDF into page images.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{info, warn};

use contrib_core::models::config::PageImageFormat;
use contrib_core::{ImageExtractor, PdfImageExtractor};

/// Arguments for the extract-contribution-images command.
#[derive(Args)]
pub struct ExtractImagesArgs {
    /// PDF file to read
    #[arg(long)]
    pdf_file_path: PathBuf,

    /// Directory the page images are written to (created if missing)
    #[arg(long)]
    image_output_path: PathBuf,

    /// Image format of the written pages
    #[arg(short, long, value_enum)]
    format: Option<ImageFormatArg>,

    /// File name prefix of the written pages
    #[arg(long)]
    prefix: Option<String>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
enum ImageFormatArg {
    Png,
    Jpeg,
}

impl From<ImageFormatArg> for PageImageFormat {
    fn from(arg: ImageFormatArg) -> Self {
        match arg {
            ImageFormatArg::Png => PageImageFormat::Png,
            ImageFormatArg::Jpeg => PageImageFormat::Jpeg,
        }
    }
}

pub async fn run(args: ExtractImagesArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut config = super::load_config(config_path)?;

    if let Some(format) = args.format {
        config.pdf.image_format = format.into();
    }
    if let Some(prefix) = args.prefix {
        config.pdf.file_prefix = prefix;
    }

    if !args.pdf_file_path.is_file() {
        anyhow::bail!("PDF file not found: {}", args.pdf_file_path.display());
    }

    info!(
        "Extracting images from {} into {}",
        args.pdf_file_path.display(),
        args.image_output_path.display()
    );

    let extractor = PdfImageExtractor::new(config.pdf);
    let written = extractor.extract_images(&args.pdf_file_path, &args.image_output_path)?;

    if written.is_empty() {
        warn!("No decodable page images in {}", args.pdf_file_path.display());
    }

    println!(
        "{} Extracted {} images to {} in {:?}",
        style("✓").green(),
        written.len(),
        args.image_output_path.display(),
        start.elapsed()
    );

    Ok(())
}
