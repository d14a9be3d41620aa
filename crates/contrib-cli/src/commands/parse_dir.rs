//! Parse-images-dir command - OCR a directory of ledger pages into one CSV.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};

use contrib_core::models::record::ContributionRecord;
use contrib_core::{
    recognizer_from_config, BatchProcessor, ContribError, CsvRecordSink, RecordSink,
};

use super::OcrArgs;

/// Arguments for the parse-images-dir command.
#[derive(Args)]
pub struct ParseDirArgs {
    /// Directory of page images
    #[arg(long)]
    image_dir: PathBuf,

    /// CSV output file (default: ./output.csv)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of leading directory entries to skip (default: 5)
    #[arg(long)]
    skip: Option<usize>,

    /// Number of parallel OCR workers
    #[arg(short = 'j', long)]
    jobs: Option<usize>,

    /// Keep the directory's native order instead of sorting by file name
    #[arg(long)]
    unsorted: bool,

    #[command(flatten)]
    ocr: OcrArgs,
}

/// Ticks a progress bar for every page written to the inner sink.
struct ProgressSink<S> {
    inner: S,
    progress: ProgressBar,
}

impl<S: RecordSink> RecordSink for ProgressSink<S> {
    fn write_page(&mut self, records: &[ContributionRecord]) -> contrib_core::Result<()> {
        self.inner.write_page(records)?;
        self.progress.inc(1);
        Ok(())
    }
}

pub async fn run(args: ParseDirArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let mut config = super::load_config(config_path)?;

    args.ocr.apply(&mut config.ocr);
    if let Some(skip) = args.skip {
        config.batch.skip_entries = skip;
    }
    if let Some(jobs) = args.jobs {
        config.batch.jobs = jobs;
    }
    if args.unsorted {
        config.batch.sort_entries = false;
    }
    let output = args.output.unwrap_or_else(|| config.output.csv_path.clone());

    if !args.image_dir.is_dir() {
        anyhow::bail!("Image directory not found: {}", args.image_dir.display());
    }

    info!(
        "Parsing {} into {} (skip {}, {} jobs)",
        args.image_dir.display(),
        output.display(),
        config.batch.skip_entries,
        config.batch.jobs
    );

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {pos} pages")?,
    );
    progress.enable_steady_tick(Duration::from_millis(100));

    let mut sink = ProgressSink {
        inner: CsvRecordSink::create(&output)?,
        progress: progress.clone(),
    };

    let processor = BatchProcessor::from_config(&config);
    let ocr_config = &config.ocr;
    let result = processor.run_parallel(
        &args.image_dir,
        || recognizer_from_config(ocr_config).map_err(ContribError::from),
        &mut sink,
    );

    let summary = match result {
        Ok(summary) => {
            progress.finish_and_clear();
            summary
        }
        Err(e) => {
            progress.abandon();
            error!(
                "Batch stopped; {} rows already written to {}",
                sink.inner.rows_written(),
                output.display()
            );
            return Err(e.into());
        }
    };

    println!(
        "{} Processed {} pages ({} entries listed, {} skipped) in {:?}",
        style("✓").green(),
        summary.pages,
        summary.listed,
        summary.skipped_entries,
        start.elapsed()
    );
    println!(
        "{} Wrote {} records to {}",
        style("✓").green(),
        summary.records,
        output.display()
    );
    if summary.skipped_anchors > 0 {
        println!(
            "{} {} incomplete entries skipped",
            style("⚠").yellow(),
            summary.skipped_anchors
        );
    }

    Ok(())
}
