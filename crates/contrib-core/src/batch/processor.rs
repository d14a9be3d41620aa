//! Batch driver: OCR every page image of a directory and stream the records
//! of each page to a sink.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;

use tracing::{debug, error, info, warn};

use crate::error::Result;
use crate::ledger::{PageExtraction, PageExtractor};
use crate::models::config::ContribConfig;
use crate::ocr::TextRecognizer;

use super::sink::RecordSink;
use super::source::{DirectoryPageSource, PageSource};

/// Counters for a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Entries returned by the listing.
    pub listed: usize,
    /// Leading entries skipped.
    pub skipped_entries: usize,
    /// Pages recognized and flushed to the sink.
    pub pages: usize,
    /// Records written.
    pub records: usize,
    /// Anchors dropped for an incomplete window or anchor line.
    pub skipped_anchors: usize,
}

/// Processes the page images of a directory.
pub struct BatchProcessor<P: PageSource> {
    source: P,
    extractor: PageExtractor,
    skip_entries: usize,
    jobs: usize,
    language: String,
}

impl BatchProcessor<DirectoryPageSource> {
    /// Build a processor from the batch and OCR sections of the config.
    pub fn from_config(config: &ContribConfig) -> Self {
        Self::new(DirectoryPageSource::from_config(&config.batch))
            .with_skip_entries(config.batch.skip_entries)
            .with_jobs(config.batch.jobs)
            .with_language(config.ocr.language.clone())
    }
}

impl<P: PageSource> BatchProcessor<P> {
    /// Create a processor with the default skip count, one job and English.
    pub fn new(source: P) -> Self {
        let defaults = ContribConfig::default();
        Self {
            source,
            extractor: PageExtractor::new(),
            skip_entries: defaults.batch.skip_entries,
            jobs: defaults.batch.jobs,
            language: defaults.ocr.language,
        }
    }

    /// Number of leading listing entries to skip.
    pub fn with_skip_entries(mut self, skip_entries: usize) -> Self {
        self.skip_entries = skip_entries;
        self
    }

    /// Number of parallel OCR workers.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Language code passed to the recognizer.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// List the directory and drop the leading entries.
    fn pages(&self, dir: &Path, summary: &mut BatchSummary) -> Result<Vec<PathBuf>> {
        debug!("Iterating over files in {}", dir.display());

        let listed = self.source.list_pages(dir)?;
        summary.listed = listed.len();
        summary.skipped_entries = self.skip_entries.min(listed.len());

        for path in listed.iter().take(self.skip_entries) {
            debug!("Skipping leading entry {}", path.display());
        }

        Ok(listed.into_iter().skip(self.skip_entries).collect())
    }

    /// Process every page in listing order with a single recognizer.
    ///
    /// Each page is flushed to the sink before the next one is recognized.
    /// The first OCR or sink failure aborts the batch.
    pub fn run<R, S>(&self, dir: &Path, recognizer: &R, sink: &mut S) -> Result<BatchSummary>
    where
        R: TextRecognizer + ?Sized,
        S: RecordSink + ?Sized,
    {
        let mut summary = BatchSummary::default();
        let pages = self.pages(dir, &mut summary)?;

        info!("Processing {} pages from {}", pages.len(), dir.display());

        self.run_sequential(&pages, recognizer, sink, summary)
    }

    fn run_sequential<R, S>(
        &self,
        pages: &[PathBuf],
        recognizer: &R,
        sink: &mut S,
        mut summary: BatchSummary,
    ) -> Result<BatchSummary>
    where
        R: TextRecognizer + ?Sized,
        S: RecordSink + ?Sized,
    {
        for path in pages {
            let extraction = recognize_page(recognizer, self.extractor, &self.language, path)
                .inspect_err(|e| error!("Failed to process {}: {}", path.display(), e))?;
            flush_page(path, &extraction, sink, &mut summary)?;
        }

        Ok(summary)
    }

    /// Process pages on the configured number of workers.
    ///
    /// Every worker builds its own recognizer with `make_recognizer`; no
    /// recognizer is built when there is nothing to process. Results are
    /// written by the calling thread in listing order. After the first
    /// failure workers stop taking pages; rows already flushed stay written.
    pub fn run_parallel<F, R, S>(
        &self,
        dir: &Path,
        make_recognizer: F,
        sink: &mut S,
    ) -> Result<BatchSummary>
    where
        F: Fn() -> Result<R> + Sync,
        R: TextRecognizer,
        S: RecordSink + ?Sized,
    {
        let mut summary = BatchSummary::default();
        let pages = self.pages(dir, &mut summary)?;

        if pages.is_empty() {
            info!("No pages to process in {}", dir.display());
            return Ok(summary);
        }

        if self.jobs <= 1 {
            info!("Processing {} pages from {}", pages.len(), dir.display());
            let recognizer = make_recognizer()?;
            return self.run_sequential(&pages, &recognizer, sink, summary);
        }

        let workers = self.jobs.min(pages.len());

        info!(
            "Processing {} pages from {} on {} workers",
            pages.len(),
            dir.display(),
            workers
        );

        let next_page = AtomicUsize::new(0);
        let cancelled = AtomicBool::new(false);
        let extractor = self.extractor;
        let language = self.language.as_str();

        std::thread::scope(|scope| {
            let (tx, rx) = mpsc::channel::<Result<(usize, PageExtraction)>>();

            for worker in 0..workers {
                let tx = tx.clone();
                let (pages, next_page, cancelled, make_recognizer) =
                    (&pages, &next_page, &cancelled, &make_recognizer);

                scope.spawn(move || {
                    let recognizer = match make_recognizer() {
                        Ok(recognizer) => recognizer,
                        Err(e) => {
                            let _ = tx.send(Err(e));
                            return;
                        }
                    };
                    debug!("Worker {} started", worker);

                    while !cancelled.load(Ordering::SeqCst) {
                        let index = next_page.fetch_add(1, Ordering::SeqCst);
                        let Some(path) = pages.get(index) else {
                            break;
                        };

                        let message = recognize_page(&recognizer, extractor, language, path)
                            .map(|extraction| (index, extraction))
                            .inspect_err(|e| error!("Failed to process {}: {}", path.display(), e));
                        if tx.send(message).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(tx);

            let mut pending = BTreeMap::new();
            let mut next_write = 0;
            for message in rx {
                let (index, extraction) = match message {
                    Ok(result) => result,
                    Err(e) => {
                        cancelled.store(true, Ordering::SeqCst);
                        return Err(e);
                    }
                };

                pending.insert(index, extraction);
                while let Some(extraction) = pending.remove(&next_write) {
                    if let Err(e) = flush_page(&pages[next_write], &extraction, sink, &mut summary) {
                        cancelled.store(true, Ordering::SeqCst);
                        return Err(e);
                    }
                    next_write += 1;
                }
            }

            Ok(summary)
        })
    }
}

fn recognize_page<R: TextRecognizer + ?Sized>(
    recognizer: &R,
    extractor: PageExtractor,
    language: &str,
    path: &Path,
) -> Result<PageExtraction> {
    debug!("Parsing file {}", path.display());
    let text = recognizer.recognize(path, language)?;
    Ok(extractor.extract(&text))
}

fn flush_page<S: RecordSink + ?Sized>(
    path: &Path,
    extraction: &PageExtraction,
    sink: &mut S,
    summary: &mut BatchSummary,
) -> Result<()> {
    for skipped in &extraction.skipped {
        warn!(
            "{}: skipping anchor at line {} ({:?}): {}",
            path.display(),
            skipped.position,
            skipped.line,
            skipped.reason
        );
    }

    sink.write_page(&extraction.records)?;

    summary.pages += 1;
    summary.records += extraction.records.len();
    summary.skipped_anchors += extraction.skipped.len();

    debug!(
        "{}: {} records from {} lines",
        path.display(),
        extraction.records.len(),
        extraction.line_count
    );

    Ok(())
}
