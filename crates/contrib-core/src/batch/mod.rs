//! Batch processing of a directory of ledger page images.

mod processor;
mod sink;
mod source;

pub use processor::{BatchProcessor, BatchSummary};
pub use sink::{CsvRecordSink, MemorySink, RecordSink};
pub use source::{DirectoryPageSource, PageSource};
