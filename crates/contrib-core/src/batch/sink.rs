//! Output sinks for extracted records.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::{ContribError, Result};
use crate::models::record::{ContributionRecord, CSV_HEADER};

/// Receives the records of one page at a time.
pub trait RecordSink {
    /// Append one page's records. Called for every processed page, also
    /// when the page produced no records.
    fn write_page(&mut self, records: &[ContributionRecord]) -> Result<()>;
}

impl<S: RecordSink + ?Sized> RecordSink for &mut S {
    fn write_page(&mut self, records: &[ContributionRecord]) -> Result<()> {
        (**self).write_page(records)
    }
}

/// CSV sink with the `Date,First Name,Last Name,Amount,Address` header.
///
/// The header is written on creation and the writer is flushed after every
/// page, so rows already written survive a failed batch.
pub struct CsvRecordSink<W: Write> {
    writer: csv::Writer<W>,
    rows: usize,
}

impl CsvRecordSink<File> {
    /// Create (or truncate) a CSV file.
    pub fn create(path: &Path) -> Result<Self> {
        Self::new(File::create(path)?)
    }
}

impl<W: Write> CsvRecordSink<W> {
    pub fn new(inner: W) -> Result<Self> {
        let mut writer = csv::Writer::from_writer(inner);
        writer.write_record(CSV_HEADER)?;
        writer.flush()?;
        Ok(Self { writer, rows: 0 })
    }

    /// Number of data rows written so far.
    pub fn rows_written(&self) -> usize {
        self.rows
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| ContribError::Io(e.into_error()))
    }
}

impl<W: Write> RecordSink for CsvRecordSink<W> {
    fn write_page(&mut self, records: &[ContributionRecord]) -> Result<()> {
        for record in records {
            self.writer.write_record(record.csv_fields())?;
            self.rows += 1;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// Keeps every page's records in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub pages: Vec<Vec<ContributionRecord>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All records in write order.
    pub fn records(&self) -> Vec<ContributionRecord> {
        self.pages.iter().flatten().cloned().collect()
    }
}

impl RecordSink for MemorySink {
    fn write_page(&mut self, records: &[ContributionRecord]) -> Result<()> {
        self.pages.push(records.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(i: usize, address: &str) -> ContributionRecord {
        ContributionRecord {
            date: format!("01/{:02}/2020", i + 1),
            last_name: format!("Last{}", i),
            first_name: format!("First{}", i),
            amount: format!("{}", (i + 1) * 10),
            address: address.to_string(),
        }
    }

    fn csv_text(pages: &[Vec<ContributionRecord>]) -> String {
        let mut sink = CsvRecordSink::new(Vec::new()).unwrap();
        for page in pages {
            sink.write_page(page).unwrap();
        }
        String::from_utf8(sink.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_header_only() {
        assert_eq!(csv_text(&[]), "Date,First Name,Last Name,Amount,Address\n");
    }

    #[test]
    fn test_line_and_field_counts() {
        let pages = vec![
            vec![record(0, "1 Main St Springfield"), record(1, "2 Oak Ave")],
            vec![],
            vec![record(2, "9 Elm Rd, Shelbyville")],
        ];
        let text = csv_text(&pages);

        assert_eq!(text.lines().count(), 4);

        let mut reader = csv::Reader::from_reader(text.as_bytes());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec!["Date", "First Name", "Last Name", "Amount", "Address"]
        );

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.len() == 5));
        assert_eq!(
            rows[0].iter().collect::<Vec<_>>(),
            vec!["01/01/2020", "First0", "Last0", "10", "1 Main St Springfield"]
        );
        assert_eq!(&rows[2][4], "9 Elm Rd, Shelbyville");
    }

    #[test]
    fn test_file_flushed_per_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut sink = CsvRecordSink::create(&path).unwrap();
        sink.write_page(&[record(0, "1 Main St")]).unwrap();

        // Still open: the page must already be on disk.
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert_eq!(sink.rows_written(), 1);
    }

    fn write_through<S: RecordSink>(mut sink: S, records: &[ContributionRecord]) {
        sink.write_page(records).unwrap();
    }

    #[test]
    fn test_memory_sink() {
        let mut sink = MemorySink::new();
        sink.write_page(&[record(0, "a")]).unwrap();
        sink.write_page(&[]).unwrap();
        write_through(&mut sink, &[record(1, "b")]);

        assert_eq!(sink.pages.len(), 3);
        assert_eq!(sink.records().len(), 2);
    }
}
