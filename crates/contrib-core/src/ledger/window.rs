//! Address window extraction.

use crate::error::ExtractionError;

use super::lines::RawLine;

/// Lines in one ledger entry: anchor, ignored row, two address rows.
pub const WINDOW_LEN: usize = 4;

/// Bounds-checked access to the line `offset` rows after `anchor`.
pub fn line_at<'l, 'a>(
    lines: &'l [RawLine<'a>],
    anchor: usize,
    offset: usize,
) -> Result<&'l RawLine<'a>, ExtractionError> {
    let index = anchor + offset;
    lines.get(index).ok_or(ExtractionError::OutOfRange {
        anchor,
        index,
        line_count: lines.len(),
    })
}

/// Read the address for the anchor at `anchor`.
///
/// Row `anchor + 1` must exist but is never used. Rows `anchor + 2` and
/// `anchor + 3` have their `|` glyphs removed, are joined with one space and
/// the result is trimmed.
pub fn extract_address(lines: &[RawLine<'_>], anchor: usize) -> Result<String, ExtractionError> {
    line_at(lines, anchor, 1)?;
    let first = line_at(lines, anchor, 2)?;
    let second = line_at(lines, anchor, 3)?;

    let address = format!("{} {}", strip_pipes(first.text), strip_pipes(second.text));
    Ok(address.trim().to_string())
}

fn strip_pipes(text: &str) -> String {
    text.replace('|', "")
}
