//! Ledger page parsing: line tokenizing, anchor matching, address windows
//! and record assembly.
//!
//! Everything in this module is pure: functions take page text and return
//! data. Skipped anchors are reported back to the caller instead of logged.

mod assembler;
mod lines;
mod matcher;
mod page;
mod window;

pub use assembler::{assemble_record, MIN_ANCHOR_TOKENS};
pub use lines::{tokenize_lines, RawLine};
pub use matcher::{classify, is_anchor, parse_anchor_date, LineKind};
pub use page::{extract_page, PageExtraction, PageExtractor, SkippedAnchor};
pub use window::{extract_address, line_at, WINDOW_LEN};
