//! Ledger anchor detection.

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;

use super::lines::RawLine;

lazy_static! {
    // Strict MM/DD/YYYY, calendar validity is checked by chrono.
    static ref ANCHOR_DATE: Regex = Regex::new(r"^\d{2}/\d{2}/\d{4}$").unwrap();
}

/// Classification of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// First token is a `MM/DD/YYYY` date: the line starts a ledger entry.
    Anchor,
    /// Anything else.
    Noise,
}

/// Parse a token as a `MM/DD/YYYY` calendar date.
pub fn parse_anchor_date(token: &str) -> Option<NaiveDate> {
    if !ANCHOR_DATE.is_match(token) {
        return None;
    }
    NaiveDate::parse_from_str(token, "%m/%d/%Y").ok()
}

/// Whether the first whitespace-delimited token of `text` is a ledger date.
pub fn is_anchor(text: &str) -> bool {
    text.split_whitespace()
        .next()
        .and_then(parse_anchor_date)
        .is_some()
}

/// Classify a line. Stateless: lines already read as part of an earlier
/// window are classified again like any other line.
pub fn classify(line: &RawLine<'_>) -> LineKind {
    if is_anchor(line.text) {
        LineKind::Anchor
    } else {
        LineKind::Noise
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_line() {
        assert!(is_anchor("01/02/2020 Doe, Jane 100"));
        assert!(is_anchor("12/31/1999"));
        assert!(is_anchor("  01/02/2020 Doe, Jane 100"));
    }

    #[test]
    fn test_noise_lines() {
        assert!(!is_anchor(""));
        assert!(!is_anchor("SUBTOTAL 1,250.00"));
        assert!(!is_anchor("123 | Main St"));
        assert!(!is_anchor("Date Name Amount"));
    }

    #[test]
    fn test_rejects_loose_date_shapes() {
        assert!(!is_anchor("1/2/2020 Doe, Jane 100"));
        assert!(!is_anchor("01/02/20 Doe, Jane 100"));
        assert!(!is_anchor("2020/01/02 Doe, Jane 100"));
        assert!(!is_anchor("01-02-2020 Doe, Jane 100"));
        assert!(!is_anchor("01/02/2020, Doe, Jane 100"));
    }

    #[test]
    fn test_rejects_impossible_dates() {
        assert!(!is_anchor("13/01/2020 Doe, Jane 100"));
        assert!(!is_anchor("02/30/2020 Doe, Jane 100"));
        assert!(is_anchor("02/29/2020 Doe, Jane 100"));
        assert!(!is_anchor("02/29/2019 Doe, Jane 100"));
    }

    #[test]
    fn test_parse_anchor_date() {
        assert_eq!(
            parse_anchor_date("03/15/2021"),
            NaiveDate::from_ymd_opt(2021, 3, 15)
        );
        assert_eq!(parse_anchor_date("Doe,"), None);
    }

    #[test]
    fn test_classify() {
        let anchor = RawLine { position: 0, text: "07/04/2022 Smith, John 50" };
        let noise = RawLine { position: 1, text: "| Springfield" };
        assert_eq!(classify(&anchor), LineKind::Anchor);
        assert_eq!(classify(&noise), LineKind::Noise);
    }
}
