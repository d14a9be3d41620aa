//! Splitting OCR text into positioned lines.

/// One line of OCR output with its zero-based position on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawLine<'a> {
    /// Zero-based line index within the page.
    pub position: usize,
    /// Line content without its terminator.
    pub text: &'a str,
}

/// Split a text blob into lines, keeping blank lines.
///
/// Window extraction is offset based, so every line keeps its slot.
/// Both `\n` and `\r\n` terminate a line and a trailing terminator does not
/// produce an extra empty line.
pub fn tokenize_lines(text: &str) -> Vec<RawLine<'_>> {
    text.lines()
        .enumerate()
        .map(|(position, text)| RawLine { position, text })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_keeps_blank_lines_in_place() {
        let lines = tokenize_lines("first\n\n  \nlast");
        let texts: Vec<&str> = lines.iter().map(|l| l.text).collect();
        assert_eq!(texts, vec!["first", "", "  ", "last"]);
        assert_eq!(lines[3].position, 3);
    }

    #[test]
    fn test_normalizes_crlf() {
        let lines = tokenize_lines("a\r\nb\r\n");
        let texts: Vec<&str> = lines.iter().map(|l| l.text).collect();
        assert_eq!(texts, vec!["a", "b"]);
    }

    #[test]
    fn test_no_trimming() {
        let lines = tokenize_lines(" | Springfield \n");
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, " | Springfield ");
    }

    #[test]
    fn test_empty_text() {
        assert!(tokenize_lines("").is_empty());
    }
}
