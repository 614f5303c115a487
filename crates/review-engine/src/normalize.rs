//! Canonicalizes raw extracted text before pattern matching.
//!
//! Normalization is a total, idempotent function: line endings are unified,
//! invisible formatting markers dropped, trailing whitespace stripped per
//! line, and runs of three or more blank lines collapsed to exactly two. No
//! semantic content is altered.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Three or more blank lines = four or more consecutive newlines.
    static ref BLANK_RUN: Regex = Regex::new(r"\n{4,}").unwrap();
}

/// Zero-width and invisible markers that survive document extraction.
fn is_invisible(c: char) -> bool {
    matches!(
        c,
        '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{2060}' | '\u{FEFF}' | '\u{00AD}'
    )
}

/// Canonicalize raw text. `normalize(normalize(x)) == normalize(x)` for all x.
pub fn normalize(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");
    let visible: String = unified.chars().filter(|c| !is_invisible(*c)).collect();

    let trimmed: Vec<&str> = visible.lines().map(str::trim_end).collect();
    // Trailing blank lines are dropped outright; `lines()` would otherwise
    // swallow one final newline per pass and break idempotence.
    collapse_blank_lines(trimmed.join("\n").trim_end_matches('\n'))
}

/// Collapse runs of 3+ blank lines to exactly 2. Shared with the stripper,
/// which re-applies it after span removal.
pub(crate) fn collapse_blank_lines(text: &str) -> String {
    BLANK_RUN.replace_all(text, "\n\n\n").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_unifies_line_endings() {
        assert_eq!(normalize("a\r\nb\rc\nd"), "a\nb\nc\nd");
    }

    #[test]
    fn test_strips_trailing_whitespace_per_line() {
        assert_eq!(normalize("a   \nb\t\nc"), "a\nb\nc");
    }

    #[test]
    fn test_collapses_blank_line_runs_to_two() {
        assert_eq!(normalize("a\n\n\n\n\n\nb"), "a\n\n\nb");
        // Two blank lines are left alone.
        assert_eq!(normalize("a\n\n\nb"), "a\n\n\nb");
    }

    #[test]
    fn test_removes_invisible_markers() {
        assert_eq!(normalize("pi\u{200B}pe\u{FEFF}"), "pipe");
        assert_eq!(normalize("in\u{00AD}sulation"), "insulation");
    }

    #[test]
    fn test_idempotent_on_messy_input() {
        let raw = "Part 1\u{200B} \r\n\r\n\r\n\r\n\r\nGeneral  \r\n";
        let once = normalize(raw);
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn test_trailing_blank_lines_dropped() {
        assert_eq!(normalize("a\n"), "a");
        assert_eq!(normalize("a\n\n\n"), "a");
        let once = normalize("a\n\n\n");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_whitespace_only_lines_become_blank() {
        // Lines of spaces count as blank after trailing-whitespace removal,
        // so they participate in the collapse.
        assert_eq!(normalize("a\n   \n \t \n   \n   \nb"), "a\n\n\nb");
    }
}
