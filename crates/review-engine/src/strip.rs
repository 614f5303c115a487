//! Applies REMOVE rules to normalized text.
//!
//! Rules run in ascending priority order; within equal priority, catalogue
//! order. Claims are non-overlapping per pass (first-match-wins), so a
//! lower-priority separator rule can never fragment a block a higher-priority
//! rule already claimed. Every removed span is recorded with its offsets into
//! the input text for the audit export.

use review_types::Span;

use crate::normalize::collapse_blank_lines;
use crate::patterns::PatternLibrary;

/// Result of one stripping pass.
#[derive(Debug, Clone)]
pub struct StripOutcome {
    pub cleaned_text: String,
    /// In detection order. Offsets index the *input* normalized text.
    pub removed_spans: Vec<Span>,
}

/// Strip boilerplate. Pure function of its inputs; an unmatched rule simply
/// contributes no spans.
pub fn strip(normalized: &str, library: &PatternLibrary) -> StripOutcome {
    let mut claimed: Vec<(usize, usize)> = Vec::new();
    let mut removed_spans = Vec::new();

    for compiled in library.remove_rules() {
        for m in compiled.regex.find_iter(normalized) {
            if m.start() == m.end() {
                continue;
            }
            if overlaps_any(&claimed, m.start(), m.end()) {
                continue;
            }
            claimed.push((m.start(), m.end()));
            removed_spans.push(Span {
                start: m.start(),
                end: m.end(),
                rule_id: compiled.rule.id.to_string(),
                matched_text: m.as_str().to_string(),
            });
        }
    }

    let cleaned = remove_claimed(normalized, &claimed);
    StripOutcome {
        cleaned_text: collapse_blank_lines(&cleaned),
        removed_spans,
    }
}

fn overlaps_any(claimed: &[(usize, usize)], start: usize, end: usize) -> bool {
    claimed.iter().any(|&(s, e)| start < e && s < end)
}

/// Delete claimed ranges. A line left with nothing but whitespace by a
/// removal is dropped entirely, newline included, so stripping a full-line
/// match does not leave an empty line behind.
fn remove_claimed(text: &str, claimed: &[(usize, usize)]) -> String {
    if claimed.is_empty() {
        return text.to_string();
    }

    // Claims arrive in detection order; the line walk needs them by offset.
    let mut claimed = claimed.to_vec();
    claimed.sort_unstable_by_key(|&(s, _)| s);

    let mut out = String::with_capacity(text.len());
    let mut line_start = 0usize;

    while line_start <= text.len() {
        let line_end = text[line_start..]
            .find('\n')
            .map(|i| line_start + i)
            .unwrap_or(text.len());
        let has_newline = line_end < text.len();

        let mut kept = String::new();
        let mut touched = false;
        let mut pos = line_start;
        for &(s, e) in &claimed {
            if e <= line_start || s >= line_end {
                continue;
            }
            touched = true;
            let cut_from = s.max(line_start);
            if pos < cut_from {
                kept.push_str(&text[pos..cut_from]);
            }
            pos = pos.max(e.min(line_end));
        }
        if pos < line_end {
            kept.push_str(&text[pos..line_end]);
        }

        if touched && kept.trim().is_empty() {
            // Line emptied by removal: drop it and its newline.
        } else {
            if touched {
                out.push_str(kept.trim_end());
            } else {
                out.push_str(&kept);
            }
            if has_newline {
                out.push('\n');
            }
        }

        if !has_newline {
            break;
        }
        line_start = line_end + 1;
    }

    // Dropping the final line leaves the newline that led into it; anything
    // after a trailing newline run was removed, so trim the run unless the
    // input itself ended with one.
    if !text.ends_with('\n') {
        while out.ends_with('\n') {
            out.pop();
        }
    }

    out
}
