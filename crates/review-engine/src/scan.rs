//! Applies ALERT rules to cleaned text.
//!
//! Alerts run against the text that will actually reach the analysis
//! collaborator, after stripping. Overlapping matches from different rules
//! are all retained; only exact `(rule_id, start, end)` duplicates are
//! dropped. Scanning never alters the text it inspects.

use std::collections::HashSet;

use review_types::Alert;

use crate::patterns::PatternLibrary;

/// Context excerpt radius, in bytes, clamped to char boundaries.
const CONTEXT_RADIUS: usize = 40;

/// Scan cleaned text for retained-but-flagged patterns.
pub fn scan(cleaned: &str, library: &PatternLibrary) -> Vec<Alert> {
    let mut seen: HashSet<(&str, usize, usize)> = HashSet::new();
    let mut alerts = Vec::new();

    for compiled in library.alert_rules() {
        for m in compiled.regex.find_iter(cleaned) {
            if m.start() == m.end() {
                continue;
            }
            if !seen.insert((compiled.rule.id, m.start(), m.end())) {
                continue;
            }
            alerts.push(Alert {
                rule_id: compiled.rule.id.to_string(),
                category: compiled.rule.category,
                start: m.start(),
                end: m.end(),
                matched_text: m.as_str().to_string(),
                context: context_excerpt(cleaned, m.start(), m.end()),
            });
        }
    }

    alerts
}

/// ±40 characters around the match, clamped to the text and flattened to a
/// single line for report rendering.
fn context_excerpt(text: &str, start: usize, end: usize) -> String {
    let mut from = start.saturating_sub(CONTEXT_RADIUS);
    while !text.is_char_boundary(from) {
        from -= 1;
    }
    let mut to = (end + CONTEXT_RADIUS).min(text.len());
    while !text.is_char_boundary(to) {
        to += 1;
    }
    text[from..to].replace('\n', " ").trim().to_string()
}
