//! Core data model for the preprocessing pipeline.

use serde::{Deserialize, Serialize};

/// What a pattern rule does with its matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleKind {
    /// Matched text is boilerplate and is removed from the file.
    Remove,
    /// Matched text is retained but flagged for human attention.
    Alert,
}

/// Category of text a rule targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleCategory {
    SpecifierNote,
    Copyright,
    Separator,
    PageNumber,
    RevisionMark,
    EndOfSection,
    Leed,
    Placeholder,
}

/// A located, rule-attributed match within a file's normalized text.
///
/// Offsets are byte offsets into the text the producing stage ran on, so
/// `matched_text == &text[start..end]` holds for the pre-removal input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub rule_id: String,
    pub matched_text: String,
}

/// A retained-but-flagged match with surrounding context for human review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub rule_id: String,
    pub category: RuleCategory,
    pub start: usize,
    pub end: usize,
    pub matched_text: String,
    /// Short excerpt around the match, newlines flattened to spaces.
    pub context: String,
}

/// One input document's representation through the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileText {
    pub file_name: String,
    pub raw_text: String,
    pub normalized_text: String,
    pub cleaned_text: String,
    /// Removed boilerplate spans, in detection order. Offsets index into
    /// `normalized_text`.
    pub removed_spans: Vec<Span>,
    /// Alerts over `cleaned_text`, in detection order.
    pub alerts: Vec<Alert>,
    /// Estimated tokens of `cleaned_text`.
    pub token_count: usize,
}

/// Aggregate capacity verdict for a set of files selected for one review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchDecision {
    /// File names in selection order. Order is semantically significant:
    /// it determines which boundary marker each finding maps back to.
    pub selected_files: Vec<String>,
    pub combined_text: String,
    /// Estimated over `combined_text` as a whole, never by summing per-file
    /// counts.
    pub aggregate_token_count: usize,
    pub soft_limit_exceeded: bool,
    pub hard_limit_exceeded: bool,
    /// `hard - aggregate_token_count`; negative when over the ceiling.
    pub capacity_remaining: i64,
}
