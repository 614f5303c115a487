//! Pattern catalogue for boilerplate removal and alert detection.
//!
//! The library is an explicit value handed to every pipeline call, so a
//! jurisdiction can swap in its own catalogue in tests. Rules are validated
//! up front: a pattern that does not compile, or two rules of the same kind
//! sharing an id, prevents the pipeline from starting.

use regex::{Regex, RegexBuilder};
use review_types::{RuleCategory, RuleKind};

use crate::error::EngineError;

/// How a rule matches text.
#[derive(Debug, Clone, Copy)]
pub enum Matcher {
    /// Exact substring, matched case-insensitively.
    Literal(&'static str),
    /// Regex with `^`/`$` bound to line starts and ends.
    Line(&'static str),
    /// Regex where `.` crosses newlines, for constructs spanning lines.
    Block(&'static str),
}

/// Immutable rule descriptor. Lower `priority` runs first; ties resolve in
/// catalogue order.
#[derive(Debug, Clone)]
pub struct PatternRule {
    pub id: &'static str,
    pub kind: RuleKind,
    pub category: RuleCategory,
    pub matcher: Matcher,
    pub priority: i32,
}

/// A rule with its compiled matcher.
#[derive(Debug)]
pub struct CompiledRule {
    pub rule: PatternRule,
    pub regex: Regex,
}

/// Validated, priority-sorted rule catalogue.
#[derive(Debug)]
pub struct PatternLibrary {
    remove: Vec<CompiledRule>,
    alert: Vec<CompiledRule>,
}

impl PatternLibrary {
    /// Build the library from the standard catalogue.
    pub fn standard() -> Result<Self, EngineError> {
        Self::from_rules(standard_catalogue())
    }

    /// Build a library from an arbitrary rule set, validating ids and
    /// compiling every matcher.
    pub fn from_rules(rules: Vec<PatternRule>) -> Result<Self, EngineError> {
        let mut remove = Vec::new();
        let mut alert = Vec::new();

        for rule in rules {
            let bucket = match rule.kind {
                RuleKind::Remove => &mut remove,
                RuleKind::Alert => &mut alert,
            };
            if bucket
                .iter()
                .any(|c: &CompiledRule| c.rule.id == rule.id)
            {
                return Err(EngineError::DuplicateRuleId(rule.id.to_string()));
            }
            let regex = compile(&rule.matcher).map_err(|source| EngineError::BadPattern {
                id: rule.id.to_string(),
                source,
            })?;
            bucket.push(CompiledRule { rule, regex });
        }

        // Stable sort keeps catalogue order within equal priority.
        remove.sort_by_key(|c| c.rule.priority);
        alert.sort_by_key(|c| c.rule.priority);

        Ok(Self { remove, alert })
    }

    /// REMOVE rules in evaluation order.
    pub fn remove_rules(&self) -> &[CompiledRule] {
        &self.remove
    }

    /// ALERT rules in evaluation order.
    pub fn alert_rules(&self) -> &[CompiledRule] {
        &self.alert
    }
}

fn compile(matcher: &Matcher) -> Result<Regex, regex::Error> {
    match matcher {
        Matcher::Literal(text) => RegexBuilder::new(&regex::escape(text))
            .case_insensitive(true)
            .build(),
        Matcher::Line(pattern) => RegexBuilder::new(pattern).multi_line(true).build(),
        Matcher::Block(pattern) => RegexBuilder::new(pattern)
            .multi_line(true)
            .dot_matches_new_line(true)
            .build(),
    }
}

/// The standard catalogue for M&P specification sections.
///
/// REMOVE rules target editorial boilerplate; ALERT rules target content
/// that stays in the text but needs human attention. Block rules carry lower
/// priority than the separator rule so a fenced note block is claimed whole
/// before its fence lines can be matched as separators.
pub fn standard_catalogue() -> Vec<PatternRule> {
    vec![
        // ---- REMOVE: specifier/editor notes ----
        PatternRule {
            id: "specifier-note-bracket",
            kind: RuleKind::Remove,
            category: RuleCategory::SpecifierNote,
            matcher: Matcher::Block(
                r"(?i)\[\s*(?:note to specifier|specifier note|spec(?:ifier)? writer note)s?\b[^\]]*\]",
            ),
            priority: 10,
        },
        PatternRule {
            id: "specifier-note-fenced",
            kind: RuleKind::Remove,
            category: RuleCategory::SpecifierNote,
            matcher: Matcher::Block(
                r"(?i)^[ \t]*\*{4,}[ \t]*\n.*?note to specifier.*?\n[ \t]*\*{4,}[ \t]*$",
            ),
            priority: 11,
        },
        // ---- REMOVE: copyright blocks ----
        PatternRule {
            id: "copyright-line",
            kind: RuleKind::Remove,
            category: RuleCategory::Copyright,
            matcher: Matcher::Line(
                r"(?i)^[^\n]*\bcopyright\s+(?:©\s*|\(c\)\s*)?\d{4}\b[^\n]*$",
            ),
            priority: 20,
        },
        PatternRule {
            id: "all-rights-reserved-line",
            kind: RuleKind::Remove,
            category: RuleCategory::Copyright,
            matcher: Matcher::Line(r"(?i)^[ \t]*all rights reserved\.?[ \t]*$"),
            priority: 21,
        },
        // ---- REMOVE: layout noise ----
        PatternRule {
            id: "separator-line",
            kind: RuleKind::Remove,
            category: RuleCategory::Separator,
            // Underscore runs are deliberately excluded: a standalone
            // underscore line is a fill-in field, which is an alert, not a
            // separator.
            matcher: Matcher::Line(r"^[ \t]*(?:[-*=~#][ \t]?){4,}[ \t]*$"),
            priority: 30,
        },
        PatternRule {
            id: "end-of-section-line",
            kind: RuleKind::Remove,
            category: RuleCategory::EndOfSection,
            matcher: Matcher::Line(r"(?i)^[ \t]*end of section(?:[ \t]+[0-9][0-9 ]*)?[ \t]*$"),
            priority: 35,
        },
        PatternRule {
            id: "page-number-line",
            kind: RuleKind::Remove,
            category: RuleCategory::PageNumber,
            matcher: Matcher::Line(
                r"(?i)^[ \t]*(?:page[ \t]+\d+(?:[ \t]+of[ \t]+\d+)?|-[ \t]*\d+[ \t]*-|\d+[ \t]*/[ \t]*\d+)[ \t]*$",
            ),
            priority: 40,
        },
        PatternRule {
            id: "revision-mark-line",
            kind: RuleKind::Remove,
            category: RuleCategory::RevisionMark,
            matcher: Matcher::Line(
                r"(?i)^[ \t]*(?:rev(?:ision)?\.?[ \t]*[:#][ \t]*\S+|addendum[ \t]+no\.?[ \t]*\d+)[^\n]*$",
            ),
            priority: 50,
        },
        // ---- ALERT: LEED references ----
        PatternRule {
            id: "leed-reference",
            kind: RuleKind::Alert,
            category: RuleCategory::Leed,
            matcher: Matcher::Line(
                r"(?i)\bLEED(?:[-\s]?(?:NC|CI|EB|CS))?\b(?:\s+(?:credit|prerequisite)\s+[A-Z]{1,3}[-\s]?\d+(?:\.\d+)?)?",
            ),
            priority: 10,
        },
        PatternRule {
            id: "usgbc-reference",
            kind: RuleKind::Alert,
            category: RuleCategory::Leed,
            matcher: Matcher::Literal("USGBC"),
            priority: 11,
        },
        PatternRule {
            id: "green-building-reference",
            kind: RuleKind::Alert,
            category: RuleCategory::Leed,
            matcher: Matcher::Line(r"(?i)\bGreen\s+Building\b"),
            priority: 12,
        },
        // ---- ALERT: unresolved placeholders ----
        PatternRule {
            id: "bracket-placeholder",
            kind: RuleKind::Alert,
            category: RuleCategory::Placeholder,
            matcher: Matcher::Block(
                r"(?i)\[\s*(?:INSERT|VERIFY|EDIT|SELECT|COORDINATE|OPTION|TBD|TO\s+BE\s+DETERMINED|N/A)\b[^\]]*\]",
            ),
            priority: 20,
        },
        PatternRule {
            id: "angle-placeholder",
            kind: RuleKind::Alert,
            category: RuleCategory::Placeholder,
            matcher: Matcher::Block(r"(?i)<\s*(?:INSERT|VERIFY|EDIT)\b[^>]*>"),
            priority: 21,
        },
        PatternRule {
            id: "underscore-placeholder",
            kind: RuleKind::Alert,
            category: RuleCategory::Placeholder,
            matcher: Matcher::Line(r"_{3,}"),
            priority: 22,
        },
        PatternRule {
            id: "ellipsis-placeholder",
            kind: RuleKind::Alert,
            category: RuleCategory::Placeholder,
            matcher: Matcher::Line(r"\[\s*\.\.\.\s*\]"),
            priority: 23,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalogue_validates() {
        let library = PatternLibrary::standard().unwrap();
        assert!(!library.remove_rules().is_empty());
        assert!(!library.alert_rules().is_empty());
    }

    #[test]
    fn test_rules_sorted_by_priority() {
        let library = PatternLibrary::standard().unwrap();
        let priorities: Vec<i32> = library
            .remove_rules()
            .iter()
            .map(|c| c.rule.priority)
            .collect();
        let mut sorted = priorities.clone();
        sorted.sort();
        assert_eq!(priorities, sorted);
    }

    #[test]
    fn test_duplicate_id_within_kind_rejected() {
        let rules = vec![
            PatternRule {
                id: "dup",
                kind: RuleKind::Remove,
                category: RuleCategory::Separator,
                matcher: Matcher::Line(r"^-+$"),
                priority: 1,
            },
            PatternRule {
                id: "dup",
                kind: RuleKind::Remove,
                category: RuleCategory::PageNumber,
                matcher: Matcher::Line(r"^\d+$"),
                priority: 2,
            },
        ];
        let err = PatternLibrary::from_rules(rules).unwrap_err();
        assert!(matches!(err, EngineError::DuplicateRuleId(id) if id == "dup"));
    }

    #[test]
    fn test_same_id_across_kinds_allowed() {
        let rules = vec![
            PatternRule {
                id: "shared",
                kind: RuleKind::Remove,
                category: RuleCategory::Separator,
                matcher: Matcher::Line(r"^-+$"),
                priority: 1,
            },
            PatternRule {
                id: "shared",
                kind: RuleKind::Alert,
                category: RuleCategory::Placeholder,
                matcher: Matcher::Line(r"_{3,}"),
                priority: 1,
            },
        ];
        assert!(PatternLibrary::from_rules(rules).is_ok());
    }

    #[test]
    fn test_malformed_pattern_rejected_up_front() {
        let rules = vec![PatternRule {
            id: "broken",
            kind: RuleKind::Remove,
            category: RuleCategory::Separator,
            matcher: Matcher::Line(r"(unclosed"),
            priority: 1,
        }];
        let err = PatternLibrary::from_rules(rules).unwrap_err();
        assert!(matches!(err, EngineError::BadPattern { id, .. } if id == "broken"));
    }

    #[test]
    fn test_literal_matcher_is_case_insensitive() {
        let library = PatternLibrary::standard().unwrap();
        let usgbc = library
            .alert_rules()
            .iter()
            .find(|c| c.rule.id == "usgbc-reference")
            .unwrap();
        assert!(usgbc.regex.is_match("Submit usgbc documentation"));
    }
}
