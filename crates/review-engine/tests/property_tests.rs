//! Property-based tests for the preprocessing core.
//!
//! Exercises the pipeline invariants with proptest over spec-like text.

use proptest::prelude::*;
use review_engine::{normalize, scan, strip, tokens, BatchLimits, PatternLibrary, PreflightEngine};

/// Lines that show up in real specification sections, boilerplate included.
fn spec_line() -> impl Strategy<Value = String> {
    proptest::sample::select(vec![
        "Pipe shall be copper, Type L, hard drawn.",
        "Provide hangers and supports per MSS SP-58.",
        "[Note to specifier: delete if not applicable]",
        "NOTE TO SPECIFIER: coordinate with structural.",
        "Copyright 2024 by ARCOM. MasterSpec full length.",
        "All rights reserved.",
        "************",
        "------------",
        "Page 4 of 17",
        "- 4 -",
        "END OF SECTION 23 21 13",
        "Rev: 3 issued for bid",
        "Provide LEED credit EA-1 documentation.",
        "Submit USGBC templates for review.",
        "Insulation thickness: [INSERT THICKNESS] inches",
        "Test pressure: ___ psig [VERIFY]",
        "",
    ])
    .prop_map(|line| line.to_string())
}

fn spec_text() -> impl Strategy<Value = String> {
    proptest::collection::vec(spec_line(), 0..24).prop_map(|lines| lines.join("\n"))
}

fn library() -> PatternLibrary {
    PatternLibrary::standard().unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    // ============================================================
    // Normalizer
    // ============================================================

    #[test]
    fn normalize_is_idempotent(text in "[ -~\u{00AD}\u{200B}\r\n\t]{0,400}") {
        let once = normalize::normalize(&text);
        prop_assert_eq!(normalize::normalize(&once), once);
    }

    #[test]
    fn normalize_is_idempotent_on_spec_text(text in spec_text()) {
        let once = normalize::normalize(&text);
        prop_assert_eq!(normalize::normalize(&once), once);
    }

    // ============================================================
    // Stripper
    // ============================================================

    #[test]
    fn strip_never_grows_text(text in spec_text()) {
        let normalized = normalize::normalize(&text);
        let outcome = strip::strip(&normalized, &library());
        prop_assert!(outcome.cleaned_text.len() <= normalized.len());
    }

    #[test]
    fn removed_spans_match_input_substrings(text in spec_text()) {
        let normalized = normalize::normalize(&text);
        let outcome = strip::strip(&normalized, &library());
        for span in &outcome.removed_spans {
            prop_assert_eq!(&span.matched_text, &normalized[span.start..span.end]);
        }
    }

    #[test]
    fn removed_spans_never_overlap(text in spec_text()) {
        let normalized = normalize::normalize(&text);
        let outcome = strip::strip(&normalized, &library());
        for (i, a) in outcome.removed_spans.iter().enumerate() {
            for b in &outcome.removed_spans[i + 1..] {
                prop_assert!(a.end <= b.start || b.end <= a.start);
            }
        }
    }

    #[test]
    fn strip_is_idempotent_on_cleaned_output(text in spec_text()) {
        let normalized = normalize::normalize(&text);
        let once = strip::strip(&normalized, &library());
        let twice = strip::strip(&once.cleaned_text, &library());
        prop_assert!(twice.removed_spans.is_empty());
        prop_assert_eq!(twice.cleaned_text, once.cleaned_text);
    }

    // ============================================================
    // Scanner
    // ============================================================

    #[test]
    fn scan_is_pure_and_repeatable(text in spec_text()) {
        let normalized = normalize::normalize(&text);
        let cleaned = strip::strip(&normalized, &library()).cleaned_text;
        let first = scan::scan(&cleaned, &library());
        let second = scan::scan(&cleaned, &library());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn alerts_reference_cleaned_text(text in spec_text()) {
        let normalized = normalize::normalize(&text);
        let cleaned = strip::strip(&normalized, &library()).cleaned_text;
        for alert in scan::scan(&cleaned, &library()) {
            prop_assert_eq!(&alert.matched_text, &cleaned[alert.start..alert.end]);
        }
    }

    // ============================================================
    // Estimator
    // ============================================================

    #[test]
    fn estimate_is_deterministic(text in "\\PC{0,400}") {
        prop_assert_eq!(tokens::estimate(&text), tokens::estimate(&text));
    }

    #[test]
    fn concatenation_estimate_within_rounding_slack(
        a in "\\PC{0,200}",
        b in "\\PC{0,200}",
    ) {
        let combined = format!("{}{}", a, b);
        let summed = tokens::estimate(&a) + tokens::estimate(&b);
        let whole = tokens::estimate(&combined);
        prop_assert!(summed >= whole);
        prop_assert!(summed - whole <= 2);
    }

    // ============================================================
    // Assembler
    // ============================================================

    #[test]
    fn combined_text_contains_cleaned_texts_in_order(
        texts in proptest::collection::vec(spec_text(), 1..5)
    ) {
        let engine = PreflightEngine::standard().unwrap();
        let files: Vec<_> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| engine.process_file(&format!("file-{}.docx", i), t))
            .collect();
        let decision = engine.assemble(&files, BatchLimits::default()).unwrap();

        let mut cursor = 0;
        for file in &files {
            let found = decision.combined_text[cursor..].find(&file.cleaned_text);
            prop_assert!(found.is_some());
            cursor += found.unwrap() + file.cleaned_text.len();
        }
        prop_assert_eq!(
            decision.aggregate_token_count,
            tokens::estimate(&decision.combined_text)
        );
    }
}
