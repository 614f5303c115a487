//! Report rendering.
//!
//! Two artifacts per run: `findings.json` for machine consumption and a
//! printable Markdown report for the reviewing engineer.

use std::fs;
use std::path::Path;

use anyhow::Result;
use chrono::Local;
use review_types::{Alert, FileText, Finding, ReviewResult, RuleCategory, Severity};
use serde_json::json;

/// Alerts shown per file in the report before collapsing to a count.
const MAX_ALERTS_PER_FILE: usize = 5;

pub fn write_findings_json(
    path: &Path,
    review: &ReviewResult,
    files: &[FileText],
    dry_run: bool,
) -> Result<()> {
    let payload = json!({
        "meta": {
            "model": review.model,
            "dry_run": dry_run,
            "input_tokens": review.input_tokens,
            "output_tokens": review.output_tokens,
            "elapsed_seconds": review.elapsed_seconds,
        },
        "findings": review.findings,
        "alerts": {
            "leed_alerts": alerts_of(files, RuleCategory::Leed),
            "placeholder_alerts": alerts_of(files, RuleCategory::Placeholder),
        },
    });
    fs::write(path, serde_json::to_string_pretty(&payload)?)?;
    Ok(())
}

pub fn write_report(path: &Path, review: &ReviewResult, files: &[FileText]) -> Result<()> {
    fs::write(path, render_report(review, files))?;
    Ok(())
}

fn alerts_of(files: &[FileText], category: RuleCategory) -> Vec<serde_json::Value> {
    files
        .iter()
        .flat_map(|f| {
            f.alerts
                .iter()
                .filter(|a| a.category == category)
                .map(|a| {
                    json!({
                        "filename": f.file_name,
                        "rule_id": a.rule_id,
                        "position": a.start,
                        "match": a.matched_text,
                        "context": a.context,
                    })
                })
        })
        .collect()
}

/// Render the printable report. Pure function of its inputs apart from the
/// generation timestamp.
pub fn render_report(review: &ReviewResult, files: &[FileText]) -> String {
    let mut out = String::new();

    out.push_str("# M&P Specification Review Report\n\n");
    out.push_str(&format!(
        "Generated: {}  \nModel: {}  \nFiles Reviewed: {}\n\n",
        Local::now().format("%Y-%m-%d %H:%M"),
        review.model,
        files.len()
    ));

    out.push_str("## Files Reviewed\n\n");
    for file in files {
        out.push_str(&format!("- {}\n", file.file_name));
    }
    out.push('\n');

    out.push_str("## Summary\n\n");
    out.push_str("| CRITICAL | HIGH | MEDIUM | GRIPES | TOTAL |\n");
    out.push_str("|---:|---:|---:|---:|---:|\n");
    out.push_str(&format!(
        "| {} | {} | {} | {} | {} |\n\n",
        review.count(Severity::Critical),
        review.count(Severity::High),
        review.count(Severity::Medium),
        review.count(Severity::Gripes),
        review.total_count()
    ));

    if review.input_tokens > 0 || review.output_tokens > 0 {
        out.push_str(&format!(
            "Token Usage: {} input \u{2192} {} output  \n",
            review.input_tokens, review.output_tokens
        ));
    }
    out.push_str(&format!(
        "Processing Time: {:.1} seconds\n\n",
        review.elapsed_seconds
    ));

    render_alerts_section(&mut out, files);
    render_findings_section(&mut out, &review.findings);

    out
}

fn render_alerts_section(out: &mut String, files: &[FileText]) {
    let has_leed = files
        .iter()
        .any(|f| f.alerts.iter().any(|a| a.category == RuleCategory::Leed));
    let has_placeholder = files
        .iter()
        .any(|f| f.alerts.iter().any(|a| a.category == RuleCategory::Placeholder));
    if !has_leed && !has_placeholder {
        return;
    }

    out.push_str("## Alerts\n\n");

    if has_leed {
        out.push_str("### LEED References Detected\n\n");
        out.push_str(
            "The following LEED references were found. Since this is not a LEED project, these should be removed:\n\n",
        );
        render_alert_group(out, files, RuleCategory::Leed);
    }

    if has_placeholder {
        out.push_str("### Unresolved Placeholders\n\n");
        out.push_str("The following placeholders need to be resolved:\n\n");
        render_alert_group(out, files, RuleCategory::Placeholder);
    }
}

fn render_alert_group(out: &mut String, files: &[FileText], category: RuleCategory) {
    for file in files {
        let alerts: Vec<&Alert> = file
            .alerts
            .iter()
            .filter(|a| a.category == category)
            .collect();
        if alerts.is_empty() {
            continue;
        }
        out.push_str(&format!("**{}**\n\n", file.file_name));
        for alert in alerts.iter().take(MAX_ALERTS_PER_FILE) {
            out.push_str(&format!("- offset {}: {}\n", alert.start, alert.context));
        }
        if alerts.len() > MAX_ALERTS_PER_FILE {
            out.push_str(&format!(
                "- ... and {} more\n",
                alerts.len() - MAX_ALERTS_PER_FILE
            ));
        }
        out.push('\n');
    }
}

fn render_findings_section(out: &mut String, findings: &[Finding]) {
    out.push_str("## Findings\n\n");

    if findings.is_empty() {
        out.push_str("No issues found.\n");
        return;
    }

    for severity in Severity::REPORT_ORDER {
        let group: Vec<&Finding> = findings.iter().filter(|f| f.severity == severity).collect();
        if group.is_empty() {
            continue;
        }
        out.push_str(&format!("### {} ({})\n\n", severity.label(), group.len()));
        for (i, finding) in group.iter().enumerate() {
            render_finding(out, finding, i + 1);
        }
    }
}

fn render_finding(out: &mut String, finding: &Finding, index: usize) {
    out.push_str(&format!(
        "{}. **[{}] {}**\n",
        index,
        finding.severity.label(),
        finding.file_name
    ));
    if !finding.section.is_empty() {
        out.push_str(&format!("   - Section: {}\n", finding.section));
    }
    out.push_str(&format!("   - Issue: {}\n", finding.issue));
    if let Some(action) = &finding.action_type {
        out.push_str(&format!("   - Action: {}\n", action.label()));
    }
    if let Some(existing) = &finding.existing_text {
        out.push_str(&format!("   - Existing Text: {}\n", existing));
    }
    if let Some(replacement) = &finding.replacement_text {
        out.push_str(&format!("   - Replace With: {}\n", replacement));
    }
    if let Some(reference) = &finding.code_reference {
        out.push_str(&format!("   - Reference: {}\n", reference));
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use review_types::ActionType;

    fn sample_file(name: &str, alerts: Vec<Alert>) -> FileText {
        FileText {
            file_name: name.to_string(),
            raw_text: String::new(),
            normalized_text: String::new(),
            cleaned_text: "body".to_string(),
            removed_spans: vec![],
            alerts,
            token_count: 1,
        }
    }

    fn leed_alert(start: usize) -> Alert {
        Alert {
            rule_id: "leed-reference".to_string(),
            category: RuleCategory::Leed,
            start,
            end: start + 4,
            matched_text: "LEED".to_string(),
            context: "Provide LEED documentation".to_string(),
        }
    }

    fn sample_finding(severity: Severity) -> Finding {
        Finding {
            severity,
            file_name: "23 21 13.docx".to_string(),
            section: "Part 2, Article 2.3.A".to_string(),
            issue: "Seismic reference out of date".to_string(),
            action_type: Some(ActionType::Edit),
            existing_text: Some("ASCE 7-16".to_string()),
            replacement_text: Some("ASCE 7-22".to_string()),
            code_reference: Some("CBC 2022".to_string()),
        }
    }

    #[test]
    fn test_report_groups_findings_by_severity() {
        let review = ReviewResult {
            findings: vec![
                sample_finding(Severity::High),
                sample_finding(Severity::Critical),
                sample_finding(Severity::High),
            ],
            model: "test-model".to_string(),
            ..Default::default()
        };
        let files = vec![sample_file("23 21 13.docx", vec![])];
        let report = render_report(&review, &files);

        assert!(report.contains("### CRITICAL (1)"));
        assert!(report.contains("### HIGH (2)"));
        assert!(!report.contains("### MEDIUM"));
        // Critical section renders before high.
        assert!(report.find("### CRITICAL").unwrap() < report.find("### HIGH").unwrap());
    }

    #[test]
    fn test_report_caps_alerts_per_file() {
        let alerts: Vec<Alert> = (0..8).map(|i| leed_alert(i * 10)).collect();
        let files = vec![sample_file("a.docx", alerts)];
        let review = ReviewResult::default();
        let report = render_report(&review, &files);

        assert!(report.contains("### LEED References Detected"));
        assert!(report.contains("... and 3 more"));
    }

    #[test]
    fn test_report_without_findings_or_alerts() {
        let files = vec![sample_file("a.docx", vec![])];
        let review = ReviewResult::default();
        let report = render_report(&review, &files);

        assert!(report.contains("No issues found."));
        assert!(!report.contains("## Alerts"));
    }

    #[test]
    fn test_finding_entry_fields_rendered() {
        let review = ReviewResult {
            findings: vec![sample_finding(Severity::Critical)],
            ..Default::default()
        };
        let files = vec![sample_file("23 21 13.docx", vec![])];
        let report = render_report(&review, &files);

        assert!(report.contains("Section: Part 2, Article 2.3.A"));
        assert!(report.contains("Existing Text: ASCE 7-16"));
        assert!(report.contains("Replace With: ASCE 7-22"));
        assert!(report.contains("Reference: CBC 2022"));
    }
}
