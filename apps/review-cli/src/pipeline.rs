//! Single source of truth for the review workflow.
//!
//! Extraction, preflight, capacity check, the API call and report rendering
//! all run from here so every front end behaves the same. Each run writes
//! into its own timestamped directory; input documents are never modified.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Local;
use review_engine::{BatchLimits, PreflightEngine};
use review_types::{FileText, ReviewResult, RuleCategory};
use serde_json::json;
use tracing::{info, warn};

use crate::report;
use crate::reviewer;

pub struct RunOptions {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub dry_run: bool,
    pub verbose: bool,
}

pub struct RunOutputs {
    pub run_dir: PathBuf,
    pub report_md: PathBuf,
    pub findings_json: PathBuf,
    pub review_result: Option<ReviewResult>,
    pub leed_alert_count: usize,
    pub placeholder_alert_count: usize,
}

fn create_run_dir(output_dir: &Path) -> Result<PathBuf> {
    let timestamp = Local::now().format("%Y-%m-%d_%H%M%S");
    let run_dir = output_dir.join(format!("review_{}", timestamp));
    fs::create_dir_all(&run_dir)
        .with_context(|| format!("Failed to create run directory: {}", run_dir.display()))?;
    Ok(run_dir)
}

fn alert_count(files: &[FileText], category: RuleCategory) -> usize {
    files
        .iter()
        .flat_map(|f| &f.alerts)
        .filter(|a| a.category == category)
        .count()
}

pub async fn run_review(options: &RunOptions) -> Result<RunOutputs> {
    let docx_files = docx_extract::find_docx_files(&options.input_dir)
        .with_context(|| format!("Failed to read input directory: {}", options.input_dir.display()))?;
    if docx_files.is_empty() {
        bail!("No .docx files found in: {}", options.input_dir.display());
    }

    let run_dir = create_run_dir(&options.output_dir)?;
    let engine = PreflightEngine::standard()?;

    let mut files: Vec<FileText> = Vec::new();
    for path in &docx_files {
        info!("Loading: {}", path.display());
        let doc = docx_extract::extract_docx(path)
            .with_context(|| format!("Failed to extract: {}", path.display()))?;
        let file = engine.process_file(&doc.file_name, &doc.text);
        info!(
            tokens = file.token_count,
            removed = file.removed_spans.len(),
            alerts = file.alerts.len(),
            "Preflight complete: {}",
            file.file_name
        );
        files.push(file);
    }

    let limits = BatchLimits::default();
    let decision = engine.assemble(&files, limits)?;

    // Snapshot artifacts are written before any capacity stop so an
    // over-budget run can still be inspected and split.
    write_token_summary(&run_dir, &files, &decision, limits)?;
    fs::write(run_dir.join("inputs_combined.txt"), &decision.combined_text)?;
    write_preflight_audit(&run_dir, &files)?;

    let leed_alert_count = alert_count(&files, RuleCategory::Leed);
    let placeholder_alert_count = alert_count(&files, RuleCategory::Placeholder);
    if leed_alert_count + placeholder_alert_count > 0 {
        info!(
            leed = leed_alert_count,
            placeholders = placeholder_alert_count,
            "Alerts recorded (kept in text, not sent as findings targets)"
        );
    }

    info!(
        aggregate = decision.aggregate_token_count,
        remaining = decision.capacity_remaining,
        "Token analysis: {} / {} tokens",
        decision.aggregate_token_count,
        limits.hard
    );
    if decision.hard_limit_exceeded {
        bail!(
            "Token limit exceeded: {} > {}. Split the input specs and re-run.",
            decision.aggregate_token_count,
            limits.hard
        );
    }
    if decision.soft_limit_exceeded {
        warn!(
            "Estimated tokens exceed the recommended limit ({} > {}). The response may be truncated; consider removing some specifications.",
            decision.aggregate_token_count, limits.soft
        );
    }

    let findings_json = run_dir.join("findings.json");
    let report_md = run_dir.join("report.md");

    if options.dry_run {
        info!("Dry run: skipping API call.");
        // Still generate the artifact structure with zero findings.
        let empty = ReviewResult {
            model: reviewer::MODEL.to_string(),
            ..Default::default()
        };
        report::write_findings_json(&findings_json, &empty, &files, true)?;
        report::write_report(&report_md, &empty, &files)?;
        fs::write(run_dir.join("raw_response.txt"), "")?;
        return Ok(RunOutputs {
            run_dir,
            report_md,
            findings_json,
            review_result: None,
            leed_alert_count,
            placeholder_alert_count,
        });
    }

    info!("Reviewing with {}...", reviewer::MODEL);
    let review_result = reviewer::review_specs(&decision.combined_text, options.verbose).await?;

    fs::write(run_dir.join("raw_response.txt"), &review_result.raw_response)?;
    report::write_findings_json(&findings_json, &review_result, &files, false)?;
    report::write_report(&report_md, &review_result, &files)?;

    info!(
        input_tokens = review_result.input_tokens,
        output_tokens = review_result.output_tokens,
        findings = review_result.total_count(),
        "Review complete in {:.1}s",
        review_result.elapsed_seconds
    );

    Ok(RunOutputs {
        run_dir,
        report_md,
        findings_json,
        review_result: Some(review_result),
        leed_alert_count,
        placeholder_alert_count,
    })
}

fn write_token_summary(
    run_dir: &Path,
    files: &[FileText],
    decision: &review_types::BatchDecision,
    limits: BatchLimits,
) -> Result<()> {
    let summary = json!({
        "model": reviewer::MODEL,
        "soft_limit": limits.soft,
        "hard_limit": limits.hard,
        "aggregate_tokens": decision.aggregate_token_count,
        "soft_limit_exceeded": decision.soft_limit_exceeded,
        "hard_limit_exceeded": decision.hard_limit_exceeded,
        "capacity_remaining": decision.capacity_remaining,
        "items": files.iter().map(|f| json!({
            "name": f.file_name,
            "tokens": f.token_count,
            "chars": f.cleaned_text.chars().count(),
        })).collect::<Vec<_>>(),
    });
    fs::write(
        run_dir.join("token_summary.json"),
        serde_json::to_string_pretty(&summary)?,
    )?;
    Ok(())
}

/// Audit export: every removed span and alert, per file, in detection order.
fn write_preflight_audit(run_dir: &Path, files: &[FileText]) -> Result<()> {
    let audit = json!({
        "files": files.iter().map(|f| json!({
            "file_name": f.file_name,
            "removed_spans": f.removed_spans,
            "alerts": f.alerts,
        })).collect::<Vec<_>>(),
    });
    fs::write(
        run_dir.join("removed_spans.json"),
        serde_json::to_string_pretty(&audit)?,
    )?;
    Ok(())
}
