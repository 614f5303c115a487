//! Assembles selected files into one bounded analysis unit.
//!
//! Concatenation order is exactly the selection order: reordering would
//! change which findings map back to which file boundary marker. The
//! assembler classifies capacity; it never blocks a batch by itself.

use std::collections::HashSet;

use review_types::{BatchDecision, FileText};

use crate::error::EngineError;
use crate::tokens::{estimate, BatchLimits};

/// Boundary marker inserted before each file's cleaned text. The analysis
/// prompt documents this exact format, and findings carry the file name back
/// out of it.
pub fn boundary_marker(file_name: &str) -> String {
    format!("===== FILE: {} =====", file_name)
}

/// Build the batch decision for a selection of processed files.
///
/// Rejects an empty selection and duplicate file names; both are caller
/// contract violations, not runtime conditions to recover from. Capacity
/// exceeded is a flag on the decision, never an error.
pub fn assemble(files: &[FileText], limits: BatchLimits) -> Result<BatchDecision, EngineError> {
    if files.is_empty() {
        return Err(EngineError::EmptySelection);
    }
    let mut seen = HashSet::new();
    for file in files {
        if !seen.insert(file.file_name.as_str()) {
            return Err(EngineError::DuplicateFile(file.file_name.clone()));
        }
    }

    let blocks: Vec<String> = files
        .iter()
        .map(|f| format!("{}\n{}", boundary_marker(&f.file_name), f.cleaned_text))
        .collect();
    let combined_text = blocks.join("\n\n");

    // Estimated over the whole concatenation, not by summing per-file
    // counts, so rounding slack does not compound.
    let aggregate_token_count = estimate(&combined_text);

    Ok(BatchDecision {
        selected_files: files.iter().map(|f| f.file_name.clone()).collect(),
        aggregate_token_count,
        soft_limit_exceeded: aggregate_token_count > limits.soft,
        hard_limit_exceeded: aggregate_token_count > limits.hard,
        capacity_remaining: limits.hard as i64 - aggregate_token_count as i64,
        combined_text,
    })
}
