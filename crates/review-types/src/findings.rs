//! Review findings returned by the analysis collaborator.

use serde::{Deserialize, Serialize};

/// Finding severity, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Gripes,
}

impl Severity {
    /// Fixed ordering for report sections.
    pub const REPORT_ORDER: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Gripes,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Gripes => "GRIPES",
        }
    }
}

/// What kind of correction a finding asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Add,
    Edit,
    Delete,
}

impl ActionType {
    pub fn label(&self) -> &'static str {
        match self {
            ActionType::Add => "ADD",
            ActionType::Edit => "EDIT",
            ActionType::Delete => "DELETE",
        }
    }
}

/// A single review finding, camelCase on the wire to match the analysis
/// output contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub severity: Severity,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub section: String,
    pub issue: String,
    pub action_type: Option<ActionType>,
    #[serde(default)]
    pub existing_text: Option<String>,
    #[serde(default)]
    pub replacement_text: Option<String>,
    #[serde(default)]
    pub code_reference: Option<String>,
}

/// Result of one analysis call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReviewResult {
    pub findings: Vec<Finding>,
    pub raw_response: String,
    pub model: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub elapsed_seconds: f64,
}

impl ReviewResult {
    pub fn count(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity == severity)
            .count()
    }

    pub fn total_count(&self) -> usize {
        self.findings.len()
    }
}
