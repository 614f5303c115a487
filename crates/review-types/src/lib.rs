pub mod findings;
pub mod types;

pub use findings::{ActionType, Finding, ReviewResult, Severity};
pub use types::{Alert, BatchDecision, FileText, RuleCategory, RuleKind, Span};
