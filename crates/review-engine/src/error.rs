use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Pattern rule `{id}` failed to compile: {source}")]
    BadPattern {
        id: String,
        #[source]
        source: regex::Error,
    },

    #[error("Duplicate rule id `{0}` within the same kind")]
    DuplicateRuleId(String),

    #[error("Empty file selection")]
    EmptySelection,

    #[error("Duplicate file in selection: {0}")]
    DuplicateFile(String),
}
