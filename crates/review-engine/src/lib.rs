pub mod batch;
pub mod error;
pub mod normalize;
pub mod patterns;
pub mod scan;
pub mod strip;
pub mod tokens;

pub use error::EngineError;
pub use patterns::{Matcher, PatternLibrary, PatternRule};
pub use tokens::BatchLimits;

use review_types::{BatchDecision, FileText};

/// Pre-flight engine: normalizes, strips, scans and measures each file, and
/// assembles a selection into one bounded analysis unit.
///
/// The pattern library is injected at construction so a different catalogue
/// can be swapped in per jurisdiction. Files are processed independently;
/// batch assembly is the one ordered join point.
pub struct PreflightEngine {
    library: PatternLibrary,
}

impl PreflightEngine {
    pub fn new(library: PatternLibrary) -> Self {
        Self { library }
    }

    /// Engine over the standard catalogue. Fails if the catalogue is
    /// invalid, before any file is touched.
    pub fn standard() -> Result<Self, EngineError> {
        Ok(Self::new(PatternLibrary::standard()?))
    }

    pub fn library(&self) -> &PatternLibrary {
        &self.library
    }

    /// Run one file through the full pipeline:
    /// normalize → strip → scan → estimate.
    pub fn process_file(&self, file_name: &str, raw_text: &str) -> FileText {
        let normalized_text = normalize::normalize(raw_text);
        let outcome = strip::strip(&normalized_text, &self.library);
        let alerts = scan::scan(&outcome.cleaned_text, &self.library);
        let token_count = tokens::estimate(&outcome.cleaned_text);

        FileText {
            file_name: file_name.to_string(),
            raw_text: raw_text.to_string(),
            normalized_text,
            cleaned_text: outcome.cleaned_text,
            removed_spans: outcome.removed_spans,
            alerts,
            token_count,
        }
    }

    /// Assemble processed files, in the given order, into a batch decision.
    pub fn assemble(
        &self,
        files: &[FileText],
        limits: BatchLimits,
    ) -> Result<BatchDecision, EngineError> {
        batch::assemble(files, limits)
    }
}
