//! Local token estimation for pre-flight capacity checks.
//!
//! The estimate is `ceil(chars / 4)`, the ~4-characters-per-token heuristic
//! for English prose. It is a pure function of the text, stable across runs
//! and machines, and is never replaced by a remote tokenizer call. Summing
//! per-piece estimates can differ from the estimate of a concatenation by at
//! most one token per piece (ceiling rounding), which is the documented
//! sub-additivity tolerance.

/// Model context ceiling the limits derive from.
pub const MAX_CONTEXT_TOKENS: usize = 200_000;
/// Head-room reserved for the system prompt and the response.
pub const SAFETY_BUFFER: usize = 50_000;
/// Hard ceiling for a batch: beyond this the batch must not be sent.
pub const HARD_LIMIT_DEFAULT: usize = MAX_CONTEXT_TOKENS - SAFETY_BUFFER;
/// Soft warning threshold: 80% of the hard ceiling.
pub const SOFT_LIMIT_DEFAULT: usize = HARD_LIMIT_DEFAULT / 5 * 4;

const CHARS_PER_TOKEN: usize = 4;

/// Estimate the token count of a text blob. Deterministic, total, `>= 0`.
pub fn estimate(text: &str) -> usize {
    text.chars().count().div_ceil(CHARS_PER_TOKEN)
}

/// Capacity thresholds for one batch, supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchLimits {
    pub soft: usize,
    pub hard: usize,
}

impl Default for BatchLimits {
    fn default() -> Self {
        Self {
            soft: SOFT_LIMIT_DEFAULT,
            hard: HARD_LIMIT_DEFAULT,
        }
    }
}
