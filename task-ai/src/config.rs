//! Tunables for the extraction pipeline.

use std::time::Duration;

/// Fraction of a window that a natural break (newline, ". ", ", ") must lie beyond
/// before it is preferred over a hard cut.
pub const BOUNDARY_RATIO: f64 = 0.4;

/// Extraction settings handed explicitly to every pipeline component.
///
/// The service builds this from its CLI/env configuration; tests build it with
/// small values (e.g. a 20 character chunk budget and a zero retry backoff).
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Maximum characters per transcript chunk sent to the model.
    pub chunk_max_chars: usize,
    /// Attempts per (model, chunk) pair before the gateway gives up.
    pub max_attempts: u32,
    /// Fixed delay between two gateway attempts.
    pub retry_backoff: Duration,
    /// Maximum characters of a cleaned task text.
    pub max_text_len: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            chunk_max_chars: 3000,
            max_attempts: 2,
            retry_backoff: Duration::from_millis(500),
            max_text_len: 120,
        }
    }
}

impl Config {
    pub fn with_chunk_max_chars(mut self, chunk_max_chars: usize) -> Self {
        self.chunk_max_chars = chunk_max_chars;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_retry_backoff(mut self, retry_backoff: Duration) -> Self {
        self.retry_backoff = retry_backoff;
        self
    }

    pub fn with_max_text_len(mut self, max_text_len: usize) -> Self {
        self.max_text_len = max_text_len;
        self
    }
}

/// Index (in characters) below which a break point is considered too early.
pub(crate) fn boundary_threshold(window: usize) -> usize {
    (window as f64 * BOUNDARY_RATIO) as usize
}
