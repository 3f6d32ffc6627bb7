use std::time::Duration;

use serde::{Deserialize, Serialize};
use studio_core::DEFAULT_MAX_SUGGESTIONS;

/// Timing and sizing knobs for the simulated upload pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerSettings {
    /// Lower bound of the randomized per-file settle delay.
    pub completion_delay_min_ms: u64,
    /// Upper bound (inclusive) of the randomized per-file settle delay.
    pub completion_delay_max_ms: u64,
    /// Fixed delay of the simulated extraction for non-text files.
    pub extraction_delay_ms: u64,
    pub max_suggestions: usize,
    /// Largest plain-text file read for extraction.
    pub max_read_bytes: u64,
    /// Seed for the delay generator; `None` seeds from entropy.
    pub rng_seed: Option<u64>,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            completion_delay_min_ms: 2_000,
            completion_delay_max_ms: 4_000,
            extraction_delay_ms: 500,
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            max_read_bytes: 5 * 1024 * 1024,
            rng_seed: None,
        }
    }
}

impl TrackerSettings {
    /// Settle delay bounds in milliseconds, ordered even if configured backwards.
    pub fn completion_delay_bounds(&self) -> (u64, u64) {
        let (a, b) = (self.completion_delay_min_ms, self.completion_delay_max_ms);
        (a.min(b), a.max(b))
    }

    pub fn extraction_delay(&self) -> Duration {
        Duration::from_millis(self.extraction_delay_ms)
    }

    /// Longest a settle can take; advancing virtual time by this much settles every upload.
    pub fn max_completion_delay(&self) -> Duration {
        Duration::from_millis(self.completion_delay_bounds().1)
    }
}
