//! Natural pacing delays.
//!
//! Computes a human-plausible delay before each utterance is delivered.
//! Purely cosmetic: the delay never affects correctness or termination
//! decisions, and is skipped entirely when pacing is disabled.

use rand::Rng;
use std::time::Duration;

/// Tunable pacing parameters.
#[derive(Debug, Clone, Copy)]
pub struct TimingConfig {
    /// Seconds of base delay per character.
    pub per_char_secs: f64,
    /// Extra seconds for messages past 200 characters.
    pub long_bonus_secs: f64,
    /// Further extra seconds for messages past 300 characters.
    pub very_long_bonus_secs: f64,
    /// Jitter factor range applied multiplicatively.
    pub jitter: (f64, f64),
    /// Clamp bounds in seconds.
    pub min_secs: f64,
    pub max_secs: f64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            per_char_secs: 0.02,
            long_bonus_secs: 2.0,
            very_long_bonus_secs: 3.0,
            jitter: (0.7, 1.3),
            min_secs: 2.0,
            max_secs: 15.0,
        }
    }
}

/// Computes per-utterance delivery delays.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimingController {
    config: TimingConfig,
}

impl TimingController {
    pub fn new(config: TimingConfig) -> Self {
        Self { config }
    }

    /// Delay before delivering an utterance of `content_len` characters.
    pub fn natural_delay(&self, content_len: usize) -> Duration {
        let jitter = rand::thread_rng().gen_range(self.config.jitter.0..=self.config.jitter.1);
        self.delay_with_jitter(content_len, jitter)
    }

    fn delay_with_jitter(&self, content_len: usize, jitter: f64) -> Duration {
        let cfg = &self.config;
        let mut delay = content_len as f64 * cfg.per_char_secs;
        if content_len > 200 {
            delay += cfg.long_bonus_secs;
        }
        if content_len > 300 {
            delay += cfg.very_long_bonus_secs;
        }
        let total = (delay * jitter).clamp(cfg.min_secs, cfg.max_secs);
        Duration::from_secs_f64(total)
    }
}
