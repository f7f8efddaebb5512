//! Meeting configuration.
//!
//! Consumed once at meeting creation. Validation failures here are the only
//! fatal errors the engine produces; everything at runtime is recovered.

use crate::error::{MeetingError, Result};
use serde::{Deserialize, Serialize};

/// User-supplied meeting settings.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct MeetingConfig {
    /// Discussion topic, forwarded to the utterance generator.
    pub topic: String,
    /// Number of full rounds the meeting must run before any stopping
    /// condition is evaluated.
    pub max_rounds: u32,
    /// Wall-clock budget in minutes, enforced only in extension rounds.
    #[serde(default = "default_duration_minutes")]
    pub meeting_duration_minutes: u64,
    /// Whether turns are paced with a human-plausible delay.
    #[serde(default = "default_natural_timing")]
    pub natural_timing: bool,
}

fn default_duration_minutes() -> u64 {
    30
}

fn default_natural_timing() -> bool {
    true
}

impl MeetingConfig {
    /// Creates a config with default duration and pacing.
    pub fn new(topic: impl Into<String>, max_rounds: u32) -> Self {
        Self {
            topic: topic.into(),
            max_rounds,
            meeting_duration_minutes: default_duration_minutes(),
            natural_timing: default_natural_timing(),
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MeetingError::Config`] if the round budget is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_rounds == 0 {
            return Err(MeetingError::config("max_rounds must be positive"));
        }
        Ok(())
    }
}
