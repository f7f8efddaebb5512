//! Tunable thresholds and keyword tables for repetition detection.
//!
//! The numeric defaults are empirically tuned values carried over from the
//! production system; they are configuration, not load-bearing precision
//! requirements, and every one of them can be overridden.

use super::lexicon::lowercase_all;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fixed theme taxonomy used for the diversity signal.
///
/// Maps a theme label to the keywords that assign a message to it.
pub type ThemeTaxonomy = BTreeMap<String, Vec<String>>;

/// Builds the default eight-theme taxonomy.
pub fn default_themes() -> ThemeTaxonomy {
    let mut themes = BTreeMap::new();
    let mut add = |label: &str, keywords: &[&str]| {
        themes.insert(label.to_string(), lowercase_all(keywords));
    };
    add("technology", &["ai", "technology", "algorithm", "digital", "automation", "machine learning"]);
    add("market", &["market", "customer", "consumer", "demand", "share", "marketing"]);
    add("finance", &["cost", "revenue", "roi", "investment", "budget", "margin"]);
    add("strategy", &["strategy", "plan", "direction", "goal", "vision", "strategic"]);
    add("risk", &["risk", "concern", "problem", "constraint", "downside", "exposure"]);
    add("execution", &["execution", "implementation", "rollout", "delivery", "development", "operations"]);
    add("product", &["product", "service", "quality", "feature", "user", "experience"]);
    add("competition", &["competitor", "differentiation", "advantage", "comparison", "alternative", "positioning"]);
    themes
}

/// Thresholds and tables for the repetition detector.
///
/// Any single signal is sufficient to flag one evaluation; the controller
/// only acts after `streak_to_act` consecutive flagged evaluations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RepetitionConfig {
    /// Total log length required before detection runs at all.
    pub min_log_len: usize,
    /// How many trailing log entries form the inspection window.
    pub window: usize,
    /// Minimum eligible messages inside the window.
    pub min_recent: usize,
    /// Diversity signal: at most this many distinct themes is repetitive.
    pub theme_floor: usize,
    /// Saturation signal: inspect this many trailing eligible messages.
    pub keyword_window: usize,
    /// Saturation signal: one watch-list phrase this often is repetitive.
    pub keyword_repeat_threshold: usize,
    /// Structural signal: messages inspected for opening patterns.
    pub structural_window: usize,
    /// Structural signal: share of one opening pattern that is repetitive.
    pub structural_threshold: f64,
    /// Progression signal: messages inspected for forward-motion markers.
    pub progression_window: usize,
    /// Progression signal: minimum messages carrying a marker.
    pub progression_min: usize,
    /// Overlap signal: pairwise comparison over this many trailing messages.
    pub overlap_window: usize,
    /// Overlap signal: mean Jaccard similarity above this is repetitive.
    pub overlap_threshold: f64,
    /// Late-stage scan activates from round `original_max_rounds - margin`.
    pub finale_round_margin: u32,
    /// Late-stage scan: trailing messages inspected.
    pub finale_window: usize,
    /// Late-stage scan: finale keywords per message to count it as a finale.
    pub finale_keywords_per_message: usize,
    /// Late-stage scan: finale messages in the window that flag repetition.
    pub finale_flagged_min: usize,
    /// Late-stage scan: occurrences for one skeleton to count as recurring.
    pub skeleton_repeat_min: usize,
    /// Late-stage scan: recurring skeletons needed to flag repetition.
    pub skeleton_distinct_min: usize,
    /// Consecutive flagged evaluations required before acting.
    pub streak_to_act: u32,
    /// Generic/overused phrases for the saturation signal.
    pub watchlist: Vec<String>,
    /// Wrap-up keywords for the late-stage scan.
    pub finale_keywords: Vec<String>,
    /// Sentence skeletons that recur in stuck wrap-up language.
    pub sentence_skeletons: Vec<String>,
    /// Contrast/addition/evidence connectives marking forward motion.
    pub progression_markers: Vec<String>,
    /// Theme taxonomy for the diversity signal.
    pub themes: ThemeTaxonomy,
}

impl Default for RepetitionConfig {
    fn default() -> Self {
        Self {
            min_log_len: 8,
            window: 12,
            min_recent: 6,
            theme_floor: 2,
            keyword_window: 8,
            keyword_repeat_threshold: 3,
            structural_window: 6,
            structural_threshold: 0.7,
            progression_window: 4,
            progression_min: 2,
            overlap_window: 4,
            overlap_threshold: 0.55,
            finale_round_margin: 2,
            finale_window: 6,
            finale_keywords_per_message: 3,
            finale_flagged_min: 4,
            skeleton_repeat_min: 3,
            skeleton_distinct_min: 2,
            streak_to_act: 2,
            watchlist: lowercase_all(&[
                "in conclusion",
                "to wrap up",
                "thank you",
                "sustainable",
                "ai-driven",
                "best possible outcome",
                "for example",
                "as mentioned",
                "moving forward together",
                "brand loyalty",
                "recommendation algorithm",
            ]),
            finale_keywords: lowercase_all(&[
                "in this meeting i",
                "taking the discussion as a whole",
                "concrete action",
                "final position",
                "thank you all",
                "to close",
                "my final",
            ]),
            sentence_skeletons: lowercase_all(&[
                "in this meeting i proposed",
                "taking the discussion as a whole",
                "as concrete next steps",
                "i agree with the point",
                "thank you all for",
            ]),
            progression_markers: lowercase_all(&[
                "in addition",
                "furthermore",
                "however",
                "on the other hand",
                "for example",
                "specifically",
                "in contrast",
                "the data shows",
                "in my experience",
                "alternatively",
                "to build on",
                "whereas",
                "a new angle",
            ]),
            themes: default_themes(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_taxonomy_has_eight_themes() {
        assert_eq!(default_themes().len(), 8);
    }

    #[test]
    fn thresholds_override_from_toml() {
        let config: RepetitionConfig = toml::from_str(
            r#"
            overlap_threshold = 0.8
            streak_to_act = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.overlap_threshold, 0.8);
        assert_eq!(config.streak_to_act, 3);
        // Untouched values keep the tuned defaults.
        assert_eq!(config.keyword_repeat_threshold, 3);
        assert_eq!(config.themes.len(), 8);
    }
}
