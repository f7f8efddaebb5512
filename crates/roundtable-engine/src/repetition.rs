//! Repetition detection.
//!
//! Flags thematic and structural stagnation across recent turns. Each
//! evaluation inspects a trailing window of eligible messages; any single
//! signal flags the evaluation, and the controller acts only after a streak
//! of consecutive flagged evaluations.

use crate::heuristics::{RepetitionConfig, count_matches, matches_any};
use roundtable_core::meeting::{Message, MeetingState};
use std::collections::{HashMap, HashSet};

/// Detects repetitive conversation over the recent message window.
#[derive(Debug, Clone, Default)]
pub struct RepetitionDetector {
    config: RepetitionConfig,
}

impl RepetitionDetector {
    pub fn new(config: RepetitionConfig) -> Self {
        Self { config }
    }

    /// Runs one evaluation and updates the streak counter in state.
    ///
    /// Returns true once the streak reaches the configured threshold; the
    /// caller then terminates the meeting. The streak resets on any clean
    /// evaluation and at every round boundary.
    pub fn evaluate(&self, state: &mut MeetingState) -> bool {
        if state.log.len() < self.config.min_log_len {
            return false;
        }
        let recent = state.log.recent_eligible(self.config.window);
        if recent.len() < self.config.min_recent {
            return false;
        }

        if self.evaluate_window(state) {
            state.consecutive_repetitions += 1;
            tracing::debug!(
                streak = state.consecutive_repetitions,
                "repetition signal flagged"
            );
        } else {
            state.consecutive_repetitions = 0;
        }
        state.consecutive_repetitions >= self.config.streak_to_act
    }

    /// Runs the signals over the current window without touching the streak.
    pub fn evaluate_window(&self, state: &MeetingState) -> bool {
        let recent = state.log.recent_eligible(self.config.window);
        if recent.len() < self.config.min_recent {
            return false;
        }

        // Late-stage finale scan overrides the generic thresholds near and
        // past the configured round floor.
        let round = state.derived_round();
        let late_stage_from = state
            .original_max_rounds
            .saturating_sub(self.config.finale_round_margin);
        if round >= late_stage_from && self.finale_patterns_stuck(&recent) {
            return true;
        }

        self.low_theme_diversity(&recent)
            || self.keyword_saturated(&recent)
            || self.structurally_similar(&recent)
            || !self.has_progression(&recent)
            || self.lexically_overlapping(&recent)
    }

    /// Signal 6: specific closing-phrase combinations recurring across the
    /// trailing window, or the same sentence skeleton re-delivered.
    fn finale_patterns_stuck(&self, recent: &[&Message]) -> bool {
        let window = tail(recent, self.config.finale_window);

        let finale_messages = window
            .iter()
            .filter(|m| {
                count_matches(&m.content.to_lowercase(), &self.config.finale_keywords)
                    >= self.config.finale_keywords_per_message
            })
            .count();
        if finale_messages >= self.config.finale_flagged_min {
            return true;
        }

        let recurring_skeletons = self
            .config
            .sentence_skeletons
            .iter()
            .filter(|skeleton| {
                window
                    .iter()
                    .filter(|m| m.content.to_lowercase().contains(skeleton.as_str()))
                    .count()
                    >= self.config.skeleton_repeat_min
            })
            .count();
        recurring_skeletons >= self.config.skeleton_distinct_min
    }

    /// Signal 1: too few distinct themes across the window.
    fn low_theme_diversity(&self, recent: &[&Message]) -> bool {
        let mut themes: HashSet<&str> = HashSet::new();
        for msg in recent {
            let lower = msg.content.to_lowercase();
            for (theme, keywords) in &self.config.themes {
                if matches_any(&lower, keywords) {
                    themes.insert(theme.as_str());
                }
            }
        }
        themes.len() <= self.config.theme_floor
    }

    /// Signal 2: one watch-list phrase saturating the trailing messages.
    fn keyword_saturated(&self, recent: &[&Message]) -> bool {
        let window = tail(recent, self.config.keyword_window);
        self.config.watchlist.iter().any(|phrase| {
            window
                .iter()
                .filter(|m| m.content.to_lowercase().contains(phrase.as_str()))
                .count()
                >= self.config.keyword_repeat_threshold
        })
    }

    /// Signal 3: one opening pattern dominating recent messages.
    fn structurally_similar(&self, recent: &[&Message]) -> bool {
        let window = tail(recent, self.config.structural_window);
        let mut patterns: HashMap<String, usize> = HashMap::new();
        let mut total = 0usize;
        for msg in window {
            if let Some(opening) = opening_pattern(&msg.content) {
                *patterns.entry(opening).or_insert(0) += 1;
                total += 1;
            }
        }
        if total < 3 {
            return false;
        }
        let max = patterns.values().copied().max().unwrap_or(0);
        max as f64 / total as f64 > self.config.structural_threshold
    }

    /// Signal 4: presence of forward-motion markers in recent messages.
    fn has_progression(&self, recent: &[&Message]) -> bool {
        let window = tail(recent, self.config.progression_window);
        if window.len() < self.config.progression_window {
            return true;
        }
        let carrying = window
            .iter()
            .filter(|m| matches_any(&m.content.to_lowercase(), &self.config.progression_markers))
            .count();
        carrying >= self.config.progression_min
    }

    /// Signal 5: mean pairwise Jaccard word overlap over the last messages.
    fn lexically_overlapping(&self, recent: &[&Message]) -> bool {
        let window = tail(recent, self.config.overlap_window);
        if window.len() < 2 {
            return false;
        }
        let mut similarities = Vec::new();
        for i in 0..window.len() - 1 {
            for j in (i + 1)..window.len() {
                similarities.push(jaccard(&window[i].content, &window[j].content));
            }
        }
        let mean = similarities.iter().sum::<f64>() / similarities.len() as f64;
        mean > self.config.overlap_threshold
    }
}

fn tail<'a, 'b>(messages: &'b [&'a Message], n: usize) -> &'b [&'a Message] {
    let start = messages.len().saturating_sub(n);
    &messages[start..]
}

/// First two-to-three words of the message's opening sentence.
fn opening_pattern(content: &str) -> Option<String> {
    let first_sentence = content.split('.').next()?.trim();
    let words: Vec<&str> = first_sentence.split_whitespace().take(3).collect();
    if words.len() < 2 {
        return None;
    }
    Some(words.join(" ").to_lowercase())
}

/// Jaccard similarity of the two texts' lowercased word sets.
fn jaccard(a: &str, b: &str) -> f64 {
    let a_lower = a.to_lowercase();
    let b_lower = b.to_lowercase();
    let words_a: HashSet<&str> = a_lower.split_whitespace().collect();
    let words_b: HashSet<&str> = b_lower.split_whitespace().collect();
    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }
    let intersection = words_a.intersection(&words_b).count();
    let union = words_a.union(&words_b).count();
    intersection as f64 / union as f64
}
