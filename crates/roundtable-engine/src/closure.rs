//! Closure validation.
//!
//! Inspects final-round statements for the elements a genuine wrap-up must
//! contain: a personal summary, an overall conclusion, an action plan, a
//! reference to other participants, and gratitude. Also detects statements
//! that try to reopen the debate instead of closing it.

use crate::heuristics::{ClosureLexicon, matches_any};
use roundtable_core::meeting::{Message, MeetingState};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Per-statement validation flags.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StatementValidation {
    pub has_personal_summary: bool,
    pub has_overall_conclusion: bool,
    pub has_action_plan: bool,
    pub has_participant_connection: bool,
    pub has_gratitude: bool,
    /// The statement tries to keep the debate open.
    pub is_continuing_discussion: bool,
    /// ≥4 of 5 elements, adequate length, and no continuation attempt.
    pub is_complete: bool,
}

impl StatementValidation {
    /// Number of the five wrap-up elements present (0..=5).
    pub fn quality_score(&self) -> usize {
        [
            self.has_personal_summary,
            self.has_overall_conclusion,
            self.has_action_plan,
            self.has_participant_connection,
            self.has_gratitude,
        ]
        .iter()
        .filter(|&&flag| flag)
        .count()
    }
}

/// Per-participant result of the mid-final-round closure analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantClosure {
    pub has_spoken: bool,
    /// Wrap-up element count, with a −2 penalty for continuation attempts.
    pub quality_score: i32,
    pub is_trying_to_continue: bool,
    /// Concrete reasons this participant's wrap-up is incomplete.
    pub issues: Vec<String>,
}

/// Aggregate result of [`ClosureValidator::analyze_participant_statements`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosureAnalysis {
    pub can_conclude: bool,
    pub total_participants: usize,
    pub spoken_participants: usize,
    pub high_quality_conclusions: usize,
    pub continuation_attempts: usize,
    pub participants: BTreeMap<String, ParticipantClosure>,
    /// Populated when `can_conclude` is false.
    pub reasons: Vec<String>,
}

/// Validates whether a meeting has genuinely concluded.
#[derive(Debug, Clone, Default)]
pub struct ClosureValidator {
    lexicon: ClosureLexicon,
}

impl ClosureValidator {
    pub fn new(lexicon: ClosureLexicon) -> Self {
        Self { lexicon }
    }

    /// Validates one statement against the five wrap-up categories.
    pub fn validate_final_statement(&self, statement: &str) -> StatementValidation {
        let lower = statement.to_lowercase();
        let lex = &self.lexicon;

        let is_continuing = matches_any(&lower, &lex.continuation)
            || matches_any(&lower, &lex.strong_continuation);

        let mut validation = StatementValidation {
            has_personal_summary: matches_any(&lower, &lex.personal_summary),
            has_overall_conclusion: matches_any(&lower, &lex.overall_conclusion),
            has_action_plan: matches_any(&lower, &lex.action_plan),
            has_participant_connection: matches_any(&lower, &lex.participant_connection),
            has_gratitude: matches_any(&lower, &lex.gratitude),
            is_continuing_discussion: is_continuing,
            is_complete: false,
        };

        let adequate_length = statement.chars().count() >= lex.min_statement_len;
        validation.is_complete =
            !is_continuing && validation.quality_score() >= 4 && adequate_length;
        validation
    }

    /// Whether the meeting wrapped up properly at the configured round floor.
    ///
    /// Requires all three of:
    /// 1. every participant expressed gratitude in the final round,
    /// 2. ≥80% of participants scored ≥4/5 (gratitude included),
    /// 3. gratitude phrases across the last three rounds reached at least
    ///    twice the participant count (redundant wrap-up, not fresh content).
    pub fn is_meeting_properly_concluded(&self, state: &MeetingState) -> bool {
        let total = state.roster.participant_count();
        if total == 0 {
            return false;
        }

        let final_round = state.original_max_rounds;
        let last_round_messages = messages_from_round(state, final_round);
        if last_round_messages.len() < total {
            return false;
        }

        let mut perfect_conclusions = 0usize;
        let mut gratitude_count = 0usize;
        for msg in &last_round_messages {
            let validation = self.validate_final_statement(&msg.content);
            if validation.has_gratitude && validation.quality_score() >= 4 {
                perfect_conclusions += 1;
            }
            if validation.has_gratitude {
                gratitude_count += 1;
            }
        }

        let window_start = final_round.saturating_sub(2).max(1);
        let recent_round_messages = messages_from_round(state, window_start);
        let excessive_gratitude = recent_round_messages
            .iter()
            .filter(|m| matches_any(&m.content.to_lowercase(), &self.lexicon.gratitude))
            .count();

        let all_expressed_gratitude = gratitude_count >= total;
        let mostly_perfect = perfect_conclusions as f64 >= total as f64 * 0.8;
        let redundant_wrap_up = excessive_gratitude >= total * 2;

        all_expressed_gratitude && mostly_perfect && redundant_wrap_up
    }

    /// Per-participant closure analysis over the last three rounds.
    ///
    /// Used mid-final-round to decide whether any participant is still
    /// trying to reopen debate; any such attempt disqualifies the round from
    /// concluding regardless of quality scores.
    pub fn analyze_participant_statements(&self, state: &MeetingState) -> ClosureAnalysis {
        let participants = state.roster.participants();
        let total = participants.len();
        if total == 0 {
            return ClosureAnalysis {
                can_conclude: false,
                total_participants: 0,
                spoken_participants: 0,
                high_quality_conclusions: 0,
                continuation_attempts: 0,
                participants: BTreeMap::new(),
                reasons: vec!["no participants".to_string()],
            };
        }

        let current_round = state.derived_round();
        let window_start = current_round.saturating_sub(2).max(1);
        let window = messages_from_round(state, window_start);

        let mut details = BTreeMap::new();
        let mut spoken = 0usize;
        let mut high_quality = 0usize;
        let mut continuation_attempts = 0usize;

        for persona in &participants {
            let latest = window.iter().rev().find(|m| m.persona_id == persona.id);
            let Some(latest) = latest else {
                details.insert(
                    persona.name.clone(),
                    ParticipantClosure {
                        has_spoken: false,
                        quality_score: 0,
                        is_trying_to_continue: false,
                        issues: vec!["no statement in recent rounds".to_string()],
                    },
                );
                continue;
            };
            spoken += 1;

            let validation = self.validate_final_statement(&latest.content);
            let mut issues = Vec::new();
            if !validation.has_personal_summary {
                issues.push("missing personal summary".to_string());
            }
            if !validation.has_overall_conclusion {
                issues.push("missing overall conclusion".to_string());
            }
            if !validation.has_action_plan {
                issues.push("missing action plan".to_string());
            }
            if !validation.has_participant_connection {
                issues.push("missing reference to other participants".to_string());
            }
            if !validation.has_gratitude {
                issues.push("missing gratitude".to_string());
            }

            let mut score = validation.quality_score() as i32;
            if validation.is_continuing_discussion {
                issues.push("attempting to continue the discussion".to_string());
                score -= 2;
                continuation_attempts += 1;
            }
            if score >= 4 {
                high_quality += 1;
            }

            details.insert(
                persona.name.clone(),
                ParticipantClosure {
                    has_spoken: true,
                    quality_score: score,
                    is_trying_to_continue: validation.is_continuing_discussion,
                    issues,
                },
            );
        }

        let can_conclude = spoken == total
            && high_quality as f64 >= total as f64 * 0.8
            && continuation_attempts == 0;

        let mut reasons = Vec::new();
        if !can_conclude {
            if spoken < total {
                reasons.push(format!("{} participant(s) have not spoken yet", total - spoken));
            }
            if (high_quality as f64) < total as f64 * 0.8 {
                reasons.push(format!(
                    "{} participant(s) gave an incomplete wrap-up",
                    total - high_quality
                ));
            }
            if continuation_attempts > 0 {
                reasons.push(format!(
                    "{continuation_attempts} participant(s) tried to continue the discussion"
                ));
            }
        }

        ClosureAnalysis {
            can_conclude,
            total_participants: total,
            spoken_participants: spoken,
            high_quality_conclusions: high_quality,
            continuation_attempts,
            participants: details,
            reasons,
        }
    }

    /// Verifies that a set of final-round statements completes the meeting.
    ///
    /// A statement counts as complete with ≥4 of the 5 wrap-up elements and
    /// adequate length; ≥80% of participants must be complete.
    pub fn verify_final_round_completion(&self, final_round: &[&Message], total_participants: usize) -> bool {
        if final_round.is_empty() || total_participants == 0 {
            return false;
        }

        let completed = final_round
            .iter()
            .filter(|msg| {
                let validation = self.validate_final_statement(&msg.content);
                let substantial = msg.content.chars().count() >= self.lexicon.min_statement_len;
                validation.quality_score() >= 4 && substantial
            })
            .count();

        completed as f64 / total_participants as f64 >= 0.8
    }

    /// True once every participant has spoken in the current round.
    ///
    /// Deliberately ignores statement quality: the controller runs
    /// [`Self::verify_round`] separately once this is true, and the verdict
    /// only selects the closing message, never whether to conclude.
    pub fn is_final_round_completed(&self, state: &MeetingState) -> bool {
        let participants = state.roster.participants();
        if participants.is_empty() {
            return true;
        }

        let current_round = state.derived_round();
        if current_round == 0 {
            return false;
        }

        let speakers: HashSet<&str> = messages_from_round(state, current_round)
            .iter()
            .map(|m| m.persona_id.as_str())
            .collect();
        speakers.len() >= participants.len()
    }

    /// Verifies the statements of round `round` and later.
    pub fn verify_round(&self, state: &MeetingState, round: u32) -> bool {
        let messages = messages_from_round(state, round);
        self.verify_final_round_completion(&messages, state.roster.participant_count())
    }
}

/// Eligible messages belonging to round `start_round` and later.
///
/// A message's round is derived from its position among eligible messages:
/// `idx / N + 1` over `N` participants.
fn messages_from_round(state: &MeetingState, start_round: u32) -> Vec<&Message> {
    let n = state.roster.participant_count();
    if n == 0 {
        return Vec::new();
    }
    state
        .log
        .eligible()
        .into_iter()
        .enumerate()
        .filter(|(idx, _)| (idx / n) as u32 + 1 >= start_round)
        .map(|(_, msg)| msg)
        .collect()
}
