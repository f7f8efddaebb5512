//! Meeting state aggregate.
//!
//! `MeetingState` is the single unit of mutable state for one meeting. It is
//! created once per session, mutated exclusively by the controller and
//! scheduler on each turn, and deactivated exactly once.

use super::message::{Message, MessageLog};
use crate::config::MeetingConfig;
use crate::error::{MeetingError, Result};
use crate::persona::Roster;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::Display;

/// Logical phase of the round/extension state machine.
///
/// The phase is derived from state, never stored, so it cannot drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum MeetingPhase {
    /// Below the configured round floor; no stopping condition runs.
    Active,
    /// At the configured floor, extension not yet granted.
    ExtensionDecision,
    /// Extension granted; closure, repetition, and duration checks apply.
    Extended,
    /// Terminal. No further speaker is scheduled.
    Concluded,
}

/// One-shot moderator notice flags.
///
/// Each flag transitions false → true at most once over the meeting's
/// lifetime and is never reset; this is what guarantees no transition notice
/// is ever double-emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notices {
    /// Closing message for a meeting that concluded at the configured floor.
    pub final_message_sent: bool,
    /// Two-round extension announcement.
    pub extension_announced: bool,
    /// "Last round" instructions at the head of the final extended round.
    pub final_round_announced: bool,
    /// Closing message at the end of the extended rounds.
    pub final_closure_sent: bool,
}

/// Snapshot of engine state sufficient for a UI to render live status
/// without re-deriving engine internals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingStatus {
    pub phase: MeetingPhase,
    pub current_round: u32,
    pub max_rounds: u32,
    pub is_active: bool,
    pub turn_counter: u64,
    pub message_count: usize,
    pub notices: Notices,
}

/// The aggregate root for one virtual meeting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingState {
    /// Participant registry, ordering fixed at creation.
    pub roster: Roster,
    /// Append-only transcript.
    pub log: MessageLog,
    /// Discussion topic.
    pub topic: String,
    /// Round-robin cursor over non-moderator personas.
    pub current_speaker_index: usize,
    /// Monotonically increasing turn count, separate from rounds.
    pub turn_counter: u64,
    /// Cached round counter. The derived value is authoritative; divergence
    /// is corrected by the scheduler, never trusted.
    pub conversation_round: u32,
    /// The user-configured round floor. Never changes.
    pub original_max_rounds: u32,
    /// Working round ceiling; `original_max_rounds + 2` once extended.
    pub max_rounds: u32,
    /// Whether the one-time two-round extension was granted.
    pub extension_granted: bool,
    /// Per-round scratch: current discussion focus.
    pub discussion_focus: String,
    /// Per-round scratch: questions raised but not yet resolved.
    pub pending_questions: Vec<String>,
    /// Consecutive repetition-detector flags; reset each round.
    pub consecutive_repetitions: u32,
    /// When the meeting started (UTC).
    pub started_at: DateTime<Utc>,
    /// Wall-clock budget in minutes, enforced only in extension rounds.
    pub meeting_duration_minutes: u64,
    /// Whether turns are paced with a human-plausible delay.
    pub natural_timing: bool,
    /// Cancellation flag, checked before scheduling each turn.
    pub is_active: bool,
    /// One-shot moderator notice flags.
    pub notices: Notices,
}

impl MeetingState {
    /// Creates a meeting from a validated roster and configuration.
    ///
    /// # Errors
    ///
    /// Returns [`MeetingError::Config`] for a non-positive round budget.
    /// Roster constraints are enforced by [`Roster::new`].
    pub fn new(roster: Roster, config: MeetingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            roster,
            log: MessageLog::new(),
            topic: config.topic,
            current_speaker_index: 0,
            turn_counter: 0,
            conversation_round: 0,
            original_max_rounds: config.max_rounds,
            max_rounds: config.max_rounds,
            extension_granted: false,
            discussion_focus: String::new(),
            pending_questions: Vec::new(),
            consecutive_repetitions: 0,
            started_at: Utc::now(),
            meeting_duration_minutes: config.meeting_duration_minutes,
            natural_timing: config.natural_timing,
            is_active: true,
            notices: Notices::default(),
        })
    }

    /// Appends a scheduled utterance for the given persona.
    ///
    /// The moderator flag is copied from the speaker at append time.
    ///
    /// # Errors
    ///
    /// Returns [`MeetingError::PersonaNotFound`] for an unknown persona id.
    pub fn append_utterance(&mut self, persona_id: &str, content: impl Into<String>) -> Result<&Message> {
        let persona = self
            .roster
            .find(persona_id)
            .ok_or_else(|| MeetingError::PersonaNotFound(persona_id.to_string()))?;
        let (id, name, is_moderator) = (persona.id.clone(), persona.name.clone(), persona.is_moderator);
        Ok(self.log.append(id, name, content, false, is_moderator))
    }

    /// Appends an operator-injected message for the given persona.
    ///
    /// Human input never counts toward round arithmetic.
    pub fn append_human_input(&mut self, persona_id: &str, content: impl Into<String>) -> Result<&Message> {
        let persona = self
            .roster
            .find(persona_id)
            .ok_or_else(|| MeetingError::PersonaNotFound(persona_id.to_string()))?;
        let (id, name, is_moderator) = (persona.id.clone(), persona.name.clone(), persona.is_moderator);
        Ok(self.log.append(id, name, content, true, is_moderator))
    }

    /// Appends a moderator notice, if a moderator is configured.
    ///
    /// Returns whether a notice was actually appended.
    pub fn append_moderator_notice(&mut self, content: impl Into<String>) -> bool {
        match self.roster.moderator() {
            Some(moderator) => {
                let (id, name) = (moderator.id.clone(), moderator.name.clone());
                self.log.append(id, name, content, false, true);
                true
            }
            None => false,
        }
    }

    /// Derives the current round from the eligible message count.
    ///
    /// This is the authoritative value: `floor((k - 1) / N) + 1` for `k >= 1`
    /// eligible messages over `N` participants, and `0` for an empty log.
    /// The cached `conversation_round` must always equal it.
    pub fn derived_round(&self) -> u32 {
        let n = self.roster.participant_count();
        if n == 0 {
            // Unreachable after roster validation; treated like an empty log.
            return 0;
        }
        let k = self.log.eligible_count();
        if k == 0 {
            0
        } else {
            ((k - 1) / n) as u32 + 1
        }
    }

    /// Derived phase of the round/extension state machine.
    pub fn phase(&self) -> MeetingPhase {
        if !self.is_active {
            return MeetingPhase::Concluded;
        }
        let round = self.derived_round();
        if round < self.original_max_rounds {
            MeetingPhase::Active
        } else if !self.extension_granted {
            MeetingPhase::ExtensionDecision
        } else {
            MeetingPhase::Extended
        }
    }

    /// Stops scheduling further turns. Idempotent.
    ///
    /// An in-flight generation call is allowed to complete and its result is
    /// still appended; this flag only prevents the next turn.
    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    /// Clears per-round scratch state at a round boundary.
    pub fn clear_round_scratch(&mut self) {
        self.discussion_focus.clear();
        self.pending_questions.clear();
        self.consecutive_repetitions = 0;
    }

    /// Whether the wall-clock budget is exhausted.
    pub fn over_duration_budget(&self) -> bool {
        let elapsed = Utc::now().signed_duration_since(self.started_at);
        elapsed.num_milliseconds() > (self.meeting_duration_minutes as i64) * 60_000
    }

    /// Status snapshot for external consumers.
    pub fn status(&self) -> MeetingStatus {
        MeetingStatus {
            phase: self.phase(),
            current_round: self.derived_round(),
            max_rounds: self.max_rounds,
            is_active: self.is_active,
            turn_counter: self.turn_counter,
            message_count: self.log.len(),
            notices: self.notices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persona::Persona;

    fn three_party_state() -> MeetingState {
        let roster = Roster::new(vec![
            Persona::moderator("Morgan", "Facilitator"),
            Persona::new("Ada", "CTO", ""),
            Persona::new("Grace", "CFO", ""),
            Persona::new("Linus", "COO", ""),
        ])
        .unwrap();
        MeetingState::new(roster, MeetingConfig::new("expansion plan", 2)).unwrap()
    }

    #[test]
    fn derived_round_tracks_eligible_prefixes() {
        let mut state = three_party_state();
        assert_eq!(state.derived_round(), 0);

        let ids: Vec<String> = state.roster.participants().iter().map(|p| p.id.clone()).collect();
        let expected = [1, 1, 1, 2, 2, 2, 3];
        for (k, want) in expected.iter().enumerate() {
            state.append_utterance(&ids[k % 3], format!("turn {k}")).unwrap();
            assert_eq!(state.derived_round(), *want, "after {} messages", k + 1);
        }
    }

    #[test]
    fn moderator_messages_do_not_advance_rounds() {
        let mut state = three_party_state();
        state.append_moderator_notice("welcome everyone");
        assert_eq!(state.derived_round(), 0);
        assert_eq!(state.log.len(), 1);
    }

    #[test]
    fn phase_derivation() {
        let mut state = three_party_state();
        assert_eq!(state.phase(), MeetingPhase::Active);

        let ids: Vec<String> = state.roster.participants().iter().map(|p| p.id.clone()).collect();
        for k in 0..6 {
            state.append_utterance(&ids[k % 3], "content").unwrap();
        }
        assert_eq!(state.phase(), MeetingPhase::ExtensionDecision);

        state.extension_granted = true;
        state.max_rounds = state.original_max_rounds + 2;
        assert_eq!(state.phase(), MeetingPhase::Extended);

        state.deactivate();
        assert_eq!(state.phase(), MeetingPhase::Concluded);
    }

    #[test]
    fn deactivate_is_idempotent() {
        let mut state = three_party_state();
        state.deactivate();
        state.deactivate();
        assert!(!state.is_active);
    }

    #[test]
    fn round_is_zero_without_participants() {
        // Deserialization is the only way past roster validation.
        let roster: Roster = serde_json::from_str(r#"{"personas": []}"#).unwrap();
        let state = MeetingState::new(roster, MeetingConfig::new("topic", 2)).unwrap();
        assert_eq!(state.derived_round(), 0);
        assert_eq!(state.phase(), MeetingPhase::Active);
    }

    #[test]
    fn status_snapshot_serializes_for_ui_consumers() {
        let mut state = three_party_state();
        let id = state.roster.participants()[0].id.clone();
        state.append_utterance(&id, "opening point").unwrap();

        let json = serde_json::to_value(state.status()).unwrap();
        assert_eq!(json["phase"], "Active");
        assert_eq!(json["current_round"], 1);
        assert_eq!(json["max_rounds"], 2);
        assert_eq!(json["message_count"], 1);
        assert_eq!(json["notices"]["extension_announced"], false);
    }

    #[test]
    fn unknown_persona_is_rejected() {
        let mut state = three_party_state();
        let err = state.append_utterance("no-such-id", "hello").unwrap_err();
        assert!(matches!(err, MeetingError::PersonaNotFound(_)));
    }
}
