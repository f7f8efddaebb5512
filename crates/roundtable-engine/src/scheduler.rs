//! Round-robin turn scheduling.
//!
//! The scheduler owns no state of its own; it reads and advances the
//! cursor fields on [`MeetingState`]. Round numbers are always derived from
//! the eligible message count, never trusted from the cache.

use roundtable_core::error::{MeetingError, Result};
use roundtable_core::meeting::MeetingState;
use roundtable_core::persona::Persona;

/// Determines speaking order over the non-moderator personas.
#[derive(Debug, Clone, Copy, Default)]
pub struct TurnScheduler;

impl TurnScheduler {
    pub fn new() -> Self {
        Self
    }

    /// Returns the persona whose turn is next.
    ///
    /// The speaker is the participant at `current_speaker_index mod N` over
    /// the ordered non-moderator list.
    ///
    /// # Errors
    ///
    /// Returns [`MeetingError::Config`] if there are no non-moderator
    /// personas. Unreachable after roster validation, but kept typed.
    pub fn next_speaker<'a>(&self, state: &'a MeetingState) -> Result<&'a Persona> {
        let participants = state.roster.participants();
        if participants.is_empty() {
            return Err(MeetingError::config("no non-moderator personas to schedule"));
        }
        Ok(participants[state.current_speaker_index % participants.len()])
    }

    /// Advances the cursor after a completed turn.
    ///
    /// Increments the speaker index and the monotonic turn counter. When the
    /// index wraps (every participant has spoken once), the cached round
    /// counter is incremented and per-round scratch state is cleared.
    pub fn advance(&self, state: &mut MeetingState) {
        let n = state.roster.participant_count();
        if n == 0 {
            return;
        }
        state.current_speaker_index += 1;
        state.turn_counter += 1;

        if state.current_speaker_index % n == 0 {
            state.conversation_round += 1;
            state.clear_round_scratch();
            tracing::info!(
                round = state.conversation_round,
                participants = n,
                "round completed, starting next round"
            );
        }
    }

    /// Returns the authoritative current round.
    ///
    /// Derives the round from the eligible message count and overwrites a
    /// divergent cache. Divergence is a bug being corrected, so it is logged
    /// rather than silently trusted.
    pub fn current_round_accurate(&self, state: &mut MeetingState) -> u32 {
        let accurate = state.derived_round();
        if accurate != state.conversation_round {
            tracing::warn!(
                cached = state.conversation_round,
                derived = accurate,
                "round counter out of sync, correcting"
            );
            state.conversation_round = accurate;
        }
        accurate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_core::config::MeetingConfig;
    use roundtable_core::persona::Roster;

    fn state_with(participants: usize) -> MeetingState {
        let mut personas = vec![Persona::moderator("Morgan", "Facilitator")];
        for i in 0..participants {
            personas.push(Persona::new(format!("p{i}"), "analyst", ""));
        }
        MeetingState::new(Roster::new(personas).unwrap(), MeetingConfig::new("topic", 5)).unwrap()
    }

    #[test]
    fn round_robin_skips_moderator() {
        let scheduler = TurnScheduler::new();
        let mut state = state_with(3);

        let mut order = Vec::new();
        for _ in 0..6 {
            let speaker = scheduler.next_speaker(&state).unwrap();
            order.push(speaker.name.clone());
            let id = speaker.id.clone();
            state.append_utterance(&id, "content").unwrap();
            scheduler.advance(&mut state);
        }

        assert_eq!(order, vec!["p0", "p1", "p2", "p0", "p1", "p2"]);
        assert!(order.iter().all(|name| name != "Morgan"));
    }

    #[test]
    fn wrap_increments_round_and_clears_scratch() {
        let scheduler = TurnScheduler::new();
        let mut state = state_with(2);
        state.discussion_focus = "pricing".to_string();
        state.pending_questions.push("what about churn?".to_string());
        state.consecutive_repetitions = 1;

        let ids: Vec<String> = state.roster.participants().iter().map(|p| p.id.clone()).collect();
        state.append_utterance(&ids[0], "a").unwrap();
        scheduler.advance(&mut state);
        assert_eq!(state.conversation_round, 0);
        assert_eq!(state.discussion_focus, "pricing");

        state.append_utterance(&ids[1], "b").unwrap();
        scheduler.advance(&mut state);
        assert_eq!(state.conversation_round, 1);
        assert!(state.discussion_focus.is_empty());
        assert!(state.pending_questions.is_empty());
        assert_eq!(state.consecutive_repetitions, 0);
        assert_eq!(state.turn_counter, 2);
    }

    #[test]
    fn divergent_cache_is_corrected() {
        let scheduler = TurnScheduler::new();
        let mut state = state_with(2);
        let ids: Vec<String> = state.roster.participants().iter().map(|p| p.id.clone()).collect();
        for i in 0..4 {
            state.append_utterance(&ids[i % 2], "content").unwrap();
        }

        state.conversation_round = 7; // simulate drift
        assert_eq!(scheduler.current_round_accurate(&mut state), 2);
        assert_eq!(state.conversation_round, 2);
    }
}
