//! Utterance generation seam.
//!
//! The engine treats "ask the model for the next utterance" as an opaque
//! external call behind this trait. Prompt construction, transport, and
//! model selection all live on the other side of it.

use async_trait::async_trait;
use roundtable_core::error::Result;
use roundtable_core::meeting::MeetingState;
use roundtable_core::persona::Persona;
use serde::{Deserialize, Serialize};

/// How many trailing messages the context window carries.
const HISTORY_WINDOW: usize = 10;

/// Everything a generator needs to produce the next utterance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeetingContext {
    /// Discussion topic.
    pub topic: String,
    /// Accurate current round (the round this turn belongs to).
    pub round: u32,
    /// Working round ceiling.
    pub max_rounds: u32,
    /// Whether this turn falls in the final extended round.
    pub is_final_round: bool,
    /// Formatted trailing transcript window, one "Name: content" line per
    /// message.
    pub history: String,
    /// Extra wrap-up instructions, present only in the final round.
    pub final_round_instructions: Option<String>,
}

impl MeetingContext {
    /// Builds the context for the upcoming turn.
    pub fn for_next_turn(state: &MeetingState) -> Self {
        // The upcoming turn extends the log by one eligible message.
        let n = state.roster.participant_count().max(1);
        let upcoming_round = (state.log.eligible_count() / n) as u32 + 1;
        let is_final_round = state.extension_granted && upcoming_round >= state.max_rounds;

        let history = state
            .log
            .recent(HISTORY_WINDOW)
            .iter()
            .map(|m| format!("{}: {}", m.persona_name, m.content))
            .collect::<Vec<_>>()
            .join("\n");

        let final_round_instructions = is_final_round.then(|| {
            "This is your last statement of the meeting. Include all five wrap-up \
             elements: a summary of your own prior contributions, the overall \
             conclusion of the discussion, concrete next steps, the points you \
             share with other participants, and thanks to the group."
                .to_string()
        });

        Self {
            topic: state.topic.clone(),
            round: upcoming_round,
            max_rounds: state.max_rounds,
            is_final_round,
            history,
            final_round_instructions,
        }
    }
}

/// An abstract source of persona utterances.
///
/// Implementations wrap an LLM backend. Failures are returned as
/// [`MeetingError::Generation`](roundtable_core::MeetingError::Generation)
/// and recovered by the runner; they are never fatal to the meeting.
#[async_trait]
pub trait UtteranceGenerator: Send + Sync {
    /// Produces the next utterance for `persona` given the meeting context.
    async fn generate(&self, persona: &Persona, context: &MeetingContext) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use roundtable_core::config::MeetingConfig;
    use roundtable_core::persona::Roster;

    #[test]
    fn context_reports_upcoming_round_and_window() {
        let roster = Roster::new(vec![
            Persona::new("Ada", "CTO", ""),
            Persona::new("Grace", "CFO", ""),
        ])
        .unwrap();
        let mut state = MeetingState::new(roster, MeetingConfig::new("pricing", 3)).unwrap();
        let ids: Vec<String> = state.roster.participants().iter().map(|p| p.id.clone()).collect();

        let context = MeetingContext::for_next_turn(&state);
        assert_eq!(context.round, 1);
        assert!(!context.is_final_round);
        assert!(context.history.is_empty());

        state.append_utterance(&ids[0], "first point").unwrap();
        state.append_utterance(&ids[1], "second point").unwrap();
        let context = MeetingContext::for_next_turn(&state);
        assert_eq!(context.round, 2);
        assert!(context.history.contains("Ada: first point"));
        assert!(context.history.contains("Grace: second point"));
    }

    #[test]
    fn context_serializes_for_transport() {
        let roster = Roster::new(vec![Persona::new("Ada", "CTO", "")]).unwrap();
        let state = MeetingState::new(roster, MeetingConfig::new("pricing", 3)).unwrap();

        let json = serde_json::to_value(MeetingContext::for_next_turn(&state)).unwrap();
        assert_eq!(json["topic"], "pricing");
        assert_eq!(json["round"], 1);
        assert_eq!(json["final_round_instructions"], serde_json::Value::Null);
    }

    #[test]
    fn final_round_instructions_appear_only_when_extended() {
        let roster = Roster::new(vec![Persona::new("Ada", "CTO", "")]).unwrap();
        let mut state = MeetingState::new(roster, MeetingConfig::new("pricing", 1)).unwrap();
        let id = state.roster.participants()[0].id.clone();

        assert!(MeetingContext::for_next_turn(&state).final_round_instructions.is_none());

        state.append_utterance(&id, "r1").unwrap();
        state.append_utterance(&id, "r2").unwrap();
        state.extension_granted = true;
        state.max_rounds = 3;
        let context = MeetingContext::for_next_turn(&state);
        assert!(context.is_final_round);
        assert!(context.final_round_instructions.is_some());
    }
}
