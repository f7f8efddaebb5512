//! End-to-end meeting flow scenarios driving the runner with a scripted
//! generator.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use roundtable_core::config::MeetingConfig;
use roundtable_core::error::{MeetingError, Result};
use roundtable_core::meeting::{MeetingPhase, MeetingState};
use roundtable_core::persona::{Persona, Roster};
use roundtable_engine::generation::{MeetingContext, UtteranceGenerator};
use roundtable_engine::runner::{MeetingRunner, TurnOutcome};

const WRAP_UP: &str = "In this meeting I proposed focusing on retention over acquisition. \
    In conclusion, the group converged on a phased rollout. As next steps we will implement \
    the pilot in Q3. I agree with Grace's point on budgeting, and thank you all for the \
    thoughtful discussion.";

const DISCUSSION: [&str; 6] = [
    "However, the market data shows customer demand shifting toward bundled offerings.",
    "In contrast, our cost structure and budget leave little room for a price war.",
    "To build on that, the product experience needs a quality push before any launch.",
    "Specifically, competitor positioning gives us an opening in the mid-tier segment.",
    "The data shows execution capacity is the real constraint, not strategy.",
    "Alternatively, a partnership would cap our investment risk exposure.",
];

const STUCK: &str = "The AI algorithm automation is the answer and the AI algorithm automation \
    will transform everything we do here";

/// Plays back a fixed script of responses; entries may be errors.
struct ScriptedGenerator {
    script: Mutex<VecDeque<Result<String>>>,
}

impl ScriptedGenerator {
    fn new(responses: impl IntoIterator<Item = Result<String>>) -> Self {
        Self {
            script: Mutex::new(responses.into_iter().collect()),
        }
    }

    fn repeating(text: &str, n: usize) -> Self {
        Self::new((0..n).map(|_| Ok(text.to_string())))
    }
}

#[async_trait]
impl UtteranceGenerator for ScriptedGenerator {
    async fn generate(&self, persona: &Persona, _context: &MeetingContext) -> Result<String> {
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(MeetingError::generation(&persona.name, "script exhausted")))
    }
}

fn new_meeting(max_rounds: u32) -> MeetingState {
    let roster = Roster::new(vec![
        Persona::moderator("Morgan", "Facilitator"),
        Persona::new("Ada", "CTO", ""),
        Persona::new("Grace", "CFO", ""),
        Persona::new("Linus", "COO", ""),
    ])
    .unwrap();
    let mut config = MeetingConfig::new("expansion plan", max_rounds);
    config.natural_timing = false;
    MeetingState::new(roster, config).unwrap()
}

#[tokio::test]
async fn unconcluded_meeting_enters_extension_instead_of_stopping() {
    let generator = ScriptedGenerator::new(DISCUSSION.iter().map(|s| Ok(s.to_string())));
    let mut runner = MeetingRunner::new(new_meeting(2), generator);

    // Two full rounds of well-formed, non-closing discussion.
    for _ in 0..6 {
        assert_eq!(runner.run_turn().await.unwrap(), TurnOutcome::Continued);
    }

    let state = runner.state();
    assert!(state.is_active, "engine must request a 7th turn");
    assert!(state.extension_granted);
    assert_eq!(state.max_rounds, 4);
    assert!(state.notices.extension_announced);
    assert!(!state.notices.final_message_sent);
    assert_eq!(state.phase(), MeetingPhase::Extended);
}

#[tokio::test]
async fn fully_closing_rounds_conclude_at_the_floor() {
    let generator = ScriptedGenerator::repeating(WRAP_UP, 6);
    let mut runner = MeetingRunner::new(new_meeting(2), generator);

    for _ in 0..5 {
        assert_eq!(runner.run_turn().await.unwrap(), TurnOutcome::Continued);
    }
    assert_eq!(runner.run_turn().await.unwrap(), TurnOutcome::Concluded);

    let state = runner.state();
    assert!(!state.is_active);
    assert!(!state.extension_granted);
    assert!(state.notices.final_message_sent);
    assert!(!state.notices.extension_announced);

    // Exactly one moderator closing message, appended as message 7.
    assert_eq!(state.log.len(), 7);
    let moderator_messages: Vec<_> = state.log.all().iter().filter(|m| m.is_moderator).collect();
    assert_eq!(moderator_messages.len(), 1);
    assert!(state.log.last().unwrap().is_moderator);
}

#[tokio::test]
async fn extended_meeting_runs_to_a_verified_close() {
    let script = DISCUSSION
        .iter()
        .map(|s| Ok(s.to_string()))
        .chain((0..6).map(|_| Ok(WRAP_UP.to_string())));
    let mut runner = MeetingRunner::new(new_meeting(2), ScriptedGenerator::new(script));

    let turns = runner.run_to_completion().await.unwrap();
    assert_eq!(turns, 12, "two configured plus two extension rounds");

    let state = runner.state();
    assert!(!state.is_active);
    assert_eq!(state.derived_round(), 4);
    assert!(state.notices.extension_announced);
    assert!(state.notices.final_round_announced);
    assert!(state.notices.final_closure_sent);
    assert!(!state.notices.final_message_sent);

    let moderator_messages: Vec<_> = state.log.all().iter().filter(|m| m.is_moderator).collect();
    assert_eq!(moderator_messages.len(), 3);
    assert!(state.log.last().unwrap().content.contains("genuine conclusion"));
}

#[tokio::test]
async fn circling_discussion_is_cut_short_during_the_extension() {
    let generator = ScriptedGenerator::repeating(STUCK, 18);
    let mut runner = MeetingRunner::new(new_meeting(2), generator);

    let turns = runner.run_to_completion().await.unwrap();

    // The extension was granted at the floor, then the detector flagged two
    // consecutive turns of the consolidation round and ended the meeting.
    assert_eq!(turns, 8, "must not run the full extended schedule");
    let state = runner.state();
    assert!(!state.is_active);
    assert!(state.extension_granted);
    assert_eq!(state.derived_round(), 3);
    assert!(state.notices.final_closure_sent);
    assert!(
        runner
            .state()
            .log
            .last()
            .is_some_and(|m| m.is_moderator && m.content.contains("circling the same ground"))
    );
}

#[tokio::test]
async fn overtime_meeting_is_closed_right_after_the_extension_grant() {
    let generator = ScriptedGenerator::new(DISCUSSION.iter().map(|s| Ok(s.to_string())));
    let mut state = new_meeting(2);
    state.started_at = chrono::Utc::now() - chrono::Duration::minutes(31);
    let mut runner = MeetingRunner::new(state, generator);

    let turns = runner.run_to_completion().await.unwrap();

    assert_eq!(turns, 6, "floor rounds still complete over budget");
    let state = runner.state();
    assert!(!state.is_active);
    assert!(state.extension_granted);
    assert!(state.notices.final_closure_sent);
    assert!(
        state
            .log
            .last()
            .is_some_and(|m| m.is_moderator && m.content.contains("minute limit"))
    );
}

#[tokio::test]
async fn meeting_never_deactivates_below_the_floor() {
    let script = (0..18).map(|k| Ok(DISCUSSION[k % DISCUSSION.len()].to_string()));
    let mut runner = MeetingRunner::new(new_meeting(4), ScriptedGenerator::new(script));

    for turn in 0..12 {
        runner.run_turn().await.unwrap();
        let state = runner.state();
        if state.derived_round() < state.original_max_rounds {
            assert!(state.is_active, "deactivated below the floor at turn {turn}");
        }
    }
}

#[tokio::test]
async fn generation_failure_is_recovered_with_a_placeholder() {
    let script = vec![
        Ok(DISCUSSION[0].to_string()),
        Err(MeetingError::generation("Grace", "backend unavailable")),
        Ok(DISCUSSION[2].to_string()),
    ];
    let mut runner = MeetingRunner::new(new_meeting(2), ScriptedGenerator::new(script));

    for _ in 0..3 {
        assert_eq!(runner.run_turn().await.unwrap(), TurnOutcome::Continued);
    }

    let state = runner.state();
    assert!(state.is_active);
    assert_eq!(state.log.len(), 3);
    assert_eq!(state.turn_counter, 3);
    // The failed turn still occupies its slot so round math stays aligned.
    assert!(state.log.all()[1].content.contains("generation failed"));
    assert_eq!(state.log.all()[1].persona_name, "Grace");
}

#[tokio::test]
async fn cancellation_stops_scheduling_immediately() {
    let generator = ScriptedGenerator::repeating(DISCUSSION[0], 10);
    let mut runner = MeetingRunner::new(new_meeting(5), generator);

    assert_eq!(runner.run_turn().await.unwrap(), TurnOutcome::Continued);
    runner.cancel();
    runner.cancel(); // idempotent
    assert_eq!(runner.run_turn().await.unwrap(), TurnOutcome::Inactive);
    assert_eq!(runner.state().log.len(), 1);
}

#[tokio::test]
async fn human_input_does_not_disturb_round_math() {
    let generator = ScriptedGenerator::repeating(DISCUSSION[0], 3);
    let mut runner = MeetingRunner::new(new_meeting(2), generator);

    runner.run_turn().await.unwrap();
    let ada = runner.state().roster.participants()[0].id.clone();
    runner.inject_human_input(&ada, "operator note: focus on the budget").unwrap();
    runner.run_turn().await.unwrap();

    let state = runner.state();
    assert_eq!(state.log.len(), 3);
    assert_eq!(state.log.eligible_count(), 2);
    assert_eq!(state.derived_round(), 1);
}

#[tokio::test]
async fn exhausted_script_counts_as_generation_failure_not_a_crash() {
    let generator = ScriptedGenerator::repeating(DISCUSSION[0], 1);
    let mut runner = MeetingRunner::new(new_meeting(2), generator);

    assert_eq!(runner.run_turn().await.unwrap(), TurnOutcome::Continued);
    assert_eq!(runner.run_turn().await.unwrap(), TurnOutcome::Continued);
    assert!(runner.state().log.all()[1].content.contains("generation failed"));
}

#[tokio::test]
async fn status_surface_tracks_the_live_meeting() {
    let generator = ScriptedGenerator::repeating(WRAP_UP, 6);
    let mut runner = MeetingRunner::new(new_meeting(2), generator);

    let status = runner.status();
    assert_eq!(status.current_round, 0);
    assert_eq!(status.phase, MeetingPhase::Active);
    assert!(status.is_active);

    for _ in 0..6 {
        runner.run_turn().await.unwrap();
    }
    let status = runner.status();
    assert_eq!(status.current_round, 2);
    assert_eq!(status.phase, MeetingPhase::Concluded);
    assert!(!status.is_active);
    assert!(status.notices.final_message_sent);
    assert_eq!(status.message_count, 7);
}
