//! Per-turn meeting loop.
//!
//! One turn is fully resolved before the next begins: speaker selection,
//! the external generation call, the optional pacing delay, the log append,
//! the cursor advance, and the continuation check. The only suspension
//! points are the generation call and the pacing sleep.

use crate::controller::MeetingController;
use crate::generation::{MeetingContext, UtteranceGenerator};
use crate::scheduler::TurnScheduler;
use crate::timing::TimingController;
use roundtable_core::error::Result;
use roundtable_core::meeting::{MeetingState, MeetingStatus};

/// Result of one [`MeetingRunner::run_turn`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// A turn was taken and the meeting remains active.
    Continued,
    /// A turn was taken and the meeting concluded afterwards.
    Concluded,
    /// The meeting was already inactive; no turn was taken.
    Inactive,
}

/// Drives a meeting one turn at a time.
pub struct MeetingRunner<G: UtteranceGenerator> {
    state: MeetingState,
    generator: G,
    controller: MeetingController,
    scheduler: TurnScheduler,
    timing: TimingController,
}

impl<G: UtteranceGenerator> MeetingRunner<G> {
    pub fn new(state: MeetingState, generator: G) -> Self {
        Self {
            state,
            generator,
            controller: MeetingController::default(),
            scheduler: TurnScheduler::new(),
            timing: TimingController::default(),
        }
    }

    /// Replaces the default controller (custom heuristics configuration).
    pub fn with_controller(mut self, controller: MeetingController) -> Self {
        self.controller = controller;
        self
    }

    /// Read access to the meeting state.
    pub fn state(&self) -> &MeetingState {
        &self.state
    }

    /// Status snapshot for external consumers.
    pub fn status(&self) -> MeetingStatus {
        self.state.status()
    }

    /// Consumes the runner, returning the final state.
    pub fn into_state(self) -> MeetingState {
        self.state
    }

    /// Stops scheduling further turns. Idempotent.
    pub fn cancel(&mut self) {
        self.state.deactivate();
    }

    /// Injects an operator message for the given persona.
    ///
    /// Human input never counts toward round arithmetic.
    pub fn inject_human_input(&mut self, persona_id: &str, content: impl Into<String>) -> Result<()> {
        self.state.append_human_input(persona_id, content)?;
        Ok(())
    }

    /// Runs one turn: speaker selection, generation, append, advance, and
    /// the continuation re-evaluation.
    ///
    /// A generation failure is recovered by appending a visible placeholder
    /// in place of the turn's content; it is never fatal to the meeting.
    pub async fn run_turn(&mut self) -> Result<TurnOutcome> {
        if !self.state.is_active {
            return Ok(TurnOutcome::Inactive);
        }

        let speaker = self.scheduler.next_speaker(&self.state)?.clone();
        let context = MeetingContext::for_next_turn(&self.state);

        let content = match self.generator.generate(&speaker, &context).await {
            Ok(text) => text,
            Err(err) => {
                tracing::error!(speaker = %speaker.name, error = %err, "generation failed, recording placeholder turn");
                format!("[no statement: generation failed for {}]", speaker.name)
            }
        };

        if self.state.natural_timing {
            let delay = self.timing.natural_delay(content.chars().count());
            tokio::time::sleep(delay).await;
        }

        self.state.append_utterance(&speaker.id, content)?;
        self.scheduler.advance(&mut self.state);

        if self.controller.should_continue(&mut self.state) {
            Ok(TurnOutcome::Continued)
        } else {
            Ok(TurnOutcome::Concluded)
        }
    }

    /// Runs turns until the meeting concludes; returns the number taken.
    ///
    /// A hard turn cap bounds the loop so a mis-tuned heuristic table cannot
    /// run forever; hitting the cap deactivates the meeting.
    pub async fn run_to_completion(&mut self) -> Result<usize> {
        let participants = self.state.roster.participant_count();
        let cap = (self.state.original_max_rounds as usize + 4) * participants + 16;

        let mut turns = 0usize;
        loop {
            match self.run_turn().await? {
                TurnOutcome::Continued => {
                    turns += 1;
                    if turns >= cap {
                        tracing::error!(turns, "turn cap reached, forcing meeting shutdown");
                        self.state.deactivate();
                        return Ok(turns);
                    }
                }
                TurnOutcome::Concluded => return Ok(turns + 1),
                TurnOutcome::Inactive => return Ok(turns),
            }
        }
    }
}
