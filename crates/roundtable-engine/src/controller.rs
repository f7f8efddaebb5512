//! Round and extension control.
//!
//! The controller is the top-level state machine. It consumes signals from
//! the scheduler, the repetition detector, and the closure validator to
//! decide continue/extend/stop, and emits the moderator announcements at
//! each transition. Below the configured round floor no stopping condition
//! ever runs; the floor is hard.

use crate::closure::ClosureValidator;
use crate::repetition::RepetitionDetector;
use crate::scheduler::TurnScheduler;
use roundtable_core::meeting::MeetingState;

/// Number of rounds added by the one-time extension.
pub const EXTENSION_ROUNDS: u32 = 2;

/// Drives the continue/extend/stop decision for one meeting.
#[derive(Debug, Clone, Default)]
pub struct MeetingController {
    scheduler: TurnScheduler,
    closure: ClosureValidator,
    detector: RepetitionDetector,
}

impl MeetingController {
    pub fn new(scheduler: TurnScheduler, closure: ClosureValidator, detector: RepetitionDetector) -> Self {
        Self {
            scheduler,
            closure,
            detector,
        }
    }

    /// Re-evaluates continuation after a completed turn.
    ///
    /// Returns whether another turn should be scheduled. All terminal paths
    /// deactivate the state and append exactly one moderator closing
    /// message, guarded by the one-shot notice flags.
    pub fn should_continue(&self, state: &mut MeetingState) -> bool {
        if !state.is_active {
            return false;
        }

        let round = self.scheduler.current_round_accurate(state);

        // Hard floor: the configured round count is never cut short.
        if round < state.original_max_rounds {
            return true;
        }

        let n = state.roster.participant_count();

        if !state.extension_granted {
            // The decision is made over the just-completed final round, so
            // it waits until every participant has spoken in it.
            if state.log.eligible_count() < state.original_max_rounds as usize * n {
                return true;
            }
            if self.closure.is_meeting_properly_concluded(state) {
                tracing::info!(round, "meeting concluded at the configured floor");
                state.deactivate();
                if !state.notices.final_message_sent {
                    state.append_moderator_notice(floor_closing_notice(state.original_max_rounds));
                    state.notices.final_message_sent = true;
                }
                return false;
            }

            // Not wrapped up yet: grant the one-time two-round extension and
            // fall through to the extended-phase termination checks.
            state.extension_granted = true;
            state.max_rounds = state.original_max_rounds + EXTENSION_ROUNDS;
            tracing::info!(max_rounds = state.max_rounds, "extension granted");
            if !state.notices.extension_announced {
                state.append_moderator_notice(extension_notice(state.original_max_rounds));
                state.notices.extension_announced = true;
            }
        }

        // Early-termination triggers, evaluated on every call once extended.
        // The final round is exempt: it always ends at completion below.
        if round < state.max_rounds {
            if self.detector.evaluate(state) {
                tracing::warn!(round, "repetitive conversation detected, ending early");
                state.deactivate();
                if !state.notices.final_closure_sent {
                    state.append_moderator_notice(repetition_closing_notice());
                    state.notices.final_closure_sent = true;
                }
                return false;
            }
            if state.over_duration_budget() {
                tracing::info!(round, "wall-clock budget exhausted, ending meeting");
                state.deactivate();
                if !state.notices.final_closure_sent {
                    state.append_moderator_notice(overtime_closing_notice(
                        state.meeting_duration_minutes,
                    ));
                    state.notices.final_closure_sent = true;
                }
                return false;
            }
        }

        if round == state.original_max_rounds + 1 {
            // Announced once the consolidation round is complete.
            let consolidation_done =
                state.log.eligible_count() >= (state.original_max_rounds + 1) as usize * n;
            if consolidation_done && !state.notices.final_round_announced {
                state.append_moderator_notice(final_round_notice(state.max_rounds));
                state.notices.final_round_announced = true;
            }
            return true;
        } else if round >= state.max_rounds {
            if !self.closure.is_final_round_completed(state) {
                // More turns to come this round.
                return true;
            }

            // Everyone has spoken; the meeting concludes either way, the
            // verification verdict only selects the closing message.
            let verified = self.closure.verify_round(state, round);
            tracing::info!(round, verified, "extended final round completed");
            state.deactivate();
            if !state.notices.final_closure_sent {
                let notice = if verified {
                    verified_closing_notice(state.max_rounds)
                } else {
                    times_up_closing_notice(state.max_rounds)
                };
                state.append_moderator_notice(notice);
                state.notices.final_closure_sent = true;
            }
            return false;
        }

        true
    }
}

fn floor_closing_notice(rounds: u32) -> String {
    format!(
        "The meeting wrapped up fully within the scheduled {rounds} rounds. \
         Every participant shared their views and we reached clear conclusions. \
         Thank you all for the active participation."
    )
}

fn extension_notice(original_rounds: u32) -> String {
    format!(
        "The scheduled {original_rounds} rounds are complete, but the discussion \
         has not fully wrapped up, so we are extending the meeting by two rounds.\n\n\
         Round {}: consolidate the key arguments and state final opinions.\n\
         Round {}: deliver final conclusions and closing remarks.\n\n\
         Please keep your remaining statements concise and make sure the final \
         round brings the meeting to a complete close.",
        original_rounds + 1,
        original_rounds + 2
    )
}

fn final_round_notice(max_rounds: u32) -> String {
    format!(
        "We are now entering the final round (round {max_rounds}). Every participant \
         must include in their statement: a summary of their own prior contributions, \
         their final position on the topic, proposed next steps, and thanks to the \
         group. This is the last opportunity to close the meeting properly."
    )
}

fn verified_closing_notice(max_rounds: u32) -> String {
    format!(
        "The extended {max_rounds} rounds are complete and every participant \
         delivered a full wrap-up. Thank you all for bringing the discussion \
         to a genuine conclusion."
    )
}

fn times_up_closing_notice(max_rounds: u32) -> String {
    format!(
        "The extended {max_rounds} rounds are complete and we are out of time. \
         Some closing statements remained incomplete, but the discussion raised \
         valuable points. Thank you all for participating."
    )
}

fn repetition_closing_notice() -> String {
    "The recent discussion has been circling the same ground without new input, \
     so we will close the meeting here. The key positions are on the record; \
     thank you all for your contributions."
        .to_string()
}

fn overtime_closing_notice(minutes: u64) -> String {
    format!(
        "We have reached the {minutes}-minute limit scheduled for this meeting, \
         so we will close here. Thank you all for participating."
    )
}
