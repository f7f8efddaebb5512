//! Meeting domain module.
//!
//! This module contains the transcript types and the meeting state
//! aggregate.
//!
//! # Module Structure
//!
//! - `message`: Utterance record and append-only log (`Message`, `MessageLog`)
//! - `model`: Meeting aggregate and derived views (`MeetingState`,
//!   `MeetingPhase`, `MeetingStatus`, `Notices`)

mod message;
mod model;

// Re-export public API
pub use message::{Message, MessageLog};
pub use model::{MeetingPhase, MeetingState, MeetingStatus, Notices};
