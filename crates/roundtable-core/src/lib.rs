//! Domain layer of the Roundtable virtual-meeting engine.
//!
//! This crate holds the data model the orchestration services in
//! `roundtable-engine` operate on: personas and the meeting roster, the
//! append-only message log, the `MeetingState` aggregate, and the shared
//! error type. It contains no heuristics and no control flow; those live in
//! the engine crate.

pub mod config;
pub mod error;
pub mod meeting;
pub mod persona;

// Re-export common error type
pub use error::MeetingError;
