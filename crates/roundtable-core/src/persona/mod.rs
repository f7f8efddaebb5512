//! Persona domain module.
//!
//! This module contains the persona model and the per-meeting roster that
//! registers participants and identifies the moderator.
//!
//! # Module Structure
//!
//! - `model`: Core persona domain model (`Persona`)
//! - `roster`: Ordered persona registry for one meeting (`Roster`)

mod model;
mod roster;

// Re-export public API
pub use model::Persona;
pub use roster::{MAX_PERSONAS, Roster};
