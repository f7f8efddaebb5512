//! Meeting roster.
//!
//! The roster is the persona registry for one meeting: it owns the ordered
//! participant list, identifies the moderator, and enforces the constraints
//! a meeting cannot run without.

use super::model::Persona;
use crate::error::{MeetingError, Result};
use serde::{Deserialize, Serialize};

/// Maximum number of personas a single meeting can hold.
pub const MAX_PERSONAS: usize = 10;

/// The ordered set of personas taking part in one meeting.
///
/// Persona ordering is fixed at creation and determines round-robin turn
/// order. The roster is validated on construction: at least one
/// non-moderator persona is required, and the roster never exceeds
/// [`MAX_PERSONAS`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    personas: Vec<Persona>,
}

impl Roster {
    /// Builds a roster from an ordered persona list.
    ///
    /// # Errors
    ///
    /// Returns [`MeetingError::Config`] if there is no non-moderator persona
    /// or the list exceeds [`MAX_PERSONAS`].
    pub fn new(personas: Vec<Persona>) -> Result<Self> {
        if personas.len() > MAX_PERSONAS {
            return Err(MeetingError::config(format!(
                "roster holds {} personas, maximum is {MAX_PERSONAS}",
                personas.len()
            )));
        }
        if !personas.iter().any(|p| !p.is_moderator) {
            return Err(MeetingError::config(
                "at least one non-moderator persona is required",
            ));
        }
        Ok(Self { personas })
    }

    /// All personas in creation order.
    pub fn all(&self) -> &[Persona] {
        &self.personas
    }

    /// The moderator, if one was configured.
    pub fn moderator(&self) -> Option<&Persona> {
        self.personas.iter().find(|p| p.is_moderator)
    }

    /// Non-moderator personas in creation order.
    ///
    /// These are the round-robin speakers; their count defines the round
    /// length.
    pub fn participants(&self) -> Vec<&Persona> {
        self.personas.iter().filter(|p| !p.is_moderator).collect()
    }

    /// Number of non-moderator personas.
    pub fn participant_count(&self) -> usize {
        self.personas.iter().filter(|p| !p.is_moderator).count()
    }

    /// Looks up a persona by id.
    pub fn find(&self, persona_id: &str) -> Option<&Persona> {
        self.personas.iter().find(|p| p.id == persona_id)
    }
}
