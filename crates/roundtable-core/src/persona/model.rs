//! Persona domain model.
//!
//! Represents AI personas that participate in a virtual meeting.
//! Each persona has a role, a behavioral prompt, and may be designated
//! as the meeting moderator.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persona representing an AI participant in a virtual meeting.
///
/// Personas define the behavior and role of the AI agents taking part in
/// the discussion. Exactly one persona per meeting should be the moderator;
/// the moderator never takes a scheduled turn and only speaks through the
/// controller's transition notices. Personas are immutable after creation.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Persona {
    /// Unique identifier (UUID format)
    pub id: String,
    /// Display name of the persona
    pub name: String,
    /// Role or title describing the persona's function in the meeting
    pub role: String,
    /// Free-text behavioral prompt handed to the utterance generator
    pub prompt: String,
    /// Whether this persona moderates the meeting
    #[serde(default)]
    pub is_moderator: bool,
}

impl Persona {
    /// Creates a participant persona with a fresh UUID.
    ///
    /// If `prompt` is empty, a default behavioral prompt is generated from
    /// the name and role.
    pub fn new(name: impl Into<String>, role: impl Into<String>, prompt: impl Into<String>) -> Self {
        let name = name.into();
        let role = role.into();
        let mut prompt = prompt.into();
        if prompt.is_empty() {
            prompt = default_prompt(&name, &role);
        }
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            role,
            prompt,
            is_moderator: false,
        }
    }

    /// Creates the moderator persona with a fresh UUID.
    pub fn moderator(name: impl Into<String>, role: impl Into<String>) -> Self {
        let name = name.into();
        let role = role.into();
        let prompt = default_prompt(&name, &role);
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            role,
            prompt,
            is_moderator: true,
        }
    }
}

fn default_prompt(name: &str, role: &str) -> String {
    format!(
        "You are {name}, acting as {role}. Contribute constructive, \
         expertise-grounded opinions, listen to and respect the other \
         participants, and move the discussion forward."
    )
}
