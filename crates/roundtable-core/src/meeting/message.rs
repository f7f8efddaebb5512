//! Meeting message types.
//!
//! This module contains the utterance record and the append-only log the
//! rest of the engine reads from. Messages are immutable once appended.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single utterance in the meeting transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// When the utterance was appended (UTC).
    pub timestamp: DateTime<Utc>,
    /// Id of the speaking persona.
    pub persona_id: String,
    /// Display name of the speaking persona (denormalized for rendering).
    pub persona_name: String,
    /// The utterance text.
    pub content: String,
    /// Set when the operator injected this message by hand.
    pub is_human_input: bool,
    /// Copied from the speaker at append time.
    pub is_moderator: bool,
}

impl Message {
    /// Whether this message counts toward round arithmetic.
    ///
    /// Moderator notices and operator-injected messages are excluded; only
    /// scheduled participant turns advance the round.
    pub fn is_eligible(&self) -> bool {
        !self.is_moderator && !self.is_human_input
    }
}

/// Append-only, ordered record of meeting utterances.
///
/// The log exclusively owns its messages; every other component reads them
/// by reference and never mutates them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an utterance and returns a reference to the stored message.
    pub fn append(
        &mut self,
        persona_id: impl Into<String>,
        persona_name: impl Into<String>,
        content: impl Into<String>,
        is_human_input: bool,
        is_moderator: bool,
    ) -> &Message {
        self.messages.push(Message {
            timestamp: Utc::now(),
            persona_id: persona_id.into(),
            persona_name: persona_name.into(),
            content: content.into(),
            is_human_input,
            is_moderator,
        });
        // Safe to unwrap because we just pushed an element
        self.messages.last().unwrap()
    }

    /// All messages in append order.
    pub fn all(&self) -> &[Message] {
        &self.messages
    }

    /// Total number of messages, moderator notices included.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Messages that count toward round arithmetic, in append order.
    pub fn eligible(&self) -> Vec<&Message> {
        self.messages.iter().filter(|m| m.is_eligible()).collect()
    }

    /// Number of eligible messages.
    pub fn eligible_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_eligible()).count()
    }

    /// The last `n` messages in append order (fewer if the log is shorter).
    pub fn recent(&self, n: usize) -> &[Message] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    /// Eligible messages among the last `n` log entries.
    pub fn recent_eligible(&self, n: usize) -> Vec<&Message> {
        self.recent(n).iter().filter(|m| m.is_eligible()).collect()
    }

    /// The most recent message, if any.
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eligibility_excludes_moderator_and_human_input() {
        let mut log = MessageLog::new();
        log.append("p1", "Ada", "point one", false, false);
        log.append("mod", "Morgan", "order, please", false, true);
        log.append("p1", "Ada", "typed by operator", true, false);

        assert_eq!(log.len(), 3);
        assert_eq!(log.eligible_count(), 1);
        assert_eq!(log.eligible()[0].content, "point one");
    }

    #[test]
    fn recent_window_is_clamped() {
        let mut log = MessageLog::new();
        log.append("p1", "Ada", "a", false, false);
        log.append("p2", "Grace", "b", false, false);

        assert_eq!(log.recent(10).len(), 2);
        assert_eq!(log.recent(1)[0].content, "b");
    }
}
