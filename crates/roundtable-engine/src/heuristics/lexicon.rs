//! Phrase tables for the closure validator.
//!
//! All detection in the engine is shallow keyword matching over curated
//! tables. The tables are plain data so deployments can tune them or swap
//! in another language without touching control flow; the defaults below
//! target English business discussions.

use serde::{Deserialize, Serialize};

pub(crate) fn lowercase_all(phrases: &[&str]) -> Vec<String> {
    phrases.iter().map(|p| p.to_lowercase()).collect()
}

/// Returns whether any phrase in the table occurs in the (lowercased) text.
pub(crate) fn matches_any(text_lower: &str, phrases: &[String]) -> bool {
    phrases.iter().any(|p| text_lower.contains(p.as_str()))
}

/// Counts how many phrases in the table occur in the (lowercased) text.
pub(crate) fn count_matches(text_lower: &str, phrases: &[String]) -> usize {
    phrases.iter().filter(|p| text_lower.contains(p.as_str())).count()
}

/// Phrase tables for validating wrap-up statements.
///
/// Each category corresponds to one element a complete final statement must
/// contain. A statement is matched case-insensitively against every table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClosureLexicon {
    /// "Here is what I said in this meeting" phrasing.
    pub personal_summary: Vec<String>,
    /// Phrasing that wraps up the discussion as a whole.
    pub overall_conclusion: Vec<String>,
    /// Concrete next-step / execution phrasing.
    pub action_plan: Vec<String>,
    /// References to other participants or to reached consensus.
    pub participant_connection: Vec<String>,
    /// Thanks-pattern phrases.
    pub gratitude: Vec<String>,
    /// Phrasing that tries to keep the debate open.
    pub continuation: Vec<String>,
    /// Continuation signals strong enough to disqualify a wrap-up outright.
    pub strong_continuation: Vec<String>,
    /// Minimum character length for a statement to count as a real wrap-up.
    pub min_statement_len: usize,
}

impl Default for ClosureLexicon {
    fn default() -> Self {
        Self {
            personal_summary: lowercase_all(&[
                "in this meeting i",
                "i emphasized",
                "i proposed",
                "i argued",
                "my key point",
                "my main point",
                "as i mentioned",
                "from my perspective",
                "my position has been",
            ]),
            overall_conclusion: lowercase_all(&[
                "in conclusion",
                "to summarize",
                "taken together",
                "overall, the discussion",
                "our conclusion",
                "in summary",
                "the outcome of this meeting",
                "all things considered",
                "to wrap up",
            ]),
            action_plan: lowercase_all(&[
                "action plan",
                "next step",
                "next steps",
                "follow up",
                "follow-up",
                "we should implement",
                "concrete steps",
                "execution plan",
                "proceed with",
                "we will move ahead",
            ]),
            participant_connection: lowercase_all(&[
                "agree with",
                "agreeing with",
                "building on",
                "echoing",
                "'s point",
                "as mentioned by",
                "our consensus",
                "we aligned",
                "together we",
                "shared view",
            ]),
            gratitude: lowercase_all(&[
                "thank you",
                "thanks to everyone",
                "thanks, everyone",
                "grateful",
                "i appreciate",
                "it was a pleasure",
                "thank you all",
            ]),
            continuation: lowercase_all(&[
                "still unresolved",
                "not yet resolved",
                "we should also discuss",
                "further discussion",
                "more discussion",
                "new proposal",
                "another option",
                "a remaining concern",
                "open issue",
                "open question",
                "needs more analysis",
                "worth exploring",
            ]),
            strong_continuation: lowercase_all(&[
                "let's discuss further",
                "let us discuss further",
                "in the next round",
                "next round",
                "what do you think",
                "what does everyone think",
                "any thoughts",
                "i look forward to discussing",
                "the next speaker",
                "i would like to hear",
            ]),
            min_statement_len: 100,
        }
    }
}

impl ClosureLexicon {
    /// Validates that every table has at least one phrase.
    ///
    /// An empty category would silently make its closure flag unreachable.
    pub fn is_usable(&self) -> bool {
        !self.personal_summary.is_empty()
            && !self.overall_conclusion.is_empty()
            && !self.action_plan.is_empty()
            && !self.participant_connection.is_empty()
            && !self.gratitude.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_lexicon_is_usable() {
        assert!(ClosureLexicon::default().is_usable());
    }

    #[test]
    fn lexicon_loads_from_toml() {
        let lexicon: ClosureLexicon = toml::from_str(
            r#"
            gratitude = ["danke", "vielen dank"]
            "#,
        )
        .unwrap();

        // Overridden table replaces the default; untouched tables keep theirs.
        assert_eq!(lexicon.gratitude, vec!["danke", "vielen dank"]);
        assert!(!lexicon.personal_summary.is_empty());
    }

    #[test]
    fn matching_is_case_insensitive_via_lowered_input() {
        let lexicon = ClosureLexicon::default();
        let text = "Thank You all for the lively debate".to_lowercase();
        assert!(matches_any(&text, &lexicon.gratitude));
    }
}
