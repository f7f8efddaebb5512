//! Heuristics configuration module.
//!
//! All keyword/phrase detection in the engine is driven by the data tables
//! defined here, so thresholds and vocabularies can be tuned and tested
//! independently of control flow.
//!
//! # Module Structure
//!
//! - `lexicon`: Phrase tables for closure validation (`ClosureLexicon`)
//! - `tuning`: Thresholds and tables for repetition detection
//!   (`RepetitionConfig`, `ThemeTaxonomy`)

mod lexicon;
mod tuning;

pub(crate) use lexicon::{count_matches, matches_any};

// Re-export public API
pub use lexicon::ClosureLexicon;
pub use tuning::{RepetitionConfig, ThemeTaxonomy, default_themes};
