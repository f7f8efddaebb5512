//! Orchestration services of the Roundtable virtual-meeting engine.
//!
//! This crate contains the components that drive a meeting over the
//! `roundtable-core` data model:
//!
//! - [`scheduler::TurnScheduler`]: round-robin speaker selection and round
//!   derivation
//! - [`repetition::RepetitionDetector`]: thematic/structural stagnation
//!   detection
//! - [`closure::ClosureValidator`]: wrap-up quality validation
//! - [`controller::MeetingController`]: the continue/extend/stop state
//!   machine
//! - [`timing::TimingController`]: cosmetic pacing delays
//! - [`generation::UtteranceGenerator`]: the opaque LLM seam
//! - [`runner::MeetingRunner`]: the per-turn loop tying it all together

pub mod closure;
pub mod controller;
pub mod generation;
pub mod heuristics;
pub mod repetition;
pub mod runner;
pub mod scheduler;
pub mod timing;

pub use closure::{ClosureAnalysis, ClosureValidator, StatementValidation};
pub use controller::{EXTENSION_ROUNDS, MeetingController};
pub use generation::{MeetingContext, UtteranceGenerator};
pub use heuristics::{ClosureLexicon, RepetitionConfig};
pub use repetition::RepetitionDetector;
pub use runner::{MeetingRunner, TurnOutcome};
pub use scheduler::TurnScheduler;
pub use timing::{TimingConfig, TimingController};
