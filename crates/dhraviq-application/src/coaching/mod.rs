//! Coaching workflow: per-question help with caching and the contact gate.

mod state;
mod workflow;

pub use state::{CoachingSnapshot, HelpPhase, QuestionHelp};
pub use workflow::{CoachingWorkflow, HelpOutcome};
