//! Application layer for Dhraviq.
//!
//! Coordinates the local store, the coaching API and the identity gate into
//! the interview-prep workflows a front end drives.

pub mod catalog;
pub mod coaching;
pub mod context;
pub mod gate;
pub mod notice;
pub mod session;

#[cfg(test)]
mod testing;

pub use catalog::{CatalogScope, ImportSummary, QuestionCatalog};
pub use coaching::{CoachingSnapshot, CoachingWorkflow, HelpOutcome, HelpPhase};
pub use context::AppContext;
pub use gate::GateManager;
pub use notice::{Notice, NoticeLevel};
pub use session::{SessionManager, SessionState};
