//! Local persistence interface.
//!
//! Defines the durable, key-based store the workflow reads and writes:
//! sessions, cached answers, company packs and the HR bank.

use async_trait::async_trait;
use std::time::Duration;

use crate::analysis::AnalysisResult;
use crate::clock::DAY_MS;
use crate::error::Result;
use crate::question::Question;
use crate::reference::CompanyPack;
use crate::session::Session;

/// Sessions untouched for longer than this are pruned at startup.
pub const DEFAULT_MAX_SESSION_AGE: Duration = Duration::from_millis(30 * DAY_MS as u64);

/// An abstract local store.
///
/// # Implementation Notes
///
/// Implementations should handle:
/// - Lazy opening on first use, with concurrent first calls sharing one handle
/// - Atomic writes per record
/// - Schema versioning without destroying existing data
///
/// Every failure is reported as `DhraviqError::Storage` or
/// `DhraviqError::Serialization`. Callers decide whether a failure is a miss.
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Upserts a session and refreshes its `last_accessed`.
    ///
    /// `created_at` is kept when the session already exists.
    async fn save_session(
        &self,
        id: &str,
        resume_text: &str,
        analysis: &AnalysisResult,
    ) -> Result<Session>;

    async fn get_session(&self, id: &str) -> Result<Option<Session>>;

    /// Returns the session with the greatest `last_accessed`.
    async fn get_last_session(&self) -> Result<Option<Session>>;

    /// Deletes a session. Deleting a missing session is not an error.
    async fn delete_session(&self, id: &str) -> Result<()>;

    /// Stores the answer for a (question, session) pair, overwriting any previous one.
    async fn save_answer(&self, question_id: &str, session_id: &str, answer: &str) -> Result<()>;

    /// Reads the answer cached for exactly this (question, session) pair.
    async fn get_answer(&self, question_id: &str, session_id: &str) -> Result<Option<String>>;

    async fn save_company_data(&self, company: &CompanyPack) -> Result<()>;

    async fn get_company_data(&self, company_id: &str) -> Result<Option<CompanyPack>>;

    /// All company packs, sorted by name.
    async fn get_all_companies(&self) -> Result<Vec<CompanyPack>>;

    /// Upserts each question by id. Repeating the same input changes nothing.
    async fn preload_hr_bank(&self, questions: &[Question]) -> Result<()>;

    /// The HR bank, sorted by question id.
    async fn get_hr_bank(&self) -> Result<Vec<Question>>;

    /// Deletes every session whose `last_accessed` is older than `now - max_age`.
    ///
    /// Returns the number of sessions removed.
    async fn clear_old_sessions(&self, max_age: Duration) -> Result<usize>;
}
