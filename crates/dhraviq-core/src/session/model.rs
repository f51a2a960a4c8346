//! Session domain model.

use serde::{Deserialize, Serialize};
use version_migrate::DeriveQueryable as Queryable;

use crate::analysis::AnalysisResult;

/// One resume-analysis cycle.
///
/// Timestamps are Unix epoch milliseconds. `last_accessed` is refreshed on
/// every save and drives "most recent session" lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable)]
#[queryable(entity = "session")]
pub struct Session {
    pub id: String,
    pub resume_text: String,
    pub analysis: AnalysisResult,
    pub created_at: i64,
    pub last_accessed: i64,
}
