//! Cached coaching answers.

use serde::{Deserialize, Serialize};
use version_migrate::DeriveQueryable as Queryable;

/// A coaching answer cached for one (question, session) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable)]
#[queryable(entity = "answer")]
pub struct CachedAnswer {
    pub question_id: String,
    pub session_id: String,
    pub answer_text: String,
    pub created_at: i64,
}

impl CachedAnswer {
    /// Whether this record belongs to the given pair.
    pub fn is_for(&self, question_id: &str, session_id: &str) -> bool {
        self.question_id == question_id && self.session_id == session_id
    }
}
