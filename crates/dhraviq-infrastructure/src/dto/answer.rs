//! Cached answer DTOs and migrations
//!
//! ## Version History
//! - **1.0.0**: Initial schema

use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, Versioned};

use dhraviq_core::answer::CachedAnswer;

/// Cached answer DTO V1.0.0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
#[serde(rename_all = "camelCase")]
pub struct AnswerV1_0_0 {
    pub question_id: String,
    pub session_id: String,
    pub answer_text: String,
    pub created_at: i64,
}

impl IntoDomain<CachedAnswer> for AnswerV1_0_0 {
    fn into_domain(self) -> CachedAnswer {
        CachedAnswer {
            question_id: self.question_id,
            session_id: self.session_id,
            answer_text: self.answer_text,
            created_at: self.created_at,
        }
    }
}

impl FromDomain<CachedAnswer> for AnswerV1_0_0 {
    fn from_domain(answer: CachedAnswer) -> Self {
        AnswerV1_0_0 {
            question_id: answer.question_id,
            session_id: answer.session_id,
            answer_text: answer.answer_text,
            created_at: answer.created_at,
        }
    }
}

/// Creates a Migrator for CachedAnswer entities.
pub fn create_answer_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();
    let path = version_migrate::Migrator::define("answer")
        .from::<AnswerV1_0_0>()
        .into_with_save::<CachedAnswer>();
    migrator
        .register(path)
        .expect("Failed to register answer migration path");
    migrator
}
