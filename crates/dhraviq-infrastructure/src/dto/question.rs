//! Question DTOs and migrations
//!
//! ## Version History
//! - **1.0.0**: Initial schema

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use version_migrate::{FromDomain, IntoDomain, Versioned};

use dhraviq_core::question::{Category, Difficulty, Question};

/// Question DTO V1.0.0.
///
/// Stored on its own in the HR bank and nested inside analyses and company packs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct QuestionV1_0_0 {
    pub id: String,
    pub category: Category,
    pub difficulty: Difficulty,
    /// Question text.
    pub question: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl From<&Question> for QuestionV1_0_0 {
    fn from(q: &Question) -> Self {
        QuestionV1_0_0 {
            id: q.id.clone(),
            category: q.category,
            difficulty: q.difficulty,
            question: q.text.clone(),
            tags: q.tags.iter().cloned().collect(),
            answer: q.answer.clone(),
        }
    }
}

impl From<QuestionV1_0_0> for Question {
    fn from(dto: QuestionV1_0_0) -> Self {
        Question {
            id: dto.id,
            category: dto.category,
            difficulty: dto.difficulty,
            text: dto.question,
            tags: dto.tags.into_iter().collect::<BTreeSet<_>>(),
            answer: dto.answer,
        }
    }
}

impl IntoDomain<Question> for QuestionV1_0_0 {
    fn into_domain(self) -> Question {
        self.into()
    }
}

impl FromDomain<Question> for QuestionV1_0_0 {
    fn from_domain(question: Question) -> Self {
        QuestionV1_0_0::from(&question)
    }
}

// ============================================================================
// Migrator factory
// ============================================================================

/// Creates a Migrator for HR bank questions.
pub fn create_hr_question_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();
    let path = version_migrate::Migrator::define("hr_question")
        .from::<QuestionV1_0_0>()
        .into_with_save::<Question>();
    migrator
        .register(path)
        .expect("Failed to register hr_question migration path");
    migrator
}
