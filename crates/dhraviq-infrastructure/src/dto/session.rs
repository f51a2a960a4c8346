//! Session DTOs and migrations
//!
//! ## Version History
//! - **1.0.0**: Initial schema. Analysis and questions are stored inline.

use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, Versioned};

use super::question::QuestionV1_0_0;
use dhraviq_core::analysis::{AnalysisResult, Evaluation};
use dhraviq_core::session::Session;

/// Evaluation scores DTO.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationDTO {
    pub dhraviq_score: u8,
    pub ats_score: u8,
    pub content_score: u8,
    pub impact_score: u8,
}

impl From<&Evaluation> for EvaluationDTO {
    fn from(e: &Evaluation) -> Self {
        EvaluationDTO {
            dhraviq_score: e.dhraviq_score,
            ats_score: e.ats_score,
            content_score: e.content_score,
            impact_score: e.impact_score,
        }
    }
}

impl From<EvaluationDTO> for Evaluation {
    fn from(dto: EvaluationDTO) -> Self {
        Evaluation {
            dhraviq_score: dto.dhraviq_score,
            ats_score: dto.ats_score,
            content_score: dto.content_score,
            impact_score: dto.impact_score,
        }
    }
}

/// Analysis result DTO.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResultDTO {
    pub evaluation: EvaluationDTO,
    pub summary: String,
    #[serde(default)]
    pub questions: Vec<QuestionV1_0_0>,
}

impl From<&AnalysisResult> for AnalysisResultDTO {
    fn from(a: &AnalysisResult) -> Self {
        AnalysisResultDTO {
            evaluation: (&a.evaluation).into(),
            summary: a.summary.clone(),
            questions: a.questions.iter().map(QuestionV1_0_0::from).collect(),
        }
    }
}

impl From<AnalysisResultDTO> for AnalysisResult {
    fn from(dto: AnalysisResultDTO) -> Self {
        AnalysisResult {
            evaluation: dto.evaluation.into(),
            summary: dto.summary,
            questions: dto.questions.into_iter().map(Into::into).collect(),
        }
    }
}

/// Session DTO V1.0.0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
#[serde(rename_all = "camelCase")]
pub struct SessionV1_0_0 {
    pub id: String,
    pub resume_text: String,
    pub analysis: AnalysisResultDTO,
    /// Epoch milliseconds.
    pub created_at: i64,
    /// Epoch milliseconds.
    pub last_accessed: i64,
}

impl IntoDomain<Session> for SessionV1_0_0 {
    fn into_domain(self) -> Session {
        Session {
            id: self.id,
            resume_text: self.resume_text,
            analysis: self.analysis.into(),
            created_at: self.created_at,
            last_accessed: self.last_accessed,
        }
    }
}

impl From<&Session> for SessionV1_0_0 {
    fn from(session: &Session) -> Self {
        SessionV1_0_0 {
            id: session.id.clone(),
            resume_text: session.resume_text.clone(),
            analysis: (&session.analysis).into(),
            created_at: session.created_at,
            last_accessed: session.last_accessed,
        }
    }
}

impl FromDomain<Session> for SessionV1_0_0 {
    fn from_domain(session: Session) -> Self {
        SessionV1_0_0::from(&session)
    }
}

// ============================================================================
// Migrator factory
// ============================================================================

/// Creates a Migrator for Session entities.
pub fn create_session_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();
    let path = version_migrate::Migrator::define("session")
        .from::<SessionV1_0_0>()
        .into_with_save::<Session>();
    migrator
        .register(path)
        .expect("Failed to register session migration path");
    migrator
}
