//! Remote analysis and coaching interface.

use async_trait::async_trait;

use crate::analysis::{AnalysisResult, CoachResponse};
use crate::error::Result;

/// The two backend endpoints.
///
/// Implementations make exactly one request per call: no retries, no caching.
/// Any failure is a `DhraviqError::Request`.
#[async_trait]
pub trait CoachingApi: Send + Sync {
    /// Analyzes resume (or synthesized profile) text.
    async fn analyze_resume(&self, resume_text: &str) -> Result<AnalysisResult>;

    /// Fetches coaching for one question in the context of a profile.
    async fn get_question_help(&self, question_text: &str, profile_text: &str)
    -> Result<CoachResponse>;
}
