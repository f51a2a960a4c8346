//! Resume analysis and coaching results.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::question::Question;

/// Scores produced by the resume analysis, each 0–100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Composite readiness score.
    pub dhraviq_score: u8,
    pub ats_score: u8,
    pub content_score: u8,
    pub impact_score: u8,
}

impl Evaluation {
    /// Clamps a raw score into 0–100 and rounds it.
    pub fn normalize_score(raw: f64) -> u8 {
        if raw.is_nan() {
            return 0;
        }
        raw.clamp(0.0, 100.0).round() as u8
    }

    pub fn readiness(&self) -> ReadinessBand {
        ReadinessBand::from_score(self.dhraviq_score)
    }
}

/// Human label for a readiness score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadinessBand {
    Excellent,
    Good,
    Fair,
    NeedsWork,
}

impl ReadinessBand {
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=u8::MAX => ReadinessBand::Excellent,
            60..=79 => ReadinessBand::Good,
            40..=59 => ReadinessBand::Fair,
            _ => ReadinessBand::NeedsWork,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ReadinessBand::Excellent => "Excellent",
            ReadinessBand::Good => "Good",
            ReadinessBand::Fair => "Fair",
            ReadinessBand::NeedsWork => "Needs Work",
        }
    }
}

impl fmt::Display for ReadinessBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Output of the resume analysis. Never mutated once produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub evaluation: Evaluation,
    pub summary: String,
    pub questions: Vec<Question>,
}

impl AnalysisResult {
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }
}

/// Coaching guidance for one question.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CoachResponse {
    /// A model answer that takes about a minute to say.
    pub model_answer: String,
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub pitfalls: Vec<String>,
    #[serde(default)]
    pub good_phrases: Vec<String>,
    #[serde(default)]
    pub followups: Vec<String>,
}

impl CoachResponse {
    /// Text stored in the answer cache.
    pub fn to_cached_text(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| self.model_answer.clone())
    }

    /// Reads a cached answer back. Plain-text entries become a bare model answer.
    pub fn from_cached_text(text: &str) -> Self {
        serde_json::from_str(text).unwrap_or_else(|_| Self {
            model_answer: text.to_string(),
            ..Self::default()
        })
    }
}
