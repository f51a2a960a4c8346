//! Question domain model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use version_migrate::DeriveQueryable as Queryable;

use crate::error::DhraviqError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Technical,
    Behavioral,
    Hr,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Technical => "technical",
            Category::Behavioral => "behavioral",
            Category::Hr => "hr",
        }
    }
}

impl Difficulty {
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DhraviqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "technical" => Ok(Category::Technical),
            "behavioral" | "behavioural" => Ok(Category::Behavioral),
            "hr" => Ok(Category::Hr),
            other => Err(DhraviqError::validation(format!(
                "Unknown question category '{other}'"
            ))),
        }
    }
}

impl FromStr for Difficulty {
    type Err = DhraviqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(DhraviqError::validation(format!(
                "Unknown difficulty '{other}'"
            ))),
        }
    }
}

/// An interview question.
///
/// `id` is unique only within the source the question came from; see
/// [`QuestionRef`](super::QuestionRef) for the namespaced form used across sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable)]
#[queryable(entity = "hr_question")]
pub struct Question {
    pub id: String,
    pub category: Category,
    pub difficulty: Difficulty,
    /// Reference packs use the original `question` key.
    #[serde(alias = "question")]
    pub text: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Precomputed answer shipped with the question, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
}

impl Question {
    pub fn new(
        id: impl Into<String>,
        category: Category,
        difficulty: Difficulty,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            difficulty,
            text: text.into(),
            tags: BTreeSet::new(),
            answer: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}
