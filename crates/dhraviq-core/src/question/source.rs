//! Question provenance and namespaced question references.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::model::Question;
use crate::error::DhraviqError;

/// Where a question came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionSource {
    /// Delivered inside the current session's analysis.
    AnalysisDerived,
    /// Loaded from a static company pack.
    CompanyPack { company_id: String },
    /// Loaded from the static HR bank.
    HrBank,
}

/// A question id namespaced by its source.
///
/// Raw ids are only unique within one source, so everything that crosses
/// sources (the workflow, the answer cache) uses this form:
/// `analysis:<id>`, `company:<company_id>:<id>` or `hr:<id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuestionRef {
    pub source: QuestionSource,
    pub id: String,
}

impl QuestionRef {
    pub fn new(source: QuestionSource, id: impl Into<String>) -> Self {
        Self {
            source,
            id: id.into(),
        }
    }

    pub fn analysis(id: impl Into<String>) -> Self {
        Self::new(QuestionSource::AnalysisDerived, id)
    }

    pub fn company(company_id: impl Into<String>, id: impl Into<String>) -> Self {
        Self::new(
            QuestionSource::CompanyPack {
                company_id: company_id.into(),
            },
            id,
        )
    }

    pub fn hr(id: impl Into<String>) -> Self {
        Self::new(QuestionSource::HrBank, id)
    }

    /// Parses a namespaced reference.
    ///
    /// A bare id without a known prefix is rejected rather than guessed.
    pub fn parse(s: &str) -> Result<Self, DhraviqError> {
        let invalid = || {
            DhraviqError::validation(format!(
                "Invalid question reference '{s}' (expected analysis:<id>, company:<company>:<id> or hr:<id>)"
            ))
        };

        let (prefix, rest) = s.split_once(':').ok_or_else(invalid)?;
        match prefix {
            "analysis" if !rest.is_empty() => Ok(Self::analysis(rest)),
            "hr" if !rest.is_empty() => Ok(Self::hr(rest)),
            "company" => {
                let (company_id, id) = rest.split_once(':').ok_or_else(invalid)?;
                if company_id.is_empty() || id.is_empty() {
                    return Err(invalid());
                }
                Ok(Self::company(company_id, id))
            }
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for QuestionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            QuestionSource::AnalysisDerived => write!(f, "analysis:{}", self.id),
            QuestionSource::CompanyPack { company_id } => {
                write!(f, "company:{}:{}", company_id, self.id)
            }
            QuestionSource::HrBank => write!(f, "hr:{}", self.id),
        }
    }
}

impl FromStr for QuestionRef {
    type Err = DhraviqError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A question together with its provenance.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcedQuestion {
    pub source: QuestionSource,
    pub question: Question,
}

impl SourcedQuestion {
    pub fn new(source: QuestionSource, question: Question) -> Self {
        Self { source, question }
    }

    pub fn question_ref(&self) -> QuestionRef {
        QuestionRef::new(self.source.clone(), self.question.id.clone())
    }
}
