//! Search and facet filtering over question lists.

use super::model::{Category, Difficulty, Question};

/// Filter applied to question listings.
///
/// Empty fields match everything. The search term is matched
/// case-insensitively against the question text and its tags.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuestionFilter {
    pub search: Option<String>,
    pub difficulty: Option<Difficulty>,
    pub category: Option<Category>,
}

impl QuestionFilter {
    pub fn matches(&self, question: &Question) -> bool {
        if let Some(difficulty) = self.difficulty {
            if question.difficulty != difficulty {
                return false;
            }
        }
        if let Some(category) = self.category {
            if question.category != category {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                question.text.to_lowercase().contains(&term)
                    || question
                        .tags
                        .iter()
                        .any(|tag| tag.to_lowercase().contains(&term))
            }
        }
    }

    pub fn apply<'a, I>(&self, questions: I) -> Vec<&'a Question>
    where
        I: IntoIterator<Item = &'a Question>,
    {
        questions.into_iter().filter(|q| self.matches(q)).collect()
    }
}
