//! Interview questions, their sources and filtering.

mod filter;
mod model;
mod source;

pub use filter::QuestionFilter;
pub use model::{Category, Difficulty, Question};
pub use source::{QuestionRef, QuestionSource, SourcedQuestion};
