//! Resume analysis results and coaching responses.

mod model;

pub use model::{AnalysisResult, CoachResponse, Evaluation, ReadinessBand};
