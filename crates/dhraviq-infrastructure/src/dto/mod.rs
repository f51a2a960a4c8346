//! Data Transfer Objects (DTOs) for persistence.
//!
//! These DTOs represent the versioned schema of every stored collection.
//! They are private to the infrastructure layer and absorb the evolution
//! of the storage format over time.
//!
//! ## Schema Versioning (Semantic Versioning)
//!
//! - **MAJOR (X.0.0)**: Breaking changes (field removal, type changes)
//! - **MINOR (1.X.0)**: Backward-compatible additions (new optional fields)
//! - **PATCH (1.0.X)**: Backward-compatible fixes (not typically used for schema)
//!
//! A new version adds a DTO and a `MigratesTo` step; stored documents are
//! upgraded on read and never rewritten destructively.

mod answer;
mod company;
mod contact;
mod identity;
mod question;
mod session;

pub use answer::{AnswerV1_0_0, create_answer_migrator};
pub use company::{CompanyV1_0_0, create_company_migrator};
pub use contact::{ContactV1_0_0, create_contact_migrator};
pub use identity::{IdentityV1_0_0, create_identity_migrator};
pub use question::{QuestionV1_0_0, create_hr_question_migrator};
pub use session::{AnalysisResultDTO, EvaluationDTO, SessionV1_0_0, create_session_migrator};
