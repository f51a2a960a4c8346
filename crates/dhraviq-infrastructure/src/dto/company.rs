//! Company pack DTOs and migrations
//!
//! ## Version History
//! - **1.0.0**: Initial schema

use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, Versioned};

use super::question::QuestionV1_0_0;
use dhraviq_core::reference::{CompanyPack, PackDifficulty};

/// Company pack DTO V1.0.0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
#[serde(rename_all = "camelCase")]
pub struct CompanyV1_0_0 {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub logo: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub difficulty: PackDifficulty,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub questions: Vec<QuestionV1_0_0>,
    /// Epoch milliseconds of the last save.
    pub updated_at: i64,
}

impl IntoDomain<CompanyPack> for CompanyV1_0_0 {
    fn into_domain(self) -> CompanyPack {
        CompanyPack {
            id: self.id,
            name: self.name,
            logo: self.logo,
            description: self.description,
            difficulty: self.difficulty,
            featured: self.featured,
            questions: self.questions.into_iter().map(Into::into).collect(),
            updated_at: self.updated_at,
        }
    }
}

impl FromDomain<CompanyPack> for CompanyV1_0_0 {
    fn from_domain(company: CompanyPack) -> Self {
        CompanyV1_0_0 {
            questions: company.questions.iter().map(QuestionV1_0_0::from).collect(),
            id: company.id,
            name: company.name,
            logo: company.logo,
            description: company.description,
            difficulty: company.difficulty,
            featured: company.featured,
            updated_at: company.updated_at,
        }
    }
}

/// Creates a Migrator for CompanyPack entities.
pub fn create_company_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();
    let path = version_migrate::Migrator::define("company")
        .from::<CompanyV1_0_0>()
        .into_with_save::<CompanyPack>();
    migrator
        .register(path)
        .expect("Failed to register company migration path");
    migrator
}
