//! Static reference collections: company packs and the HR bank.

use serde::{Deserialize, Serialize};
use version_migrate::DeriveQueryable as Queryable;

use crate::question::Question;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackDifficulty {
    #[default]
    Mixed,
    Medium,
    Hard,
}

/// Interview questions curated for one company.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Queryable)]
#[queryable(entity = "company")]
pub struct CompanyPack {
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
    pub questions: Vec<Question>,
    /// Set by the store on every save (epoch milliseconds).
    #[serde(default, alias = "updatedAt")]
    pub updated_at: i64,
}

/// Bundle of reference data loaded into the store in one go.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReferencePacks {
    #[serde(default)]
    pub companies: Vec<CompanyPack>,
    #[serde(default, alias = "hrBank")]
    pub hr_bank: Vec<Question>,
}
