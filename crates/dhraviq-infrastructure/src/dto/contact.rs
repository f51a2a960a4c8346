//! Contact record DTOs and migrations
//!
//! ## Version History
//! - **1.0.0**: Initial schema

use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, Versioned};

use dhraviq_core::identity::{ContactRecord, Email};

/// Contact record DTO V1.0.0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
#[serde(rename_all = "camelCase")]
pub struct ContactV1_0_0 {
    /// Validated on load.
    pub email: Email,
    pub created_at: i64,
    pub session_id: String,
}

impl IntoDomain<ContactRecord> for ContactV1_0_0 {
    fn into_domain(self) -> ContactRecord {
        ContactRecord {
            email: self.email,
            created_at: self.created_at,
            session_id: self.session_id,
        }
    }
}

impl FromDomain<ContactRecord> for ContactV1_0_0 {
    fn from_domain(record: ContactRecord) -> Self {
        ContactV1_0_0 {
            email: record.email,
            created_at: record.created_at,
            session_id: record.session_id,
        }
    }
}

/// Creates a Migrator for ContactRecord entities.
pub fn create_contact_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();
    let path = version_migrate::Migrator::define("contact")
        .from::<ContactV1_0_0>()
        .into_with_save::<ContactRecord>();
    migrator
        .register(path)
        .expect("Failed to register contact migration path");
    migrator
}
