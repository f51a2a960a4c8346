//! Local identity DTOs and migrations
//!
//! ## Version History
//! - **1.0.0**: Initial schema

use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, Versioned};

use dhraviq_core::identity::{Identity, IdentityOrigin};

/// Identity DTO V1.0.0
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
#[serde(rename_all = "camelCase")]
pub struct IdentityV1_0_0 {
    pub user_id: String,
    pub origin: IdentityOrigin,
}

impl IntoDomain<Identity> for IdentityV1_0_0 {
    fn into_domain(self) -> Identity {
        Identity {
            user_id: self.user_id,
            origin: self.origin,
        }
    }
}

impl FromDomain<Identity> for IdentityV1_0_0 {
    fn from_domain(identity: Identity) -> Self {
        IdentityV1_0_0 {
            user_id: identity.user_id,
            origin: identity.origin,
        }
    }
}

/// Creates a Migrator for Identity entities.
pub fn create_identity_migrator() -> version_migrate::Migrator {
    let mut migrator = version_migrate::Migrator::builder().build();
    let path = version_migrate::Migrator::define("identity")
        .from::<IdentityV1_0_0>()
        .into_with_save::<Identity>();
    migrator
        .register(path)
        .expect("Failed to register identity migration path");
    migrator
}
