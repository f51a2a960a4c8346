//! Locally persisted anonymous identity.
//!
//! Without a hosted identity service, the first provisioned identity is kept
//! under `identity/` so a contact captured in one run still unlocks the next.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::OnceCell;
use version_migrate::AsyncDirStorage;

use crate::dto::create_identity_migrator;
use crate::paths::{Collection, DhraviqPaths};
use dhraviq_core::clock::{Clock, SystemClock, local_id};
use dhraviq_core::error::{DhraviqError, Result};
use dhraviq_core::identity::{Identity, IdentityProvider, LOCAL_IDENTITY_PREFIX};

const IDENTITY_ENTITY: &str = "identity";
const CURRENT_KEY: &str = "current";

pub struct LocalIdentityProvider {
    paths: DhraviqPaths,
    clock: Arc<dyn Clock>,
    storage: OnceCell<AsyncDirStorage>,
}

impl LocalIdentityProvider {
    pub fn new(base_dir: Option<&Path>) -> Self {
        Self::with_clock(base_dir, Arc::new(SystemClock))
    }

    pub fn with_clock(base_dir: Option<&Path>, clock: Arc<dyn Clock>) -> Self {
        Self {
            paths: DhraviqPaths::new(base_dir),
            clock,
            storage: OnceCell::new(),
        }
    }

    async fn storage(&self) -> Result<&AsyncDirStorage> {
        self.storage
            .get_or_try_init(|| {
                self.paths
                    .create_async_dir_storage(Collection::Identity, create_identity_migrator())
            })
            .await
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    async fn provision(&self) -> Result<Identity> {
        let storage = self
            .storage()
            .await
            .map_err(|e| DhraviqError::IdentityProvision(e.to_string()))?;

        match storage.load::<Identity>(IDENTITY_ENTITY, CURRENT_KEY).await {
            Ok(identity) => return Ok(identity),
            Err(e) => {
                let err = DhraviqError::from(e);
                if !err.is_not_found_or_missing() {
                    return Err(DhraviqError::IdentityProvision(err.to_string()));
                }
            }
        }

        let identity = Identity::local(local_id(LOCAL_IDENTITY_PREFIX, self.clock.as_ref()));
        storage
            .save(IDENTITY_ENTITY, CURRENT_KEY, &identity)
            .await
            .map_err(|e| DhraviqError::IdentityProvision(e.to_string()))?;
        tracing::info!(user_id = %identity.user_id, "Local identity created");
        Ok(identity)
    }
}
