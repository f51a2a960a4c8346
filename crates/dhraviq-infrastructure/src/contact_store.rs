//! Offline contact directory.
//!
//! Used when no hosted identity service is configured. Each identity's
//! contact is one JSON document under `contacts/`.

use async_trait::async_trait;
use std::path::Path;
use tokio::sync::OnceCell;
use version_migrate::AsyncDirStorage;

use crate::dto::create_contact_migrator;
use crate::local_store::record_key;
use crate::paths::{Collection, DhraviqPaths};
use dhraviq_core::error::{DhraviqError, Result};
use dhraviq_core::identity::{ContactDirectory, ContactRecord, Identity};

const CONTACT_ENTITY: &str = "contact";

pub struct LocalContactDirectory {
    paths: DhraviqPaths,
    storage: OnceCell<AsyncDirStorage>,
}

impl LocalContactDirectory {
    pub fn new(base_dir: Option<&Path>) -> Self {
        Self {
            paths: DhraviqPaths::new(base_dir),
            storage: OnceCell::new(),
        }
    }

    async fn storage(&self) -> Result<&AsyncDirStorage> {
        self.storage
            .get_or_try_init(|| {
                self.paths
                    .create_async_dir_storage(Collection::Contacts, create_contact_migrator())
            })
            .await
    }
}

#[async_trait]
impl ContactDirectory for LocalContactDirectory {
    async fn put_contact(&self, identity: &Identity, record: &ContactRecord) -> Result<()> {
        self.storage()
            .await?
            .save(CONTACT_ENTITY, &record_key(&identity.user_id), record)
            .await
            .map_err(|e| DhraviqError::Gate(e.to_string()))
    }

    async fn get_contact(&self, identity: &Identity) -> Result<Option<ContactRecord>> {
        let result = self
            .storage()
            .await?
            .load::<ContactRecord>(CONTACT_ENTITY, &record_key(&identity.user_id))
            .await;
        match result {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                let err = DhraviqError::from(e);
                if err.is_not_found_or_missing() {
                    Ok(None)
                } else {
                    Err(err)
                }
            }
        }
    }
}
