//! Identity and contact gate.
//!
//! Coaching answers are unlocked once the anonymous user has left an email
//! address. The identity is established once per process; the contact, once
//! saved, stays unlocked.

use std::sync::Arc;
use tokio::sync::{OnceCell, RwLock};

use dhraviq_core::clock::{Clock, local_id};
use dhraviq_core::identity::{
    ContactDirectory, ContactRecord, Email, Identity, IdentityProvider, LOCAL_IDENTITY_PREFIX,
};

pub struct GateManager {
    provider: Arc<dyn IdentityProvider>,
    directory: Arc<dyn ContactDirectory>,
    clock: Arc<dyn Clock>,
    identity: OnceCell<Identity>,
    /// Set by a successful save or lookup; never cleared.
    contact: RwLock<Option<Email>>,
}

impl GateManager {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        directory: Arc<dyn ContactDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            provider,
            directory,
            clock,
            identity: OnceCell::new(),
            contact: RwLock::new(None),
        }
    }

    /// Returns the identity for this process, provisioning it on first use.
    ///
    /// Concurrent first callers share one provisioning attempt. A failed
    /// attempt falls back to a local `anon_` id and is only logged.
    pub async fn ensure_identity(&self) -> Identity {
        self.identity
            .get_or_init(|| async {
                match self.provider.provision().await {
                    Ok(identity) => identity,
                    Err(e) => {
                        tracing::warn!("Identity provisioning failed, using a local id: {}", e);
                        Identity::local(local_id(LOCAL_IDENTITY_PREFIX, self.clock.as_ref()))
                    }
                }
            })
            .await
            .clone()
    }

    /// Records the contact for the current identity.
    ///
    /// Returns `false` when the directory write fails; the failure is logged.
    pub async fn save_contact(&self, email: &Email) -> bool {
        let identity = self.ensure_identity().await;
        let record = ContactRecord {
            email: email.clone(),
            created_at: self.clock.now_millis(),
            session_id: identity.user_id.clone(),
        };

        match self.directory.put_contact(&identity, &record).await {
            Ok(()) => {
                *self.contact.write().await = Some(email.clone());
                tracing::info!(user_id = %identity.user_id, "Contact saved");
                true
            }
            Err(e) => {
                tracing::error!(user_id = %identity.user_id, "Failed to save contact: {}", e);
                false
            }
        }
    }

    pub async fn has_contact(&self) -> bool {
        self.get_contact().await.is_some()
    }

    /// The captured email, if any. Lookup failures read as "no contact".
    pub async fn get_contact(&self) -> Option<Email> {
        if let Some(email) = self.contact.read().await.clone() {
            return Some(email);
        }

        let identity = self.ensure_identity().await;
        match self.directory.get_contact(&identity).await {
            Ok(Some(record)) => {
                *self.contact.write().await = Some(record.email.clone());
                Some(record.email)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Contact lookup failed: {}", e);
                None
            }
        }
    }
}
