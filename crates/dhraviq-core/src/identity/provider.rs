//! Identity and contact service interfaces.

use async_trait::async_trait;

use super::model::{ContactRecord, Identity};
use crate::error::Result;

/// Issues anonymous identities.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Provisions a fresh anonymous identity.
    ///
    /// Callers fall back to a local id when this fails.
    async fn provision(&self) -> Result<Identity>;
}

/// Durable record of which identities have given their email.
#[async_trait]
pub trait ContactDirectory: Send + Sync {
    /// Writes (or overwrites) the contact for `identity`.
    async fn put_contact(&self, identity: &Identity, record: &ContactRecord) -> Result<()>;

    /// Reads the contact for `identity`.
    ///
    /// - `Ok(Some(_))`: a contact was captured earlier
    /// - `Ok(None)`: no contact on record
    /// - `Err(_)`: the directory could not be reached
    async fn get_contact(&self, identity: &Identity) -> Result<Option<ContactRecord>>;
}
