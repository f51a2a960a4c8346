//! Anonymous identity and contact capture.

mod model;
mod provider;

pub use model::{ContactRecord, Email, Identity, IdentityOrigin, LOCAL_IDENTITY_PREFIX};
pub use provider::{ContactDirectory, IdentityProvider};
