//! Remote services: the analysis/coaching backend and Firebase.

pub mod coaching_client;
pub mod firebase;

#[cfg(test)]
mod test_support;

pub use coaching_client::HttpCoachingClient;
pub use firebase::{FirebaseIdentityProvider, FirestoreContactDirectory};
