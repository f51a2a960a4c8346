//! Session domain model.

mod model;

pub use model::Session;

/// Prefix of generated session ids.
pub const SESSION_ID_PREFIX: &str = "session";
