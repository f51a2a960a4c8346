//! Error types for the Dhraviq core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Remote endpoint that produced a [`DhraviqError::Request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Endpoint {
    /// Resume analysis (`/phase1`).
    Analysis,
    /// Per-question coaching (`/phase2`).
    Coaching,
    /// Anonymous identity provisioning or the contact directory.
    Identity,
}

impl Endpoint {
    pub fn label(self) -> &'static str {
        match self {
            Endpoint::Analysis => "Phase 1",
            Endpoint::Coaching => "Phase 2",
            Endpoint::Identity => "Identity",
        }
    }
}

/// A shared error type for the entire Dhraviq core.
///
/// Variants follow the recovery policy of the callers: storage and identity
/// failures degrade silently, gate and request failures reach the user as
/// notices, validation failures are rejected before any I/O.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum DhraviqError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// Local store unavailable or an operation on it failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },

    /// Anonymous identity provisioning failed
    #[error("Identity provisioning failed: {0}")]
    IdentityProvision(String),

    /// Contact capture failed
    #[error("Could not save contact: {0}")]
    Gate(String),

    /// A remote call failed or answered with a non-2xx status
    #[error("{} API failed: {status_text}", endpoint.label())]
    Request {
        endpoint: Endpoint,
        status: Option<u16>,
        status_text: String,
    },

    /// Input rejected before any network or storage call
    #[error("{0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DhraviqError {
    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Creates a Validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Creates a Request error for a response with the given status.
    pub fn request(
        endpoint: Endpoint,
        status: Option<u16>,
        status_text: impl Into<String>,
    ) -> Self {
        Self::Request {
            endpoint,
            status,
            status_text: status_text.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_request(&self) -> bool {
        matches!(self, Self::Request { .. })
    }

    /// Check if this error indicates a missing record.
    ///
    /// Returns true for `NotFound` errors and for storage errors whose message
    /// reports a missing file.
    pub fn is_not_found_or_missing(&self) -> bool {
        match self {
            Self::NotFound { .. } => true,
            Self::Storage(message) => {
                let lower = message.to_lowercase();
                lower.contains("not found")
                    || lower.contains("no such file")
                    || lower.contains("cannot find")
            }
            _ => false,
        }
    }
}

impl From<std::io::Error> for DhraviqError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(format!("{} (kind: {:?})", err, err.kind()))
    }
}

impl From<serde_json::Error> for DhraviqError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<version_migrate::MigrationError> for DhraviqError {
    fn from(err: version_migrate::MigrationError) -> Self {
        use version_migrate::MigrationError;

        match err {
            MigrationError::EntityNotFound(id) => Self::not_found("entity", id),
            MigrationError::DeserializationError(_) | MigrationError::SerializationError(_) => {
                Self::Serialization {
                    format: "migration".to_string(),
                    message: err.to_string(),
                }
            }
            _ => Self::Storage(err.to_string()),
        }
    }
}

impl From<anyhow::Error> for DhraviqError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// A type alias for `Result<T, DhraviqError>`.
pub type Result<T> = std::result::Result<T, DhraviqError>;
