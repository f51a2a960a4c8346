//! Identity and contact domain model.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use version_migrate::DeriveQueryable as Queryable;

use crate::error::{DhraviqError, Result};

/// Prefix of locally generated fallback identities.
pub const LOCAL_IDENTITY_PREFIX: &str = "anon";

/// How an identity was established.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IdentityOrigin {
    /// Issued by the external identity service.
    Provisioned { id_token: String },
    /// Generated locally after provisioning failed.
    LocalFallback,
}

/// Anonymous user identity, stable for the life of the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Queryable)]
#[queryable(entity = "identity")]
pub struct Identity {
    pub user_id: String,
    pub origin: IdentityOrigin,
}

impl Identity {
    pub fn provisioned(user_id: impl Into<String>, id_token: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            origin: IdentityOrigin::Provisioned {
                id_token: id_token.into(),
            },
        }
    }

    pub fn local(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            origin: IdentityOrigin::LocalFallback,
        }
    }

    /// Bearer token for the external service, if any.
    pub fn id_token(&self) -> Option<&str> {
        match &self.origin {
            IdentityOrigin::Provisioned { id_token } => Some(id_token),
            IdentityOrigin::LocalFallback => None,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self.origin, IdentityOrigin::LocalFallback)
    }
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
    })
}

/// A syntactically valid email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validates and trims the address.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if email_pattern().is_match(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(DhraviqError::validation("Please enter a valid email address."))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Email {
    type Error = DhraviqError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Captured contact for an identity. Once written it unlocks coaching for good.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Queryable)]
#[queryable(entity = "contact")]
pub struct ContactRecord {
    pub email: Email,
    pub created_at: i64,
    /// The identity's user id.
    pub session_id: String,
}
