//! Firebase-backed identity provisioning and contact directory.
//!
//! Anonymous sign-up goes through the Identity Toolkit REST API; contacts are
//! stored as Firestore documents `users/{uid}`:
//!
//! ```text
//! { email: string, createdAt: timestamp, sessionId: string }
//! ```
//!
//! Documents written by older clients carry `gmail` instead of `email`;
//! both are accepted on read.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat};
use dhraviq_core::config::FirebaseConfig;
use dhraviq_core::error::{DhraviqError, Endpoint, Result};
use dhraviq_core::identity::{ContactDirectory, ContactRecord, Email, Identity, IdentityProvider};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com";
const FIRESTORE_URL: &str = "https://firestore.googleapis.com";

fn build_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| DhraviqError::config(format!("Failed to build HTTP client: {e}")))
}

/// Provisions anonymous Firebase users.
#[derive(Clone)]
pub struct FirebaseIdentityProvider {
    client: Client,
    api_key: String,
    base_url: String,
}

impl FirebaseIdentityProvider {
    pub fn new(config: &FirebaseConfig, timeout: Option<Duration>) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            api_key: config.api_key.clone(),
            base_url: IDENTITY_TOOLKIT_URL.to_string(),
        })
    }

    /// Points the provider at another host (emulator, tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignUpResponse {
    local_id: String,
    id_token: String,
}

#[async_trait]
impl IdentityProvider for FirebaseIdentityProvider {
    async fn provision(&self) -> Result<Identity> {
        let url = format!("{}/v1/accounts:signUp?key={}", self.base_url, self.api_key);
        let response = self
            .client
            .post(&url)
            .json(&json!({ "returnSecureToken": true }))
            .send()
            .await
            .map_err(|e| DhraviqError::IdentityProvision(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DhraviqError::IdentityProvision(format!(
                "sign-up rejected with status {}",
                status.as_u16()
            )));
        }

        let body: SignUpResponse = response.json().await.map_err(|e| {
            DhraviqError::IdentityProvision(format!("invalid sign-up response: {e}"))
        })?;
        tracing::info!(user_id = %body.local_id, "Anonymous identity provisioned");
        Ok(Identity::provisioned(body.local_id, body.id_token))
    }
}

/// Contact directory stored in Firestore.
#[derive(Clone)]
pub struct FirestoreContactDirectory {
    client: Client,
    project_id: String,
    base_url: String,
}

impl FirestoreContactDirectory {
    pub fn new(config: &FirebaseConfig, timeout: Option<Duration>) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            project_id: config.project_id.clone(),
            base_url: FIRESTORE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn document_url(&self, user_id: &str) -> String {
        format!(
            "{}/v1/projects/{}/databases/(default)/documents/users/{}",
            self.base_url, self.project_id, user_id
        )
    }

    fn authorized(request: RequestBuilder, identity: &Identity) -> RequestBuilder {
        match identity.id_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[derive(Serialize, Deserialize, Default)]
struct FirestoreDocument {
    #[serde(default)]
    fields: serde_json::Map<String, Value>,
}

impl FirestoreDocument {
    fn from_record(record: &ContactRecord) -> Self {
        let created_at = DateTime::from_timestamp_millis(record.created_at)
            .unwrap_or_default()
            .to_rfc3339_opts(SecondsFormat::Millis, true);
        let mut fields = serde_json::Map::new();
        fields.insert("email".into(), json!({ "stringValue": record.email.as_str() }));
        fields.insert("createdAt".into(), json!({ "timestampValue": created_at }));
        fields.insert("sessionId".into(), json!({ "stringValue": record.session_id }));
        Self { fields }
    }

    fn string_field(&self, name: &str) -> Option<&str> {
        self.fields.get(name)?.get("stringValue")?.as_str()
    }

    fn timestamp_millis(&self, name: &str) -> Option<i64> {
        let raw = self.fields.get(name)?.get("timestampValue")?.as_str()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|t| t.timestamp_millis())
    }

    fn into_record(self, identity: &Identity) -> Option<ContactRecord> {
        let raw_email = self
            .string_field("email")
            .or_else(|| self.string_field("gmail"))?;
        let email = match Email::parse(raw_email) {
            Ok(email) => email,
            Err(_) => {
                tracing::warn!(user_id = %identity.user_id, "Stored contact has an invalid email");
                return None;
            }
        };
        Some(ContactRecord {
            email,
            created_at: self.timestamp_millis("createdAt").unwrap_or_default(),
            session_id: self
                .string_field("sessionId")
                .map(str::to_string)
                .unwrap_or_else(|| identity.user_id.clone()),
        })
    }
}

#[async_trait]
impl ContactDirectory for FirestoreContactDirectory {
    async fn put_contact(&self, identity: &Identity, record: &ContactRecord) -> Result<()> {
        let request = self
            .client
            .patch(self.document_url(&identity.user_id))
            .json(&FirestoreDocument::from_record(record));
        let response = Self::authorized(request, identity)
            .send()
            .await
            .map_err(|e| DhraviqError::Gate(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DhraviqError::Gate(format!(
                "contact write rejected with status {}",
                status.as_u16()
            )));
        }
        Ok(())
    }

    async fn get_contact(&self, identity: &Identity) -> Result<Option<ContactRecord>> {
        let request = self.client.get(self.document_url(&identity.user_id));
        let response = Self::authorized(request, identity)
            .send()
            .await
            .map_err(|e| DhraviqError::request(Endpoint::Identity, None, e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(DhraviqError::request(
                Endpoint::Identity,
                Some(status.as_u16()),
                status.canonical_reason().unwrap_or("unknown status"),
            ));
        }

        let document: FirestoreDocument = response.json().await.map_err(|e| {
            DhraviqError::request(Endpoint::Identity, None, format!("invalid document: {e}"))
        })?;
        Ok(document.into_record(identity))
    }
}
