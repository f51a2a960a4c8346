//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::clock::DAY_MS;
use crate::error::{DhraviqError, Result};

pub const ENV_API_BASE_URL: &str = "DHRAVIQ_API_BASE_URL";
pub const ENV_API_ORIGIN: &str = "DHRAVIQ_API_ORIGIN";
pub const ENV_DATA_DIR: &str = "DHRAVIQ_DATA_DIR";
pub const ENV_REQUEST_TIMEOUT_SECS: &str = "DHRAVIQ_REQUEST_TIMEOUT_SECS";
pub const ENV_SESSION_MAX_AGE_DAYS: &str = "DHRAVIQ_SESSION_MAX_AGE_DAYS";
pub const ENV_PURGE_ON_CLEAR: &str = "DHRAVIQ_PURGE_ON_CLEAR";
pub const ENV_FIREBASE_API_KEY: &str = "DHRAVIQ_FIREBASE_API_KEY";
pub const ENV_FIREBASE_PROJECT_ID: &str = "DHRAVIQ_FIREBASE_PROJECT_ID";

pub const DEFAULT_API_BASE_URL: &str = "/api";
pub const DEFAULT_API_ORIGIN: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_SESSION_MAX_AGE_DAYS: u64 = 30;

/// What clearing the current session does to its stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ClearSessionMode {
    /// Only the published session is cleared; the record stays on disk.
    #[default]
    KeepPersisted,
    /// The stored record is deleted as well.
    PurgePersisted,
}

/// Credentials for the hosted identity and contact service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirebaseConfig {
    pub api_key: String,
    pub project_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base URL of the analysis backend, possibly relative (e.g. `/api`).
    pub api_base_url: String,
    /// Origin a relative base URL is resolved against.
    pub api_origin: String,
    /// Overrides the platform data directory.
    pub data_dir: Option<PathBuf>,
    pub request_timeout: Option<Duration>,
    pub session_max_age: Duration,
    pub clear_session_mode: ClearSessionMode,
    pub firebase: Option<FirebaseConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_origin: DEFAULT_API_ORIGIN.to_string(),
            data_dir: None,
            request_timeout: Some(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)),
            session_max_age: days(DEFAULT_SESSION_MAX_AGE_DAYS),
            clear_session_mode: ClearSessionMode::default(),
            firebase: None,
        }
    }
}

fn days(n: u64) -> Duration {
    Duration::from_millis(n.saturating_mul(DAY_MS as u64))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_u64(key: &str, value: &str) -> Result<u64> {
    value.trim().parse().map_err(|_| {
        DhraviqError::config(format!("{key} must be a non-negative integer, got '{value}'"))
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(DhraviqError::config(format!(
            "{key} must be a boolean, got '{value}'"
        ))),
    }
}

impl AppConfig {
    /// Builds the configuration from a key lookup (normally the environment).
    ///
    /// Missing or blank keys take their defaults. A request timeout of `0`
    /// disables the timeout.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_empty(lookup(key));
        let mut config = Self::default();

        if let Some(base) = get(ENV_API_BASE_URL) {
            config.api_base_url = base;
        }
        if let Some(origin) = get(ENV_API_ORIGIN) {
            config.api_origin = origin;
        }
        config.data_dir = get(ENV_DATA_DIR).map(PathBuf::from);

        if let Some(raw) = get(ENV_REQUEST_TIMEOUT_SECS) {
            config.request_timeout = match parse_u64(ENV_REQUEST_TIMEOUT_SECS, &raw)? {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            };
        }
        if let Some(raw) = get(ENV_SESSION_MAX_AGE_DAYS) {
            config.session_max_age = days(parse_u64(ENV_SESSION_MAX_AGE_DAYS, &raw)?);
        }
        if let Some(raw) = get(ENV_PURGE_ON_CLEAR) {
            if parse_bool(ENV_PURGE_ON_CLEAR, &raw)? {
                config.clear_session_mode = ClearSessionMode::PurgePersisted;
            }
        }

        config.firebase = match (get(ENV_FIREBASE_API_KEY), get(ENV_FIREBASE_PROJECT_ID)) {
            (Some(api_key), Some(project_id)) => Some(FirebaseConfig { api_key, project_id }),
            (None, None) => None,
            _ => {
                return Err(DhraviqError::config(format!(
                    "{ENV_FIREBASE_API_KEY} and {ENV_FIREBASE_PROJECT_ID} must be set together"
                )));
            }
        };

        Ok(config)
    }

    /// The absolute base URL of the analysis backend, without a trailing slash.
    pub fn resolved_api_base(&self) -> String {
        let base = self.api_base_url.trim_end_matches('/');
        if base.starts_with("http://") || base.starts_with("https://") {
            base.to_string()
        } else {
            let origin = self.api_origin.trim_end_matches('/');
            let path = base.trim_start_matches('/');
            if path.is_empty() {
                origin.to_string()
            } else {
                format!("{origin}/{path}")
            }
        }
    }
}
