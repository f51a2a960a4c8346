//! Configuration service implementation.
//!
//! Loads [`AppConfig`] from the process environment. Values from a `.env`
//! file fill in keys the environment does not set.

use dhraviq_core::config::AppConfig;
use dhraviq_core::error::{DhraviqError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct ConfigService {
    /// Explicit `.env` file. When `None`, the usual `.env` lookup applies.
    env_file: Option<PathBuf>,
}

impl ConfigService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_env_file(path: impl AsRef<Path>) -> Self {
        Self {
            env_file: Some(path.as_ref().to_path_buf()),
        }
    }

    /// Reads the `.env` entries without touching the process environment.
    fn read_env_file(&self) -> Result<HashMap<String, String>> {
        let entries = match &self.env_file {
            Some(path) => dotenvy::from_path_iter(path).map_err(|e| {
                DhraviqError::config(format!("Cannot read {}: {}", path.display(), e))
            })?,
            None => match dotenvy::dotenv_iter() {
                Ok(iter) => iter,
                Err(e) if e.not_found() => return Ok(HashMap::new()),
                Err(e) => return Err(DhraviqError::config(format!("Cannot read .env: {}", e))),
            },
        };

        let mut values = HashMap::new();
        for entry in entries {
            let (key, value) =
                entry.map_err(|e| DhraviqError::config(format!("Invalid .env entry: {}", e)))?;
            values.insert(key, value);
        }
        Ok(values)
    }

    pub fn load(&self) -> Result<AppConfig> {
        let file_values = self.read_env_file()?;
        let config = AppConfig::from_lookup(|key| {
            std::env::var(key)
                .ok()
                .or_else(|| file_values.get(key).cloned())
        })?;
        tracing::debug!(
            api_base = %config.resolved_api_base(),
            firebase = config.firebase.is_some(),
            "Configuration loaded"
        );
        Ok(config)
    }
}
