//! Unified path management for Dhraviq data.
//!
//! All collections live under one data directory resolved through
//! `AppPaths` from the version-migrate crate.
//!
//! # Directory Structure
//!
//! ```text
//! <data dir>/              # DHRAVIQ_DATA_DIR, or ~/.local/share/dhraviq
//! ├── sessions/            # One JSON document per session
//! ├── answers/             # Cached coaching answers
//! ├── companies/           # Company question packs
//! ├── hr_bank/             # HR bank questions
//! ├── contacts/            # Offline contact directory
//! ├── identity/            # Persisted local identity
//! └── logs/                # CLI logs (daily rolling)
//! ```

use dhraviq_core::error::{DhraviqError, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use version_migrate::{
    AppPaths, AsyncDirStorage, DirStorageStrategy, FilenameEncoding, FormatStrategy, PathStrategy,
};

const APP_NAME: &str = "dhraviq";

/// A stored collection and its directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Sessions,
    Answers,
    Companies,
    HrBank,
    Contacts,
    Identity,
}

impl Collection {
    pub fn dir_name(self) -> &'static str {
        match self {
            Collection::Sessions => "sessions",
            Collection::Answers => "answers",
            Collection::Companies => "companies",
            Collection::HrBank => "hr_bank",
            Collection::Contacts => "contacts",
            Collection::Identity => "identity",
        }
    }
}

/// Resolves the data directory and opens collection storages under it.
#[derive(Debug, Clone, Default)]
pub struct DhraviqPaths {
    base: Option<PathBuf>,
}

impl DhraviqPaths {
    /// `base` overrides the platform data directory (tests, `DHRAVIQ_DATA_DIR`).
    pub fn new(base: Option<&Path>) -> Self {
        Self {
            base: base.map(Path::to_path_buf),
        }
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.base {
            Some(base) => Ok(base.clone()),
            None => AppPaths::new(APP_NAME)
                .data_dir()
                .map_err(|_| DhraviqError::config("Cannot resolve the platform data directory")),
        }
    }

    pub fn logs_dir(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join("logs"))
    }

    pub fn collection_dir(&self, collection: Collection) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(collection.dir_name()))
    }

    /// Opens (creating if missing) the JSON document storage for `collection`.
    ///
    /// Existing directories and documents are left untouched.
    pub async fn create_async_dir_storage(
        &self,
        collection: Collection,
        migrator: version_migrate::Migrator,
    ) -> Result<AsyncDirStorage> {
        let base_dir = self.data_dir()?;
        fs::create_dir_all(&base_dir)
            .await
            .map_err(|e| DhraviqError::storage(format!("Failed to create data directory: {}", e)))?;

        let paths = AppPaths::new(APP_NAME).data_strategy(PathStrategy::CustomBase(base_dir));
        let strategy = DirStorageStrategy::default()
            .with_format(FormatStrategy::Json)
            .with_filename_encoding(FilenameEncoding::Direct);

        AsyncDirStorage::new(paths, collection.dir_name(), migrator, strategy)
            .await
            .map_err(|e| {
                DhraviqError::storage(format!(
                    "Failed to open {} storage: {}",
                    collection.dir_name(),
                    e
                ))
            })
    }
}
