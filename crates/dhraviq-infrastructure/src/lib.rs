//! Persistence, configuration and file handling for Dhraviq.

pub mod config_service;
pub mod contact_store;
pub mod dto;
pub mod identity_store;
pub mod local_store;
pub mod paths;
pub mod resume_text;
pub mod session_index;

pub use config_service::ConfigService;
pub use contact_store::LocalContactDirectory;
pub use identity_store::LocalIdentityProvider;
pub use local_store::AsyncDirLocalStore;
pub use paths::{Collection, DhraviqPaths};
pub use resume_text::extract_resume_text;
