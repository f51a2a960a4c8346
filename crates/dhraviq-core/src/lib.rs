//! Domain model and service interfaces for the Dhraviq interview-prep core.
//!
//! Nothing in this crate performs I/O. Storage, HTTP and the workflow live
//! in the infrastructure, interaction and application crates.

pub mod analysis;
pub mod answer;
pub mod clock;
pub mod coach;
pub mod config;
pub mod error;
pub mod identity;
pub mod question;
pub mod reference;
pub mod session;
pub mod store;
pub mod upload;

pub use error::{DhraviqError, Result};
