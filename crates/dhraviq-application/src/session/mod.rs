//! Current-session management.

mod manager;

pub use manager::{SessionManager, SessionState};
