pub mod analyze;
pub mod coach;
pub mod contact;
pub mod packs;
pub mod questions;
pub mod session;
