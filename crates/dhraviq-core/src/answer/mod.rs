//! Answer cache model.

mod model;

pub use model::CachedAnswer;
