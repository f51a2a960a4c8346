//! Company packs and HR bank.

mod model;

pub use model::{CompanyPack, PackDifficulty, ReferencePacks};
