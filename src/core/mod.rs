//! Text transforms and figure tooling.

pub mod figures;
pub mod inspect;
pub mod splitter;
