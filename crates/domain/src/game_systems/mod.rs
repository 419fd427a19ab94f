//! Game rule derivations.

pub mod dnd5e;
