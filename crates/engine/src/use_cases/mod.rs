//! Use cases - User story orchestration.
//!
//! Each use case wires ports and infrastructure together for one command.

mod error;
mod export_character;
mod import_character;
mod list_roster;

pub use error::RosterError;
pub use export_character::ExportCharacter;
pub use import_character::ImportCharacter;
pub use list_roster::{ListRoster, Roster};
