//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Record storage (could swap JSON files -> SQLite)
//! - Clock (for testing)

mod error;
mod repos;
mod testing;

pub use error::{Listing, LoadFailure, StoreError};
pub use repos::{CharacterStore, MonsterStore};
pub use testing::ClockPort;

#[cfg(test)]
pub use repos::{MockCharacterStore, MockMonsterStore};
#[cfg(test)]
pub use testing::MockClockPort;
