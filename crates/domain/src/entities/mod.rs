//! Value entities nested inside records or stored alongside them.

mod companions;
mod items;
mod resource;

pub use companions::{Attitude, FavoriteSpell, MagicItem, Note, Quote, Relationship};
pub use items::{ActiveEffect, ClassEntry, Currency, EquipmentItem, Feature, ItemType, TreasureItem};
pub use resource::{ResourceDescriptor, RestKind};
