//! Storage port traits for record documents.

use async_trait::async_trait;
use tavernkeep_domain::{CharacterId, CharacterRecord, MonsterId, MonsterRecord};

use super::error::{Listing, StoreError};

// =============================================================================
// Record Stores (one per record type)
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterStore: Send + Sync {
    /// `Ok(None)` when no document exists for the id.
    async fn load(&self, id: CharacterId) -> Result<Option<CharacterRecord>, StoreError>;
    async fn save(&self, record: &CharacterRecord) -> Result<(), StoreError>;
    /// Returns whether a document was removed.
    async fn delete(&self, id: CharacterId) -> Result<bool, StoreError>;
    async fn list(&self) -> Result<Listing<CharacterRecord>, StoreError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MonsterStore: Send + Sync {
    async fn load(&self, id: MonsterId) -> Result<Option<MonsterRecord>, StoreError>;
    async fn save(&self, record: &MonsterRecord) -> Result<(), StoreError>;
    async fn delete(&self, id: MonsterId) -> Result<bool, StoreError>;
    async fn list(&self) -> Result<Listing<MonsterRecord>, StoreError>;
}
