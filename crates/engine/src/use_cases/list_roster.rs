//! List roster use case.

use std::sync::Arc;

use tavernkeep_domain::{CharacterRecord, MonsterRecord};

use crate::infrastructure::ports::{CharacterStore, LoadFailure, MonsterStore};

use super::error::RosterError;

/// Everything in the store, plus the documents that could not be read.
#[derive(Debug, Default)]
pub struct Roster {
    pub characters: Vec<CharacterRecord>,
    pub monsters: Vec<MonsterRecord>,
    pub failures: Vec<LoadFailure>,
}

pub struct ListRoster {
    characters: Arc<dyn CharacterStore>,
    monsters: Arc<dyn MonsterStore>,
}

impl ListRoster {
    pub fn new(characters: Arc<dyn CharacterStore>, monsters: Arc<dyn MonsterStore>) -> Self {
        Self {
            characters,
            monsters,
        }
    }

    /// Characters sorted by name, then monsters sorted by name.
    pub async fn execute(&self) -> Result<Roster, RosterError> {
        let characters = self.characters.list().await?;
        let monsters = self.monsters.list().await?;

        let mut roster = Roster {
            characters: characters.records,
            monsters: monsters.records,
            failures: characters.failures,
        };
        roster.failures.extend(monsters.failures);
        roster
            .characters
            .sort_by(|a, b| a.name().as_str().cmp(b.name().as_str()));
        roster
            .monsters
            .sort_by(|a, b| a.name().as_str().cmp(b.name().as_str()));
        Ok(roster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{Listing, MockCharacterStore, MockMonsterStore, StoreError};
    use chrono::Utc;
    use std::path::PathBuf;
    use tavernkeep_domain::{AbilityScores, CharacterName, MonsterName};

    fn character(name: &str) -> CharacterRecord {
        CharacterRecord::new(
            CharacterName::new(name).unwrap(),
            AbilityScores::default(),
            10,
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn merges_and_sorts_both_stores() {
        let mut characters = MockCharacterStore::new();
        characters.expect_list().returning(|| {
            Ok(Listing {
                records: vec![character("Зорн"), character("Аня")],
                failures: vec![LoadFailure {
                    path: PathBuf::from("characters/bad.json"),
                    reason: "Invalid JSON".into(),
                }],
            })
        });
        let mut monsters = MockMonsterStore::new();
        monsters.expect_list().returning(|| {
            Ok(Listing {
                records: vec![MonsterRecord::new(
                    MonsterName::new("Goblin").unwrap(),
                    AbilityScores::default(),
                    7,
                )],
                failures: Vec::new(),
            })
        });

        let roster = ListRoster::new(Arc::new(characters), Arc::new(monsters))
            .execute()
            .await
            .unwrap();

        let names: Vec<&str> = roster.characters.iter().map(|c| c.name().as_str()).collect();
        assert_eq!(names, vec!["Аня", "Зорн"]);
        assert_eq!(roster.monsters.len(), 1);
        assert_eq!(roster.failures.len(), 1);
    }

    #[tokio::test]
    async fn store_error_aborts() {
        let mut characters = MockCharacterStore::new();
        characters.expect_list().returning(|| {
            Err(StoreError::io(
                "list records",
                std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            ))
        });
        let monsters = MockMonsterStore::new();

        let result = ListRoster::new(Arc::new(characters), Arc::new(monsters))
            .execute()
            .await;

        assert!(matches!(result, Err(RosterError::Store(_))));
    }
}
