//! JSON document repositories on top of a key/value store.
//!
//! Every aggregate is one JSON document under `<kind>:<uuid>`. Listing scans
//! the kind prefix and filters in memory, which matches how the sheet data
//! was kept in browser local storage.

use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sheetkeeper_domain::{Adventure, AdventureId, CharacterId, PlayerCharacter, User, UserId};

use crate::infrastructure::ports::{
    AdventureRepo, CharacterRepo, KeyValueStore, RepoError, UserRepo,
};

const CHARACTER_PREFIX: &str = "character:";
const ADVENTURE_PREFIX: &str = "adventure:";
const USER_PREFIX: &str = "user:";

fn key(prefix: &str, id: impl std::fmt::Display) -> String {
    format!("{}{}", prefix, id)
}

fn encode<T: Serialize>(document: &T) -> Result<String, RepoError> {
    serde_json::to_string(document).map_err(RepoError::serialization)
}

fn decode<T: DeserializeOwned>(raw: &str) -> Result<T, RepoError> {
    serde_json::from_str(raw).map_err(RepoError::serialization)
}

async fn load_all<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    prefix: &str,
) -> Result<Vec<T>, RepoError> {
    let mut documents = Vec::new();
    for (key, raw) in store.scan_prefix(prefix).await? {
        match decode(&raw) {
            Ok(document) => documents.push(document),
            Err(e) => {
                // Keep listing past a corrupt entry
                tracing::warn!(key = %key, error = %e, "Skipping unreadable document");
            }
        }
    }
    Ok(documents)
}

/// All document repositories sharing one store.
pub struct DocumentRepositories {
    pub character: Arc<DocumentCharacterRepo>,
    pub adventure: Arc<DocumentAdventureRepo>,
    pub user: Arc<DocumentUserRepo>,
}

impl DocumentRepositories {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            character: Arc::new(DocumentCharacterRepo {
                store: store.clone(),
            }),
            adventure: Arc::new(DocumentAdventureRepo {
                store: store.clone(),
            }),
            user: Arc::new(DocumentUserRepo { store }),
        }
    }
}

// =============================================================================
// Characters
// =============================================================================

pub struct DocumentCharacterRepo {
    store: Arc<dyn KeyValueStore>,
}

#[async_trait]
impl CharacterRepo for DocumentCharacterRepo {
    async fn get(&self, id: CharacterId) -> Result<Option<PlayerCharacter>, RepoError> {
        let Some(raw) = self.store.get(&key(CHARACTER_PREFIX, id)).await? else {
            return Ok(None);
        };
        let character: PlayerCharacter = decode(&raw)?;
        character.validate().map_err(RepoError::serialization)?;
        Ok(Some(character))
    }

    async fn save(&self, character: &PlayerCharacter) -> Result<(), RepoError> {
        self.store
            .set(&key(CHARACTER_PREFIX, character.id()), &encode(character)?)
            .await
    }

    async fn delete(&self, id: CharacterId) -> Result<bool, RepoError> {
        self.store.remove(&key(CHARACTER_PREFIX, id)).await
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<PlayerCharacter>, RepoError> {
        let mut characters: Vec<PlayerCharacter> =
            load_all(self.store.as_ref(), CHARACTER_PREFIX).await?;
        characters.retain(|character| {
            if character.user_id() != user_id {
                return false;
            }
            match character.validate() {
                Ok(()) => true,
                Err(e) => {
                    tracing::warn!(
                        character_id = %character.id(),
                        error = %e,
                        "Skipping invalid character document"
                    );
                    false
                }
            }
        });
        characters.sort_by(|a, b| a.name().as_str().cmp(b.name().as_str()));
        Ok(characters)
    }
}

// =============================================================================
// Adventures
// =============================================================================

pub struct DocumentAdventureRepo {
    store: Arc<dyn KeyValueStore>,
}

#[async_trait]
impl AdventureRepo for DocumentAdventureRepo {
    async fn get(&self, id: AdventureId) -> Result<Option<Adventure>, RepoError> {
        match self.store.get(&key(ADVENTURE_PREFIX, id)).await? {
            Some(raw) => decode(&raw).map(Some),
            None => Ok(None),
        }
    }

    async fn save(&self, adventure: &Adventure) -> Result<(), RepoError> {
        self.store
            .set(&key(ADVENTURE_PREFIX, adventure.id()), &encode(adventure)?)
            .await
    }

    async fn delete(&self, id: AdventureId) -> Result<bool, RepoError> {
        self.store.remove(&key(ADVENTURE_PREFIX, id)).await
    }

    async fn list_for_owner(&self, owner_id: UserId) -> Result<Vec<Adventure>, RepoError> {
        let mut adventures: Vec<Adventure> =
            load_all(self.store.as_ref(), ADVENTURE_PREFIX).await?;
        adventures.retain(|adventure| adventure.is_owned_by(owner_id));
        adventures.sort_by(|a, b| b.updated_at().cmp(&a.updated_at()));
        Ok(adventures)
    }
}

// =============================================================================
// Users
// =============================================================================

pub struct DocumentUserRepo {
    store: Arc<dyn KeyValueStore>,
}

#[async_trait]
impl UserRepo for DocumentUserRepo {
    async fn get(&self, id: UserId) -> Result<Option<User>, RepoError> {
        match self.store.get(&key(USER_PREFIX, id)).await? {
            Some(raw) => decode(&raw).map(Some),
            None => Ok(None),
        }
    }

    async fn save(&self, user: &User) -> Result<(), RepoError> {
        self.store.set(&key(USER_PREFIX, user.id), &encode(user)?).await
    }

    async fn list(&self) -> Result<Vec<User>, RepoError> {
        let mut users: Vec<User> = load_all(self.store.as_ref(), USER_PREFIX).await?;
        users.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Ok(users)
    }
}
