//! Repository port traits for document storage.

use async_trait::async_trait;
use sheetkeeper_domain::{Adventure, AdventureId, CharacterId, PlayerCharacter, User, UserId};

use super::error::RepoError;

// =============================================================================
// Raw Storage
// =============================================================================

/// String key/value storage with browser local-storage semantics.
///
/// Writes replace the whole value; last write wins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, RepoError>;
    async fn set(&self, key: &str, value: &str) -> Result<(), RepoError>;
    /// Returns whether a value was removed.
    async fn remove(&self, key: &str) -> Result<bool, RepoError>;
    /// All entries whose key starts with `prefix`, sorted by key.
    async fn scan_prefix(&self, prefix: &str) -> Result<Vec<(String, String)>, RepoError>;
}

// =============================================================================
// Document Ports (one per aggregate)
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRepo: Send + Sync {
    async fn get(&self, id: CharacterId) -> Result<Option<PlayerCharacter>, RepoError>;
    async fn save(&self, character: &PlayerCharacter) -> Result<(), RepoError>;
    async fn delete(&self, id: CharacterId) -> Result<bool, RepoError>;
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<PlayerCharacter>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdventureRepo: Send + Sync {
    async fn get(&self, id: AdventureId) -> Result<Option<Adventure>, RepoError>;
    async fn save(&self, adventure: &Adventure) -> Result<(), RepoError>;
    async fn delete(&self, id: AdventureId) -> Result<bool, RepoError>;
    async fn list_for_owner(&self, owner_id: UserId) -> Result<Vec<Adventure>, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn get(&self, id: UserId) -> Result<Option<User>, RepoError>;
    async fn save(&self, user: &User) -> Result<(), RepoError>;
    async fn list(&self) -> Result<Vec<User>, RepoError>;
}
