//! Character use cases.
//!
//! Creating characters from a game system's starter sheet, renaming,
//! deleting, and moving them in and out of the installation as export
//! documents.

mod error;
mod transfer;

pub use error::CharacterError;
pub use transfer::{CharacterExport, EXPORT_FORMAT_VERSION};

use std::sync::Arc;

use sheetkeeper_domain::{
    starter_character, CharacterId, CharacterName, GameSystemKind, PlayerCharacter, UserId,
};

use crate::infrastructure::ports::{CharacterRepo, ClockPort, UserRepo};

/// Container for character use cases.
pub struct CharacterUseCases {
    characters: Arc<dyn CharacterRepo>,
    users: Arc<dyn UserRepo>,
    clock: Arc<dyn ClockPort>,
}

impl CharacterUseCases {
    pub fn new(
        characters: Arc<dyn CharacterRepo>,
        users: Arc<dyn UserRepo>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            characters,
            users,
            clock,
        }
    }

    /// Create a character with the starter sheet of its game system.
    pub async fn create(
        &self,
        user_id: UserId,
        name: &str,
        game_system: GameSystemKind,
    ) -> Result<PlayerCharacter, CharacterError> {
        self.require_user(user_id).await?;
        let name = CharacterName::new(name)?;
        let character = starter_character(user_id, name, game_system, self.clock.now())?;
        self.characters.save(&character).await?;

        tracing::info!(
            character_id = %character.id(),
            user_id = %user_id,
            game_system = %game_system,
            "Created character"
        );
        Ok(character)
    }

    pub async fn get(&self, id: CharacterId) -> Result<PlayerCharacter, CharacterError> {
        self.characters
            .get(id)
            .await?
            .ok_or(CharacterError::CharacterNotFound(id))
    }

    pub async fn list_for_user(
        &self,
        user_id: UserId,
    ) -> Result<Vec<PlayerCharacter>, CharacterError> {
        self.require_user(user_id).await?;
        Ok(self.characters.list_for_user(user_id).await?)
    }

    pub async fn rename(
        &self,
        id: CharacterId,
        name: &str,
    ) -> Result<PlayerCharacter, CharacterError> {
        let name = CharacterName::new(name)?;
        let mut character = self.get(id).await?;
        character.rename(name, self.clock.now());
        self.characters.save(&character).await?;

        tracing::debug!(character_id = %id, "Renamed character");
        Ok(character)
    }

    pub async fn delete(&self, id: CharacterId) -> Result<(), CharacterError> {
        if !self.characters.delete(id).await? {
            return Err(CharacterError::CharacterNotFound(id));
        }
        tracing::info!(character_id = %id, "Deleted character");
        Ok(())
    }

    pub async fn export(&self, id: CharacterId) -> Result<CharacterExport, CharacterError> {
        let character = self.get(id).await?;
        tracing::info!(character_id = %id, "Exported character");
        Ok(CharacterExport::new(character, self.clock.now()))
    }

    /// Import an export document as a new character owned by `user_id`.
    ///
    /// The character, its tabs, and its items all get fresh ids, so importing
    /// the same document twice yields two independent characters.
    pub async fn import(
        &self,
        user_id: UserId,
        document: serde_json::Value,
    ) -> Result<PlayerCharacter, CharacterError> {
        self.require_user(user_id).await?;
        let export = CharacterExport::parse(document)?;
        let source_id = export.character.id();

        let mut character = export.character;
        character.reassign_ids(user_id, self.clock.now());
        self.characters.save(&character).await?;

        tracing::info!(
            character_id = %character.id(),
            source_id = %source_id,
            user_id = %user_id,
            "Imported character"
        );
        Ok(character)
    }

    async fn require_user(&self, user_id: UserId) -> Result<(), CharacterError> {
        self.users
            .get(user_id)
            .await?
            .map(|_| ())
            .ok_or(CharacterError::UserNotFound(user_id))
    }
}
