//! Adventure operation errors.

use sheetkeeper_domain::{AdventureId, CharacterId, DomainError, UserId};

use crate::infrastructure::ports::RepoError;

#[derive(Debug, thiserror::Error)]
pub enum AdventureError {
    #[error("Adventure not found: {0}")]
    AdventureNotFound(AdventureId),

    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Character not found: {0}")]
    CharacterNotFound(CharacterId),

    #[error("User {0} is not a game master")]
    NotGameMaster(UserId),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
