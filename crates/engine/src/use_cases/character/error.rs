//! Character operation errors.

use sheetkeeper_domain::{CharacterId, DomainError, UserId};

use crate::infrastructure::ports::RepoError;

/// Errors that can occur during character operations.
#[derive(Debug, thiserror::Error)]
pub enum CharacterError {
    #[error("Character not found: {0}")]
    CharacterNotFound(CharacterId),

    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Unsupported export format version: {0}")]
    UnsupportedFormat(u32),

    #[error("Invalid character document: {0}")]
    InvalidDocument(String),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
