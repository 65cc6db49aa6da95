//! Sheet and layout operation errors.

use sheetkeeper_domain::{CharacterId, DomainError, TabId};

use crate::infrastructure::ports::RepoError;

#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("Character not found: {0}")]
    CharacterNotFound(CharacterId),

    /// The tab is the last one, still holds items, or does not exist.
    #[error("Tab cannot be deleted: {0}")]
    TabNotDeletable(TabId),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
