//! Local user profiles.
//!
//! There is no authentication; a user is a display name and a role that
//! decides whether they may run adventures.

use std::sync::Arc;

use sheetkeeper_domain::{DomainError, User, UserId, UserRole};

use crate::infrastructure::ports::{RepoError, UserRepo};

const MAX_DISPLAY_NAME_LENGTH: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("User not found: {0}")]
    NotFound(UserId),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

pub struct UserUseCases {
    users: Arc<dyn UserRepo>,
}

impl UserUseCases {
    pub fn new(users: Arc<dyn UserRepo>) -> Self {
        Self { users }
    }

    pub async fn create(&self, display_name: &str, role: UserRole) -> Result<User, UserError> {
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(DomainError::validation("Display name cannot be empty").into());
        }
        if display_name.chars().count() > MAX_DISPLAY_NAME_LENGTH {
            return Err(DomainError::validation(format!(
                "Display name cannot exceed {} characters",
                MAX_DISPLAY_NAME_LENGTH
            ))
            .into());
        }

        let user = User::new(display_name, role);
        self.users.save(&user).await?;

        tracing::info!(user_id = %user.id, role = %user.role, "Created user");
        Ok(user)
    }

    pub async fn get(&self, id: UserId) -> Result<User, UserError> {
        self.users.get(id).await?.ok_or(UserError::NotFound(id))
    }

    pub async fn list(&self) -> Result<Vec<User>, UserError> {
        Ok(self.users.list().await?)
    }
}
