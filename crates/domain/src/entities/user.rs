use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::UserId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    #[default]
    Player,
    GameMaster,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Player => "player",
            UserRole::GameMaster => "game_master",
        }
    }

    pub fn can_run_adventures(&self) -> bool {
        matches!(self, UserRole::GameMaster)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "player" => Ok(UserRole::Player),
            "game_master" | "gm" => Ok(UserRole::GameMaster),
            other => Err(DomainError::parse(format!("Unknown user role: {}", other))),
        }
    }
}

/// A local user profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub display_name: String,
    pub role: UserRole,
}

impl User {
    pub fn new(display_name: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: UserId::new(),
            display_name: display_name.into(),
            role,
        }
    }
}
