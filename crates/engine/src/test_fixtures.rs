//! Shared fixtures for engine tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use sheetkeeper_domain::{
    starter_character, CharacterName, GameSystemKind, PlayerCharacter, User, UserRole,
};

use crate::infrastructure::clock::{FixedClock, FixedRandom};
use crate::infrastructure::documents::DocumentRepositories;
use crate::infrastructure::memory::MemoryLocalStore;
use crate::infrastructure::ports::{
    AdventureRepo, CharacterRepo, ClockPort, RandomPort, UserRepo,
};

pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 15, 10, 30, 0)
        .single()
        .expect("valid time")
}

pub fn fixed_clock() -> Arc<dyn ClockPort> {
    Arc::new(FixedClock(fixed_now()))
}

pub fn fixed_random(value: i32) -> Arc<dyn RandomPort> {
    Arc::new(FixedRandom(value))
}

/// Document repositories over a fresh in-memory store.
pub struct MemoryRepos {
    pub characters: Arc<dyn CharacterRepo>,
    pub adventures: Arc<dyn AdventureRepo>,
    pub users: Arc<dyn UserRepo>,
}

pub fn memory_repos() -> MemoryRepos {
    let repos = DocumentRepositories::new(Arc::new(MemoryLocalStore::new()));
    MemoryRepos {
        characters: repos.character,
        adventures: repos.adventure,
        users: repos.user,
    }
}

pub async fn saved_user(repos: &MemoryRepos, role: UserRole) -> User {
    let user = User::new("Test User", role);
    repos.users.save(&user).await.expect("save user");
    user
}

pub async fn saved_character(
    repos: &MemoryRepos,
    user: &User,
    game_system: GameSystemKind,
) -> PlayerCharacter {
    let character = starter_character(
        user.id,
        CharacterName::new("Test Hero").expect("valid"),
        game_system,
        fixed_now(),
    )
    .expect("template");
    repos
        .characters
        .save(&character)
        .await
        .expect("save character");
    character
}
