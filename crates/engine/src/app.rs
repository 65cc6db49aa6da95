//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    documents::DocumentRepositories,
    ports::{AdventureRepo, CharacterRepo, ClockPort, KeyValueStore, RandomPort, UserRepo},
};
use crate::use_cases;

/// Main application state.
///
/// Holds all repositories and use cases.
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
}

/// Container for all repositories.
pub struct Repositories {
    pub character: Arc<dyn CharacterRepo>,
    pub adventure: Arc<dyn AdventureRepo>,
    pub user: Arc<dyn UserRepo>,
}

/// Container for all use cases.
pub struct UseCases {
    pub users: use_cases::UserUseCases,
    pub character: use_cases::CharacterUseCases,
    pub sheet: use_cases::SheetUseCases,
    pub layout: use_cases::LayoutUseCases,
    pub adventure: use_cases::AdventureUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up over one document store.
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        let repos = DocumentRepositories::new(store);
        let character_repo: Arc<dyn CharacterRepo> = repos.character;
        let adventure_repo: Arc<dyn AdventureRepo> = repos.adventure;
        let user_repo: Arc<dyn UserRepo> = repos.user;

        let use_cases = UseCases {
            users: use_cases::UserUseCases::new(user_repo.clone()),
            character: use_cases::CharacterUseCases::new(
                character_repo.clone(),
                user_repo.clone(),
                clock.clone(),
            ),
            sheet: use_cases::SheetUseCases::new(character_repo.clone(), clock.clone()),
            layout: use_cases::LayoutUseCases::new(character_repo.clone(), clock.clone()),
            adventure: use_cases::AdventureUseCases::new(
                adventure_repo.clone(),
                user_repo.clone(),
                character_repo.clone(),
                clock,
                random,
            ),
        };

        Self {
            repositories: Repositories {
                character: character_repo,
                adventure: adventure_repo,
                user: user_repo,
            },
            use_cases,
        }
    }
}
