//! Adventure use cases for game masters: the campaign journal and the
//! combat initiative tracker.

mod error;

pub use error::AdventureError;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use serde::Deserialize;
use sheetkeeper_domain::{
    Adventure, AdventureId, AdventureName, CharacterId, Combatant, CombatantId, DataItemType,
    DomainError, GameSystemKind, InitiativeTracker, JournalEntry, JournalEntryId, JournalTitle,
    UserId,
};

use crate::infrastructure::ports::{AdventureRepo, CharacterRepo, ClockPort, RandomPort, UserRepo};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAdventure {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub game_system: GameSystemKind,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct JournalUpdate {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
}

/// A combatant joining the initiative order.
///
/// Without an explicit `initiative` a d20 is rolled and `modifier` added.
/// Linking a character copies its hit points and, when no name is given,
/// its name.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCombatant {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub initiative: Option<i32>,
    #[serde(default)]
    pub modifier: i32,
    #[serde(default)]
    pub character_id: Option<CharacterId>,
}

pub struct AdventureUseCases {
    adventures: Arc<dyn AdventureRepo>,
    users: Arc<dyn UserRepo>,
    characters: Arc<dyn CharacterRepo>,
    clock: Arc<dyn ClockPort>,
    random: Arc<dyn RandomPort>,
}

impl AdventureUseCases {
    pub fn new(
        adventures: Arc<dyn AdventureRepo>,
        users: Arc<dyn UserRepo>,
        characters: Arc<dyn CharacterRepo>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
    ) -> Self {
        Self {
            adventures,
            users,
            characters,
            clock,
            random,
        }
    }

    pub async fn create(
        &self,
        owner_id: UserId,
        request: NewAdventure,
    ) -> Result<Adventure, AdventureError> {
        let owner = self
            .users
            .get(owner_id)
            .await?
            .ok_or(AdventureError::UserNotFound(owner_id))?;
        if !owner.role.can_run_adventures() {
            tracing::warn!(user_id = %owner_id, "Player tried to create an adventure");
            return Err(AdventureError::NotGameMaster(owner_id));
        }

        let name = AdventureName::new(request.name)?;
        let adventure = Adventure::new(&owner, name, request.game_system, self.clock.now())?
            .with_description(request.description);
        self.adventures.save(&adventure).await?;

        tracing::info!(adventure_id = %adventure.id(), owner_id = %owner_id, "Created adventure");
        Ok(adventure)
    }

    pub async fn get(&self, id: AdventureId) -> Result<Adventure, AdventureError> {
        self.adventures
            .get(id)
            .await?
            .ok_or(AdventureError::AdventureNotFound(id))
    }

    pub async fn list_for_owner(&self, owner_id: UserId) -> Result<Vec<Adventure>, AdventureError> {
        if self.users.get(owner_id).await?.is_none() {
            return Err(AdventureError::UserNotFound(owner_id));
        }
        Ok(self.adventures.list_for_owner(owner_id).await?)
    }

    pub async fn delete(&self, id: AdventureId) -> Result<(), AdventureError> {
        if !self.adventures.delete(id).await? {
            return Err(AdventureError::AdventureNotFound(id));
        }
        tracing::info!(adventure_id = %id, "Deleted adventure");
        Ok(())
    }

    // =========================================================================
    // Journal
    // =========================================================================

    pub async fn add_journal_entry(
        &self,
        id: AdventureId,
        title: &str,
        body: String,
    ) -> Result<JournalEntry, AdventureError> {
        let mut adventure = self.get(id).await?;
        let entry_id =
            adventure.add_journal_entry(JournalTitle::new(title)?, body, self.clock.now());
        self.adventures.save(&adventure).await?;

        tracing::debug!(adventure_id = %id, entry_id = %entry_id, "Added journal entry");
        journal_entry(&adventure, entry_id)
    }

    pub async fn update_journal_entry(
        &self,
        id: AdventureId,
        entry_id: JournalEntryId,
        update: JournalUpdate,
    ) -> Result<JournalEntry, AdventureError> {
        let mut adventure = self.get(id).await?;
        let title = update.title.map(JournalTitle::new).transpose()?;
        let entry = adventure
            .update_journal_entry(entry_id, title, update.body, self.clock.now())?
            .clone();
        self.adventures.save(&adventure).await?;
        Ok(entry)
    }

    pub async fn remove_journal_entry(
        &self,
        id: AdventureId,
        entry_id: JournalEntryId,
    ) -> Result<(), AdventureError> {
        let mut adventure = self.get(id).await?;
        adventure.remove_journal_entry(entry_id, self.clock.now())?;
        self.adventures.save(&adventure).await?;
        Ok(())
    }

    // =========================================================================
    // Initiative
    // =========================================================================

    pub async fn add_combatant(
        &self,
        id: AdventureId,
        request: NewCombatant,
    ) -> Result<Combatant, AdventureError> {
        let mut adventure = self.get(id).await?;

        let character = match request.character_id {
            Some(character_id) => Some(
                self.characters
                    .get(character_id)
                    .await?
                    .ok_or(AdventureError::CharacterNotFound(character_id))?,
            ),
            None => None,
        };
        let name = request
            .name
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .or_else(|| character.as_ref().map(|c| c.name().as_str().to_string()))
            .ok_or_else(|| DomainError::validation("Combatant name cannot be empty"))?;

        let mut combatant = match request.initiative {
            Some(initiative) => Combatant::new(name, initiative),
            None => Combatant::rolled(name, request.modifier, || self.random.roll_d20()),
        };
        if let Some(character) = &character {
            combatant = combatant.with_character(character.id());
            if let Some(hp) = character
                .first_of_type(DataItemType::Hp)
                .and_then(|item| item.hit_points())
            {
                combatant = combatant.with_hit_points(hp);
            }
        }

        let added = combatant.clone();
        adventure.add_combatant(combatant, self.clock.now());
        self.adventures.save(&adventure).await?;

        tracing::info!(
            adventure_id = %id,
            combatant_id = %added.id,
            initiative = added.initiative,
            "Combatant joined initiative"
        );
        Ok(added)
    }

    pub async fn remove_combatant(
        &self,
        id: AdventureId,
        combatant_id: CombatantId,
    ) -> Result<InitiativeTracker, AdventureError> {
        self.update_initiative(id, |adventure, now| {
            adventure.remove_combatant(combatant_id, now)?;
            Ok(())
        })
        .await
    }

    pub async fn next_turn(&self, id: AdventureId) -> Result<InitiativeTracker, AdventureError> {
        self.update_initiative(id, |adventure, now| {
            adventure.next_turn(now);
            Ok(())
        })
        .await
    }

    pub async fn previous_turn(
        &self,
        id: AdventureId,
    ) -> Result<InitiativeTracker, AdventureError> {
        self.update_initiative(id, |adventure, now| {
            adventure.previous_turn(now);
            Ok(())
        })
        .await
    }

    /// Back to round 1 with the first combatant active.
    pub async fn reset_initiative(
        &self,
        id: AdventureId,
    ) -> Result<InitiativeTracker, AdventureError> {
        self.update_initiative(id, |adventure, now| {
            adventure.reset_initiative(now);
            Ok(())
        })
        .await
    }

    /// Clear every combatant.
    pub async fn end_combat(&self, id: AdventureId) -> Result<InitiativeTracker, AdventureError> {
        let tracker = self
            .update_initiative(id, |adventure, now| {
                adventure.end_combat(now);
                Ok(())
            })
            .await?;
        tracing::info!(adventure_id = %id, "Combat ended");
        Ok(tracker)
    }

    async fn update_initiative(
        &self,
        id: AdventureId,
        change: impl FnOnce(&mut Adventure, DateTime<Utc>) -> Result<(), DomainError>,
    ) -> Result<InitiativeTracker, AdventureError> {
        let mut adventure = self.get(id).await?;
        change(&mut adventure, self.clock.now())?;
        self.adventures.save(&adventure).await?;
        Ok(adventure.initiative().clone())
    }
}

fn journal_entry(
    adventure: &Adventure,
    entry_id: JournalEntryId,
) -> Result<JournalEntry, AdventureError> {
    adventure
        .journal()
        .iter()
        .find(|entry| entry.id == entry_id)
        .cloned()
        .ok_or_else(|| DomainError::not_found("JournalEntry", entry_id.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{
        MockAdventureRepo, MockCharacterRepo, MockRandomPort, MockUserRepo,
    };
    use crate::test_fixtures::{
        fixed_clock, fixed_random, memory_repos, saved_character, saved_user, MemoryRepos,
    };
    use sheetkeeper_domain::{User, UserRole};

    fn use_cases(repos: &MemoryRepos, roll: i32) -> AdventureUseCases {
        AdventureUseCases::new(
            repos.adventures.clone(),
            repos.users.clone(),
            repos.characters.clone(),
            fixed_clock(),
            fixed_random(roll),
        )
    }

    fn new_adventure(name: &str) -> NewAdventure {
        NewAdventure {
            name: name.to_string(),
            description: String::new(),
            game_system: GameSystemKind::Dnd5e,
        }
    }

    async fn gm_adventure(repos: &MemoryRepos, use_cases: &AdventureUseCases) -> Adventure {
        let gm = saved_user(repos, UserRole::GameMaster).await;
        use_cases
            .create(gm.id, new_adventure("Lost Mine"))
            .await
            .expect("created")
    }

    #[tokio::test]
    async fn players_cannot_create_adventures() {
        let player = User::new("Pat", UserRole::Player);
        let player_id = player.id;
        let mut users = MockUserRepo::new();
        users
            .expect_get()
            .returning(move |_| Ok(Some(player.clone())));
        let mut adventures = MockAdventureRepo::new();
        adventures.expect_save().never();

        let use_cases = AdventureUseCases::new(
            Arc::new(adventures),
            Arc::new(users),
            Arc::new(MockCharacterRepo::new()),
            fixed_clock(),
            Arc::new(MockRandomPort::new()),
        );
        let result = use_cases.create(player_id, new_adventure("Nope")).await;
        assert!(matches!(result, Err(AdventureError::NotGameMaster(id)) if id == player_id));
    }

    #[tokio::test]
    async fn game_master_lists_own_adventures() {
        let repos = memory_repos();
        let use_cases = use_cases(&repos, 10);
        let adventure = gm_adventure(&repos, &use_cases).await;

        let listed = use_cases
            .list_for_owner(adventure.owner_id())
            .await
            .expect("listed");
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id(), adventure.id());

        use_cases.delete(adventure.id()).await.expect("deleted");
        assert!(matches!(
            use_cases.get(adventure.id()).await,
            Err(AdventureError::AdventureNotFound(_))
        ));
    }

    #[tokio::test]
    async fn blank_journal_title_is_rejected() {
        let repos = memory_repos();
        let use_cases = use_cases(&repos, 10);
        let adventure = gm_adventure(&repos, &use_cases).await;

        let err = use_cases
            .add_journal_entry(adventure.id(), "  ", String::new())
            .await
            .expect_err("blank title");
        assert!(matches!(err, AdventureError::Domain(DomainError::Validation(_))));
        assert!(err.to_string().contains("Journal title"));
    }

    #[tokio::test]
    async fn journal_edits_persist() {
        let repos = memory_repos();
        let use_cases = use_cases(&repos, 10);
        let adventure = gm_adventure(&repos, &use_cases).await;

        let entry = use_cases
            .add_journal_entry(adventure.id(), "Session 1", "The party met.".to_string())
            .await
            .expect("added");
        let edited = use_cases
            .update_journal_entry(
                adventure.id(),
                entry.id,
                JournalUpdate {
                    title: None,
                    body: Some("The party met in a tavern.".to_string()),
                },
            )
            .await
            .expect("edited");
        assert_eq!(edited.title.as_str(), "Session 1");
        assert_eq!(edited.body, "The party met in a tavern.");

        use_cases
            .remove_journal_entry(adventure.id(), entry.id)
            .await
            .expect("removed");
        let stored = use_cases.get(adventure.id()).await.expect("get");
        assert!(stored.journal().is_empty());
    }

    #[tokio::test]
    async fn rolled_initiative_adds_modifier() {
        let repos = memory_repos();
        let use_cases = use_cases(&repos, 14);
        let adventure = gm_adventure(&repos, &use_cases).await;

        let goblin = use_cases
            .add_combatant(
                adventure.id(),
                NewCombatant {
                    name: Some("Goblin".to_string()),
                    modifier: 2,
                    ..NewCombatant::default()
                },
            )
            .await
            .expect("added");
        assert_eq!(goblin.initiative, 16);
    }

    #[tokio::test]
    async fn explicit_initiative_skips_the_roll() {
        let repos = memory_repos();
        let gm = saved_user(&repos, UserRole::GameMaster).await;
        let mut random = MockRandomPort::new();
        random.expect_roll_d20().never();
        let use_cases = AdventureUseCases::new(
            repos.adventures.clone(),
            repos.users.clone(),
            repos.characters.clone(),
            fixed_clock(),
            Arc::new(random),
        );
        let adventure = use_cases
            .create(gm.id, new_adventure("Keep"))
            .await
            .expect("created");

        let ogre = use_cases
            .add_combatant(
                adventure.id(),
                NewCombatant {
                    name: Some("Ogre".to_string()),
                    initiative: Some(7),
                    ..NewCombatant::default()
                },
            )
            .await
            .expect("added");
        assert_eq!(ogre.initiative, 7);
    }

    #[tokio::test]
    async fn linked_character_brings_name_and_hit_points() {
        let repos = memory_repos();
        let use_cases = use_cases(&repos, 10);
        let adventure = gm_adventure(&repos, &use_cases).await;
        let player = saved_user(&repos, UserRole::Player).await;
        let hero = saved_character(&repos, &player, GameSystemKind::Dnd5e).await;

        let combatant = use_cases
            .add_combatant(
                adventure.id(),
                NewCombatant {
                    character_id: Some(hero.id()),
                    initiative: Some(12),
                    ..NewCombatant::default()
                },
            )
            .await
            .expect("added");

        assert_eq!(combatant.name, hero.name().as_str());
        assert_eq!(combatant.character_id, Some(hero.id()));
        assert!(combatant.hit_points.is_some());
    }

    #[tokio::test]
    async fn unknown_linked_character_is_not_found() {
        let repos = memory_repos();
        let use_cases = use_cases(&repos, 10);
        let adventure = gm_adventure(&repos, &use_cases).await;

        let result = use_cases
            .add_combatant(
                adventure.id(),
                NewCombatant {
                    character_id: Some(CharacterId::new()),
                    ..NewCombatant::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AdventureError::CharacterNotFound(_))));
    }

    #[tokio::test]
    async fn turns_wrap_into_the_next_round() {
        let repos = memory_repos();
        let use_cases = use_cases(&repos, 10);
        let adventure = gm_adventure(&repos, &use_cases).await;
        for (name, initiative) in [("Fighter", 18), ("Wolf", 12)] {
            use_cases
                .add_combatant(
                    adventure.id(),
                    NewCombatant {
                        name: Some(name.to_string()),
                        initiative: Some(initiative),
                        ..NewCombatant::default()
                    },
                )
                .await
                .expect("added");
        }

        let tracker = use_cases.next_turn(adventure.id()).await.expect("next");
        assert_eq!(tracker.active_combatant().map(|c| c.name.as_str()), Some("Wolf"));
        assert_eq!(tracker.round(), 1);

        let tracker = use_cases.next_turn(adventure.id()).await.expect("wrap");
        assert_eq!(tracker.active_combatant().map(|c| c.name.as_str()), Some("Fighter"));
        assert_eq!(tracker.round(), 2);

        let tracker = use_cases.previous_turn(adventure.id()).await.expect("back");
        assert_eq!(tracker.active_combatant().map(|c| c.name.as_str()), Some("Wolf"));
        assert_eq!(tracker.round(), 1);

        let tracker = use_cases.end_combat(adventure.id()).await.expect("ended");
        assert!(tracker.combatants().is_empty());
    }
}
