//! Sheet use cases: the derived view and edits to individual data items.
//!
//! Every operation loads the character document, mutates it through the
//! aggregate, and writes it back in one save.

mod error;

pub use error::SheetError;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use sheetkeeper_domain::{
    CharacterId, DataItem, DataItemId, DataItemType, DomainError, HitPoints, ItemName, ItemValue,
    LevelChange, Metadata, Placement, PlayerCharacter, SheetView, SkillEntry, TabId,
};

use crate::infrastructure::ports::{CharacterRepo, ClockPort};

/// Request to add a data item to a character.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewItem {
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: DataItemType,
    #[serde(default)]
    pub value: Option<ItemValue>,
    #[serde(default)]
    pub metadata: Metadata,
    /// Defaults to the character's first tab.
    #[serde(default)]
    pub tab_id: Option<TabId>,
    #[serde(default)]
    pub column: u8,
}

/// Partial update of a data item. Metadata keys are merged, not replaced.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<ItemValue>,
    #[serde(default)]
    pub metadata: Option<Metadata>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpdated {
    pub item: DataItem,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level_change: Option<LevelChange>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelUpdated {
    pub change: LevelChange,
    pub sheet: SheetView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum HpChange {
    Damage { amount: i32 },
    Heal { amount: i32 },
    Temp { amount: i32 },
}

pub struct SheetUseCases {
    characters: Arc<dyn CharacterRepo>,
    clock: Arc<dyn ClockPort>,
}

impl SheetUseCases {
    pub fn new(characters: Arc<dyn CharacterRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { characters, clock }
    }

    pub async fn view(&self, id: CharacterId) -> Result<SheetView, SheetError> {
        let character = self.load(id).await?;
        Ok(SheetView::compute(&character))
    }

    /// Change the level and bring the proficiency bonus along with it.
    pub async fn set_level(&self, id: CharacterId, level: i32) -> Result<LevelUpdated, SheetError> {
        let mut character = self.load(id).await?;
        let change = character.set_level(level, self.clock.now())?;
        self.characters.save(&character).await?;

        tracing::info!(
            character_id = %id,
            previous_level = change.previous_level,
            level = change.level,
            proficiency_bonus = ?change.proficiency_bonus,
            "Level changed"
        );
        Ok(LevelUpdated {
            change,
            sheet: SheetView::compute(&character),
        })
    }

    pub async fn add_item(
        &self,
        id: CharacterId,
        request: NewItem,
    ) -> Result<DataItem, SheetError> {
        let mut character = self.load(id).await?;
        let name = ItemName::new(request.name)?;
        let tab_id = match request.tab_id {
            Some(tab_id) => tab_id,
            None => first_tab(&character)?,
        };

        let mut item = DataItem::new(
            name,
            request.item_type,
            Placement::tab(tab_id, request.column, 0),
        );
        if let Some(value) = request.value {
            item.value = value;
        }
        item.metadata = request.metadata;

        let item_id = character.add_item(item, self.clock.now())?;
        self.characters.save(&character).await?;

        tracing::debug!(character_id = %id, item_id = %item_id, "Added item");
        stored_item(&character, item_id)
    }

    pub async fn update_item(
        &self,
        id: CharacterId,
        item_id: DataItemId,
        update: ItemUpdate,
    ) -> Result<ItemUpdated, SheetError> {
        let mut character = self.load(id).await?;
        let now = self.clock.now();

        if let Some(name) = update.name {
            character.rename_item(item_id, ItemName::new(name)?, now)?;
        }
        for (key, value) in update.metadata.unwrap_or_default() {
            character.set_item_metadata(item_id, &key, value, now)?;
        }
        let level_change = match update.value {
            Some(value) => character.update_item_value(item_id, value, now)?,
            None => None,
        };
        // Still fails for an unknown item when the update was empty.
        let item = stored_item(&character, item_id)?;
        self.characters.save(&character).await?;

        if let Some(change) = &level_change {
            tracing::info!(
                character_id = %id,
                level = change.level,
                proficiency_bonus = ?change.proficiency_bonus,
                "Level changed through item update"
            );
        }
        Ok(ItemUpdated { item, level_change })
    }

    pub async fn remove_item(
        &self,
        id: CharacterId,
        item_id: DataItemId,
    ) -> Result<DataItem, SheetError> {
        let mut character = self.load(id).await?;
        let removed = character.remove_item(item_id, self.clock.now())?;
        self.characters.save(&character).await?;

        tracing::debug!(character_id = %id, item_id = %item_id, "Removed item");
        Ok(removed)
    }

    pub async fn adjust_hp(
        &self,
        id: CharacterId,
        item_id: DataItemId,
        change: HpChange,
    ) -> Result<HitPoints, SheetError> {
        let mut character = self.load(id).await?;
        let (hit_points, _) =
            character.adjust_hit_points(item_id, self.clock.now(), |hp| match change {
                HpChange::Damage { amount } => {
                    hp.take_damage(amount);
                }
                HpChange::Heal { amount } => {
                    hp.heal(amount);
                }
                HpChange::Temp { amount } => hp.add_temp_hp(amount),
            })?;
        self.characters.save(&character).await?;

        tracing::debug!(
            character_id = %id,
            current = hit_points.current,
            temporary = hit_points.temporary,
            "Hit points adjusted"
        );
        Ok(hit_points)
    }

    pub async fn set_skill_training(
        &self,
        id: CharacterId,
        item_id: DataItemId,
        skill: &str,
        proficient: bool,
        expertise: bool,
    ) -> Result<SkillEntry, SheetError> {
        let mut character = self.load(id).await?;
        let entry =
            character.set_skill_training(item_id, skill, proficient, expertise, self.clock.now())?;
        self.characters.save(&character).await?;
        Ok(entry)
    }

    async fn load(&self, id: CharacterId) -> Result<PlayerCharacter, SheetError> {
        self.characters
            .get(id)
            .await?
            .ok_or(SheetError::CharacterNotFound(id))
    }
}

fn first_tab(character: &PlayerCharacter) -> Result<TabId, SheetError> {
    character
        .tabs()
        .first()
        .map(|tab| tab.id)
        .ok_or_else(|| DomainError::constraint("Character has no tabs").into())
}

fn stored_item(character: &PlayerCharacter, item_id: DataItemId) -> Result<DataItem, SheetError> {
    character
        .item(item_id)
        .cloned()
        .ok_or_else(|| DomainError::not_found("DataItem", item_id.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockCharacterRepo;
    use crate::test_fixtures::{fixed_clock, memory_repos, saved_character, saved_user, MemoryRepos};
    use sheetkeeper_domain::{GameSystemKind, UserRole};

    fn use_cases(repos: &MemoryRepos) -> SheetUseCases {
        SheetUseCases::new(repos.characters.clone(), fixed_clock())
    }

    fn item_named(character: &PlayerCharacter, name: &str) -> DataItemId {
        character
            .items()
            .iter()
            .find(|item| item.name.as_str() == name)
            .map(|item| item.id)
            .expect("item present")
    }

    #[tokio::test]
    async fn view_of_missing_character_is_not_found() {
        let mut characters = MockCharacterRepo::new();
        characters.expect_get().returning(|_| Ok(None));
        let use_cases = SheetUseCases::new(Arc::new(characters), fixed_clock());

        assert!(matches!(
            use_cases.view(CharacterId::new()).await,
            Err(SheetError::CharacterNotFound(_))
        ));
    }

    #[tokio::test]
    async fn level_five_raises_the_stored_bonus() {
        let repos = memory_repos();
        let user = saved_user(&repos, UserRole::Player).await;
        let character = saved_character(&repos, &user, GameSystemKind::Dnd5e).await;
        let use_cases = use_cases(&repos);

        use_cases.set_level(character.id(), 4).await.expect("level 4");
        let updated = use_cases.set_level(character.id(), 5).await.expect("level 5");

        assert_eq!(updated.change.previous_level, 4);
        assert_eq!(updated.change.previous_bonus, Some(2));
        assert_eq!(updated.change.proficiency_bonus, Some(3));
        assert_eq!(updated.sheet.proficiency_bonus, 3);
        assert!(updated.sheet.proficiency_in_sync);

        let reloaded = use_cases.view(character.id()).await.expect("view");
        assert_eq!(reloaded.level, 5);
        assert_eq!(reloaded.proficiency_bonus, 3);
    }

    #[tokio::test]
    async fn writing_the_level_item_runs_the_cascade() {
        let repos = memory_repos();
        let user = saved_user(&repos, UserRole::Player).await;
        let character = saved_character(&repos, &user, GameSystemKind::Dnd5e).await;
        let level_item = item_named(&character, "Level");

        let updated = use_cases(&repos)
            .update_item(
                character.id(),
                level_item,
                ItemUpdate {
                    value: Some(ItemValue::Integer(9)),
                    ..ItemUpdate::default()
                },
            )
            .await
            .expect("updated");

        let change = updated.level_change.expect("cascade ran");
        assert_eq!(change.level, 9);
        assert_eq!(change.proficiency_bonus, Some(4));
    }

    #[tokio::test]
    async fn ability_edits_flow_into_the_view() {
        let repos = memory_repos();
        let user = saved_user(&repos, UserRole::Player).await;
        let character = saved_character(&repos, &user, GameSystemKind::Dnd5e).await;
        let abilities = item_named(&character, "Abilities");
        let skills = item_named(&character, "Skills");
        let use_cases = use_cases(&repos);

        let mut scores = character
            .item(abilities)
            .and_then(|item| item.value.as_object().cloned())
            .expect("scores");
        scores.insert("dex".to_string(), ItemValue::Integer(16));
        use_cases
            .update_item(
                character.id(),
                abilities,
                ItemUpdate {
                    value: Some(ItemValue::Object(scores)),
                    ..ItemUpdate::default()
                },
            )
            .await
            .expect("scores updated");
        use_cases
            .set_skill_training(character.id(), skills, "stealth", true, true)
            .await
            .expect("trained");

        let view = use_cases.view(character.id()).await.expect("view");
        assert_eq!(view.ability("dex").map(|line| line.modifier), Some(3));
        // 3 + 2 * 2 for expertise at level 1
        assert_eq!(view.skill("Stealth").map(|line| line.total), Some(7));
    }

    #[tokio::test]
    async fn add_item_defaults_to_first_tab() {
        let repos = memory_repos();
        let user = saved_user(&repos, UserRole::Player).await;
        let character = saved_character(&repos, &user, GameSystemKind::Co2).await;
        let request: NewItem = serde_json::from_value(serde_json::json!({
            "name": "Spell Points",
            "type": "resource-counter",
            "column": 1
        }))
        .expect("request");

        let item = use_cases(&repos)
            .add_item(character.id(), request)
            .await
            .expect("added");

        assert_eq!(item.placement.tab_id(), Some(character.tabs()[0].id));
        let stored = repos
            .characters
            .get(character.id())
            .await
            .expect("get")
            .expect("present");
        assert!(stored.item(item.id).is_some());
    }

    #[tokio::test]
    async fn add_item_to_unknown_tab_fails() {
        let repos = memory_repos();
        let user = saved_user(&repos, UserRole::Player).await;
        let character = saved_character(&repos, &user, GameSystemKind::Dnd5e).await;
        let request = NewItem {
            name: "Lost".to_string(),
            item_type: DataItemType::Text,
            value: None,
            metadata: Metadata::new(),
            tab_id: Some(TabId::new()),
            column: 0,
        };

        let result = use_cases(&repos).add_item(character.id(), request).await;
        assert!(matches!(result, Err(SheetError::Domain(_))));
    }

    #[tokio::test]
    async fn damage_then_heal() {
        let repos = memory_repos();
        let user = saved_user(&repos, UserRole::Player).await;
        let character = saved_character(&repos, &user, GameSystemKind::Dnd5e).await;
        let hp = item_named(&character, "Hit Points");
        let use_cases = use_cases(&repos);

        use_cases
            .adjust_hp(character.id(), hp, HpChange::Temp { amount: 3 })
            .await
            .expect("temp");
        let after_damage = use_cases
            .adjust_hp(character.id(), hp, HpChange::Damage { amount: 5 })
            .await
            .expect("damage");
        assert_eq!(after_damage.temporary, 0);
        assert_eq!(after_damage.current, 8);

        let healed = use_cases
            .adjust_hp(character.id(), hp, HpChange::Heal { amount: 50 })
            .await
            .expect("heal");
        assert_eq!(healed.current, healed.max);
    }

    #[tokio::test]
    async fn hp_change_on_text_item_is_rejected() {
        let repos = memory_repos();
        let user = saved_user(&repos, UserRole::Player).await;
        let character = saved_character(&repos, &user, GameSystemKind::Dnd5e).await;
        let notes = item_named(&character, "Notes");

        let result = use_cases(&repos)
            .adjust_hp(character.id(), notes, HpChange::Damage { amount: 1 })
            .await;
        assert!(matches!(
            result,
            Err(SheetError::Domain(DomainError::Validation(_)))
        ));
    }

    #[test]
    fn hp_change_reads_action_tag() {
        let change: HpChange =
            serde_json::from_str(r#"{"action":"heal","amount":4}"#).expect("parse");
        assert_eq!(change, HpChange::Heal { amount: 4 });
    }
}
