//! Dashboard layout use cases: tabs, column widths, and item placement.

use std::sync::Arc;

use serde::Deserialize;
use sheetkeeper_domain::{
    CharacterId, ColumnWidth, DashboardTab, DataItemId, DomainError, PlayerCharacter, TabId,
    TabName,
};

use crate::infrastructure::ports::{CharacterRepo, ClockPort};
use crate::use_cases::sheet::SheetError;

/// Where a dragged item lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "to", rename_all = "snake_case")]
pub enum MoveTarget {
    /// End of column 0 of another tab.
    #[serde(rename_all = "camelCase")]
    Tab { tab_id: TabId },
    /// End of another column on the same tab.
    Column { column: u8 },
    /// End of the item's current column or zone.
    End,
    /// The target item's slot; the target and everything after it shift down.
    #[serde(rename_all = "camelCase")]
    Item { target_id: DataItemId },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TabUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

pub struct LayoutUseCases {
    characters: Arc<dyn CharacterRepo>,
    clock: Arc<dyn ClockPort>,
}

impl LayoutUseCases {
    pub fn new(characters: Arc<dyn CharacterRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { characters, clock }
    }

    pub async fn add_tab(
        &self,
        id: CharacterId,
        name: &str,
        icon: Option<String>,
    ) -> Result<DashboardTab, SheetError> {
        let mut character = self.load(id).await?;
        let tab_id = character.add_tab(TabName::new(name)?, icon, self.clock.now())?;
        self.characters.save(&character).await?;

        tracing::info!(character_id = %id, tab_id = %tab_id, "Added tab");
        stored_tab(&character, tab_id)
    }

    pub async fn update_tab(
        &self,
        id: CharacterId,
        tab_id: TabId,
        update: TabUpdate,
    ) -> Result<DashboardTab, SheetError> {
        let mut character = self.load(id).await?;
        let now = self.clock.now();
        if let Some(name) = update.name {
            character.rename_tab(tab_id, TabName::new(name)?, now)?;
        }
        if let Some(icon) = update.icon {
            character.set_tab_icon(tab_id, icon, now)?;
        }
        let tab = stored_tab(&character, tab_id)?;
        self.characters.save(&character).await?;
        Ok(tab)
    }

    /// Delete a tab that no longer holds any items.
    pub async fn delete_tab(&self, id: CharacterId, tab_id: TabId) -> Result<(), SheetError> {
        let mut character = self.load(id).await?;
        if !character.delete_tab(tab_id, self.clock.now()) {
            tracing::debug!(character_id = %id, tab_id = %tab_id, "Tab deletion refused");
            return Err(SheetError::TabNotDeletable(tab_id));
        }
        self.characters.save(&character).await?;

        tracing::info!(character_id = %id, tab_id = %tab_id, "Deleted tab");
        Ok(())
    }

    pub async fn reorder_tabs(
        &self,
        id: CharacterId,
        ordered: &[TabId],
    ) -> Result<Vec<DashboardTab>, SheetError> {
        let mut character = self.load(id).await?;
        character.reorder_tabs(ordered, self.clock.now())?;
        self.characters.save(&character).await?;
        Ok(character.tabs().to_vec())
    }

    pub async fn cycle_column_width(
        &self,
        id: CharacterId,
        tab_id: TabId,
        column: u8,
    ) -> Result<ColumnWidth, SheetError> {
        let mut character = self.load(id).await?;
        let width = character.cycle_column_width(tab_id, column, self.clock.now())?;
        self.characters.save(&character).await?;
        Ok(width)
    }

    pub async fn move_item(
        &self,
        id: CharacterId,
        item_id: DataItemId,
        target: MoveTarget,
    ) -> Result<PlayerCharacter, SheetError> {
        let mut character = self.load(id).await?;
        let now = self.clock.now();
        match target {
            MoveTarget::Tab { tab_id } => character.move_item_to_tab(item_id, tab_id, now)?,
            MoveTarget::Column { column } => character.move_item_to_column(item_id, column, now)?,
            MoveTarget::End => character.move_item_to_end(item_id, now)?,
            MoveTarget::Item { target_id } => character.move_item_onto(item_id, target_id, now)?,
        }
        self.characters.save(&character).await?;

        tracing::debug!(character_id = %id, item_id = %item_id, target = ?target, "Moved item");
        Ok(character)
    }

    /// Move every zone-placed item onto the first tab. Returns how many moved.
    pub async fn migrate_layout(&self, id: CharacterId) -> Result<usize, SheetError> {
        let mut character = self.load(id).await?;
        let migrated = character.migrate_legacy_layout(self.clock.now());
        if migrated > 0 {
            self.characters.save(&character).await?;
            tracing::info!(character_id = %id, migrated, "Migrated legacy layout");
        }
        Ok(migrated)
    }

    async fn load(&self, id: CharacterId) -> Result<PlayerCharacter, SheetError> {
        self.characters
            .get(id)
            .await?
            .ok_or(SheetError::CharacterNotFound(id))
    }
}

fn stored_tab(character: &PlayerCharacter, tab_id: TabId) -> Result<DashboardTab, SheetError> {
    character
        .tab(tab_id)
        .cloned()
        .ok_or_else(|| DomainError::not_found("DashboardTab", tab_id.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockCharacterRepo;
    use crate::test_fixtures::{
        fixed_clock, fixed_now, memory_repos, saved_character, saved_user, MemoryRepos,
    };
    use mockall::predicate::always;
    use sheetkeeper_domain::{
        CharacterName, DataItem, DataItemType, GameSystemKind, ItemName, Placement, UserRole,
        MAX_TABS,
    };

    fn use_cases(repos: &MemoryRepos) -> LayoutUseCases {
        LayoutUseCases::new(repos.characters.clone(), fixed_clock())
    }

    #[tokio::test]
    async fn ninth_tab_is_rejected() {
        let repos = memory_repos();
        let user = saved_user(&repos, UserRole::Player).await;
        let character = saved_character(&repos, &user, GameSystemKind::Dnd5e).await;
        let use_cases = use_cases(&repos);

        for index in character.tabs().len()..MAX_TABS {
            use_cases
                .add_tab(character.id(), &format!("Extra {}", index), None)
                .await
                .expect("room left");
        }
        let result = use_cases.add_tab(character.id(), "One too many", None).await;
        assert!(matches!(
            result,
            Err(SheetError::Domain(DomainError::ContainerFull { .. }))
        ));
    }

    #[tokio::test]
    async fn referenced_tab_is_not_deletable_and_not_saved() {
        let character = {
            let repos = memory_repos();
            let user = saved_user(&repos, UserRole::Player).await;
            saved_character(&repos, &user, GameSystemKind::Dnd5e).await
        };
        let main = character.tabs()[0].id;
        let stored = character.clone();

        let mut characters = MockCharacterRepo::new();
        characters
            .expect_get()
            .returning(move |_| Ok(Some(stored.clone())));
        characters.expect_save().with(always()).never();

        let use_cases = LayoutUseCases::new(Arc::new(characters), fixed_clock());
        let result = use_cases.delete_tab(character.id(), main).await;
        assert!(matches!(result, Err(SheetError::TabNotDeletable(id)) if id == main));
    }

    #[tokio::test]
    async fn emptied_tab_can_be_deleted() {
        let repos = memory_repos();
        let user = saved_user(&repos, UserRole::Player).await;
        let character = saved_character(&repos, &user, GameSystemKind::Dnd5e).await;
        let use_cases = use_cases(&repos);
        let extra = use_cases
            .add_tab(character.id(), "Spells", Some("sparkles".to_string()))
            .await
            .expect("added");
        assert_eq!(extra.icon, "sparkles");

        use_cases
            .delete_tab(character.id(), extra.id)
            .await
            .expect("deleted");
        let stored = repos
            .characters
            .get(character.id())
            .await
            .expect("get")
            .expect("present");
        assert_eq!(stored.tabs().len(), character.tabs().len());
    }

    #[tokio::test]
    async fn reorder_renumbers_tabs() {
        let repos = memory_repos();
        let user = saved_user(&repos, UserRole::Player).await;
        let character = saved_character(&repos, &user, GameSystemKind::Dnd5e).await;
        let mut ordered: Vec<TabId> = character.tabs().iter().map(|tab| tab.id).collect();
        ordered.reverse();

        let tabs = use_cases(&repos)
            .reorder_tabs(character.id(), &ordered)
            .await
            .expect("reordered");

        let ids: Vec<TabId> = tabs.iter().map(|tab| tab.id).collect();
        assert_eq!(ids, ordered);
        let orders: Vec<u32> = tabs.iter().map(|tab| tab.order).collect();
        assert_eq!(orders, (0..tabs.len() as u32).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn column_width_cycles_through_four() {
        let repos = memory_repos();
        let user = saved_user(&repos, UserRole::Player).await;
        let character = saved_character(&repos, &user, GameSystemKind::Dnd5e).await;
        let tab = character.tabs()[0].id;
        let use_cases = use_cases(&repos);

        let mut widths = Vec::new();
        for _ in 0..4 {
            let width = use_cases
                .cycle_column_width(character.id(), tab, 2)
                .await
                .expect("cycled");
            widths.push(width.get());
        }
        assert_eq!(widths, vec![2, 3, 4, 1]);
    }

    #[tokio::test]
    async fn move_to_end_keeps_column_members() {
        let repos = memory_repos();
        let user = saved_user(&repos, UserRole::Player).await;
        let character = saved_character(&repos, &user, GameSystemKind::Dnd5e).await;
        let main = character.tabs()[0].id;
        let column: Vec<DataItemId> = character
            .items_in_column(main, 0)
            .iter()
            .map(|item| item.id)
            .collect();
        let first = column[0];
        let old_max = character
            .items_in_column(main, 0)
            .iter()
            .map(|item| item.placement.order())
            .max()
            .expect("column has items");

        let moved = use_cases(&repos)
            .move_item(character.id(), first, MoveTarget::End)
            .await
            .expect("moved");

        let after = moved.items_in_column(main, 0);
        let mut before_ids = column.clone();
        let mut after_ids: Vec<DataItemId> = after.iter().map(|item| item.id).collect();
        before_ids.sort();
        after_ids.sort();
        assert_eq!(after_ids, before_ids);

        let mut orders: Vec<u32> = after.iter().map(|item| item.placement.order()).collect();
        orders.sort_unstable();
        orders.dedup();
        assert_eq!(orders.len(), after.len());

        let moved_item = moved.item(first).expect("still present");
        assert_eq!(moved_item.placement.order(), old_max + 1);
        assert_eq!(after.last().map(|item| item.id), Some(first));
    }

    #[tokio::test]
    async fn legacy_zones_migrate_to_first_tab() {
        let repos = memory_repos();
        let user = saved_user(&repos, UserRole::Player).await;
        let tab = DashboardTab::new(TabName::main(), 0);
        let tab_id = tab.id;
        let items = vec![
            DataItem::new(
                ItemName::new("Backstory").expect("valid"),
                DataItemType::Text,
                Placement::Zone {
                    zone: "left".to_string(),
                    order: 0,
                },
            ),
            DataItem::new(
                ItemName::new("Ideals").expect("valid"),
                DataItemType::Text,
                Placement::Zone {
                    zone: "right".to_string(),
                    order: 0,
                },
            ),
        ];
        let character = PlayerCharacter::with_layout(
            user.id,
            CharacterName::new("Old Sheet").expect("valid"),
            GameSystemKind::Dnd5e,
            vec![tab],
            items,
            fixed_now(),
        )
        .expect("valid layout");
        repos.characters.save(&character).await.expect("saved");
        let use_cases = use_cases(&repos);

        assert_eq!(use_cases.migrate_layout(character.id()).await.expect("migrated"), 2);
        assert_eq!(use_cases.migrate_layout(character.id()).await.expect("idempotent"), 0);

        let stored = repos
            .characters
            .get(character.id())
            .await
            .expect("get")
            .expect("present");
        assert!(!stored.has_legacy_layout());
        assert!(stored
            .items()
            .iter()
            .all(|item| item.placement.tab_id() == Some(tab_id)));
    }

    #[test]
    fn move_target_reads_to_tag() {
        let target: MoveTarget =
            serde_json::from_str(r#"{"to":"column","column":2}"#).expect("parse");
        assert_eq!(target, MoveTarget::Column { column: 2 });
        let end: MoveTarget = serde_json::from_str(r#"{"to":"end"}"#).expect("parse");
        assert_eq!(end, MoveTarget::End);
    }
}
