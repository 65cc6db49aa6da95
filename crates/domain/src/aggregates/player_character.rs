//! PlayerCharacter aggregate - a character sheet and everything on it
//!
//! # Rustic DDD Design
//!
//! - **Private fields**: items and tabs only change through methods that keep
//!   the invariants below
//! - **Newtypes**: `CharacterName`, `TabName`, `ItemName` are validated
//! - **Explicit time**: every mutation takes `now` and bumps `updated_at`
//!
//! # Invariants
//!
//! - Every tab placement points at a tab of this character
//! - At most [`MAX_TABS`] tabs; the last tab and referenced tabs are never deleted
//! - Tab orders are `0..n`
//! - The stored proficiency bonus is rewritten whenever the level changes

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{
    DashboardTab, DataItem, DataItemType, HitPoints, SkillEntry, META_ABILITY, META_BONUS,
    META_SAVING_THROW, META_SAVING_THROWS,
};
use crate::error::DomainError;
use crate::game_systems::dnd5e::{DEFAULT_ABILITY_SCORE, DEFAULT_PROFICIENCY_BONUS};
use crate::game_systems::GameSystemKind;
use crate::ids::{CharacterId, DataItemId, TabId, UserId};
use crate::layout;
use crate::value_objects::{CharacterName, ColumnWidth, ItemName, ItemValue, Placement, TabName};

/// Maximum number of dashboard tabs per character.
pub const MAX_TABS: usize = 8;

/// Level assumed when a sheet has no level item.
pub const DEFAULT_LEVEL: i32 = 1;

/// What a level change did to the sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelChange {
    pub previous_level: i32,
    pub level: i32,
    /// `None` when the sheet has no proficiency-bonus item.
    pub previous_bonus: Option<i32>,
    pub proficiency_bonus: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerCharacter {
    id: CharacterId,
    name: CharacterName,
    game_system: GameSystemKind,
    user_id: UserId,
    items: Vec<DataItem>,
    tabs: Vec<DashboardTab>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl PlayerCharacter {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// Create a character with a single empty "Main" tab.
    pub fn new(
        user_id: UserId,
        name: CharacterName,
        game_system: GameSystemKind,
        now: DateTime<Utc>,
    ) -> Self {
        let main = DashboardTab::new(TabName::main(), 0);
        Self {
            id: CharacterId::new(),
            name,
            game_system,
            user_id,
            items: Vec::new(),
            tabs: vec![main],
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a character from a prepared layout.
    ///
    /// # Errors
    ///
    /// Fails if there are no tabs, too many tabs, or an item points at a tab
    /// that is not in `tabs`.
    pub fn with_layout(
        user_id: UserId,
        name: CharacterName,
        game_system: GameSystemKind,
        tabs: Vec<DashboardTab>,
        items: Vec<DataItem>,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if tabs.is_empty() {
            return Err(DomainError::validation("A character needs at least one tab"));
        }
        if tabs.len() > MAX_TABS {
            return Err(DomainError::container_full("tabs", tabs.len() as u32, MAX_TABS as u32));
        }
        let mut character = Self {
            id: CharacterId::new(),
            name,
            game_system,
            user_id,
            items: Vec::new(),
            tabs,
            created_at: now,
            updated_at: now,
        };
        character.renumber_tabs();
        for item in items {
            character.check_placement(&item.placement)?;
            character.items.push(item);
        }
        Ok(character)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> CharacterId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &CharacterName {
        &self.name
    }

    #[inline]
    pub fn game_system(&self) -> GameSystemKind {
        self.game_system
    }

    #[inline]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[inline]
    pub fn items(&self) -> &[DataItem] {
        &self.items
    }

    /// Tabs sorted by their order.
    #[inline]
    pub fn tabs(&self) -> &[DashboardTab] {
        &self.tabs
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[inline]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn item(&self, id: DataItemId) -> Option<&DataItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn tab(&self, id: TabId) -> Option<&DashboardTab> {
        self.tabs.iter().find(|tab| tab.id == id)
    }

    /// First item of a given type, in storage order.
    pub fn first_of_type(&self, item_type: DataItemType) -> Option<&DataItem> {
        self.items.iter().find(|item| item.item_type == item_type)
    }

    /// Items placed in one column of a tab, in display order.
    pub fn items_in_column(&self, tab_id: TabId, column: u8) -> Vec<&DataItem> {
        let scope = crate::value_objects::PlacementScope::Column { tab_id, column };
        layout::scope_members(&self.items, &scope)
            .into_iter()
            .filter_map(|id| self.item(id))
            .collect()
    }

    pub fn has_legacy_layout(&self) -> bool {
        self.items.iter().any(|item| item.placement.is_legacy())
    }

    // =========================================================================
    // Sheet values
    // =========================================================================

    /// Stored level, or 1 when the sheet has none.
    pub fn level(&self) -> i32 {
        self.first_of_type(DataItemType::Level)
            .and_then(|item| item.value.as_i32())
            .unwrap_or(DEFAULT_LEVEL)
    }

    /// Stored proficiency bonus, or 2 when the sheet has none.
    pub fn proficiency_bonus(&self) -> i32 {
        self.stored_proficiency_bonus()
            .unwrap_or(DEFAULT_PROFICIENCY_BONUS)
    }

    fn stored_proficiency_bonus(&self) -> Option<i32> {
        self.first_of_type(DataItemType::ProficiencyBonus)
            .and_then(|item| item.value.as_i32())
    }

    /// Whether the stored bonus matches what the level calls for.
    ///
    /// Sheets without a proficiency-bonus item are always in sync.
    pub fn proficiency_in_sync(&self) -> bool {
        match self.stored_proficiency_bonus() {
            Some(stored) => {
                stored
                    == self
                        .game_system
                        .calculation_engine()
                        .proficiency_bonus(self.level())
            }
            None => self.first_of_type(DataItemType::ProficiencyBonus).is_none(),
        }
    }

    /// Score for an ability key. A standalone attribute item wins over an
    /// attributes group; missing scores read as 10.
    pub fn ability_score(&self, ability: &str) -> i32 {
        let standalone = self.items.iter().find(|item| {
            item.item_type == DataItemType::Attribute
                && item
                    .metadata
                    .get(META_ABILITY)
                    .and_then(ItemValue::as_str)
                    .is_some_and(|key| key.eq_ignore_ascii_case(ability))
        });
        if let Some(score) = standalone.and_then(|item| item.value.as_i32()) {
            return score;
        }
        self.items
            .iter()
            .filter(|item| item.item_type == DataItemType::AttributesGroup)
            .find_map(|item| item.value.get(ability).and_then(ItemValue::as_i32))
            .unwrap_or(DEFAULT_ABILITY_SCORE)
    }

    /// Whether the character is proficient in an ability's saving throw.
    pub fn has_save_proficiency(&self, ability: &str) -> bool {
        for item in &self.items {
            match item.item_type {
                DataItemType::Attribute
                    if item
                        .metadata
                        .get(META_ABILITY)
                        .and_then(ItemValue::as_str)
                        .is_some_and(|key| key.eq_ignore_ascii_case(ability)) =>
                {
                    return item.metadata_flag(META_SAVING_THROW);
                }
                DataItemType::AttributesGroup => {
                    if let Some(flag) = item
                        .metadata
                        .get(META_SAVING_THROWS)
                        .and_then(|saves| saves.get(ability))
                        .and_then(ItemValue::as_bool)
                    {
                        return flag;
                    }
                }
                _ => {}
            }
        }
        false
    }

    /// All skill rows across skills-group items.
    pub fn skills(&self) -> Vec<SkillEntry> {
        self.items
            .iter()
            .filter(|item| item.item_type == DataItemType::SkillsGroup)
            .flat_map(DataItem::skills)
            .collect()
    }

    // =========================================================================
    // Character mutations
    // =========================================================================

    pub fn rename(&mut self, name: CharacterName, now: DateTime<Utc>) {
        self.name = name;
        self.touch(now);
    }

    /// Set the level and sync the proficiency bonus in the same call.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the sheet has no level item.
    pub fn set_level(
        &mut self,
        level: i32,
        now: DateTime<Utc>,
    ) -> Result<LevelChange, DomainError> {
        let index = self
            .items
            .iter()
            .position(|item| item.item_type == DataItemType::Level)
            .ok_or_else(|| DomainError::not_found("DataItem", "level"))?;
        Ok(self.apply_level(index, level, now))
    }

    // =========================================================================
    // Item mutations
    // =========================================================================

    /// Add an item, appended to the end of the scope its placement names.
    ///
    /// # Errors
    ///
    /// Fails if the placement references a tab this character does not have.
    pub fn add_item(
        &mut self,
        mut item: DataItem,
        now: DateTime<Utc>,
    ) -> Result<DataItemId, DomainError> {
        self.check_placement(&item.placement)?;
        let order = layout::next_order(&self.items, &item.placement.scope(), None);
        item.placement.set_order(order);
        let id = item.id;
        self.items.push(item);
        self.touch(now);
        Ok(id)
    }

    pub fn remove_item(
        &mut self,
        id: DataItemId,
        now: DateTime<Utc>,
    ) -> Result<DataItem, DomainError> {
        let index = self.item_index(id)?;
        let removed = self.items.remove(index);
        self.touch(now);
        Ok(removed)
    }

    pub fn rename_item(
        &mut self,
        id: DataItemId,
        name: ItemName,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let index = self.item_index(id)?;
        self.items[index].name = name;
        self.touch(now);
        Ok(())
    }

    /// Replace an item's value.
    ///
    /// Writing a level item goes through [`Self::set_level`], so the
    /// proficiency bonus follows; the resulting change is returned. Hit point
    /// and proficiency bonus items keep their mirrored metadata in step.
    pub fn update_item_value(
        &mut self,
        id: DataItemId,
        value: ItemValue,
        now: DateTime<Utc>,
    ) -> Result<Option<LevelChange>, DomainError> {
        let index = self.item_index(id)?;
        if self.items[index].item_type == DataItemType::Level {
            let level = value
                .as_i32()
                .ok_or_else(|| DomainError::validation("Level must be a number"))?;
            return Ok(Some(self.apply_level(index, level, now)));
        }
        let item = &mut self.items[index];
        match item.item_type {
            DataItemType::Hp => {
                let current = value
                    .as_i32()
                    .ok_or_else(|| DomainError::validation("Hit points must be a number"))?;
                let mut hit_points = item.hit_points().unwrap_or_else(|| HitPoints::new(0));
                hit_points.current = current.max(0);
                item.set_hit_points(hit_points);
            }
            DataItemType::ProficiencyBonus => {
                let bonus = value.as_i32().ok_or_else(|| {
                    DomainError::validation("Proficiency bonus must be a number")
                })?;
                item.value = ItemValue::Integer(bonus);
                item.set_metadata(META_BONUS, bonus);
            }
            _ => item.value = value,
        }
        self.touch(now);
        Ok(None)
    }

    pub fn set_item_metadata(
        &mut self,
        id: DataItemId,
        key: &str,
        value: ItemValue,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let index = self.item_index(id)?;
        self.items[index].set_metadata(key, value);
        self.touch(now);
        Ok(())
    }

    /// Apply a change to an `hp` item's hit points.
    pub fn adjust_hit_points<R>(
        &mut self,
        id: DataItemId,
        now: DateTime<Utc>,
        change: impl FnOnce(&mut HitPoints) -> R,
    ) -> Result<(HitPoints, R), DomainError> {
        let index = self.item_index(id)?;
        let mut hp = self.items[index]
            .hit_points()
            .ok_or_else(|| DomainError::validation("Item does not track hit points"))?;
        let outcome = change(&mut hp);
        self.items[index].set_hit_points(hp);
        self.touch(now);
        Ok((hp, outcome))
    }

    /// Set proficiency/expertise for one skill row of a skills-group item.
    pub fn set_skill_training(
        &mut self,
        id: DataItemId,
        skill_name: &str,
        proficient: bool,
        expertise: bool,
        now: DateTime<Utc>,
    ) -> Result<SkillEntry, DomainError> {
        let index = self.item_index(id)?;
        let mut skills = self.items[index].skills();
        let skill = skills
            .iter_mut()
            .find(|skill| skill.name.eq_ignore_ascii_case(skill_name))
            .ok_or_else(|| DomainError::not_found("Skill", skill_name))?;
        skill.set_proficient(proficient);
        skill.set_expertise(expertise);
        let updated = skill.clone();
        self.items[index].set_skills(&skills);
        self.touch(now);
        Ok(updated)
    }

    // =========================================================================
    // Layout
    // =========================================================================

    pub fn move_item_to_tab(
        &mut self,
        id: DataItemId,
        tab_id: TabId,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        self.require_tab(tab_id)?;
        layout::move_to_tab(&mut self.items, id, tab_id)?;
        self.touch(now);
        Ok(())
    }

    pub fn move_item_to_column(
        &mut self,
        id: DataItemId,
        column: u8,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        layout::move_to_column(&mut self.items, id, column)?;
        self.touch(now);
        Ok(())
    }

    pub fn move_item_to_end(
        &mut self,
        id: DataItemId,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        layout::move_to_end(&mut self.items, id)?;
        self.touch(now);
        Ok(())
    }

    pub fn move_item_onto(
        &mut self,
        id: DataItemId,
        target: DataItemId,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        layout::move_onto_item(&mut self.items, id, target)?;
        self.touch(now);
        Ok(())
    }

    /// Move all legacy zone items onto the first tab. Returns how many moved.
    pub fn migrate_legacy_layout(&mut self, now: DateTime<Utc>) -> usize {
        let Some(target) = self.tabs.first().map(|tab| tab.id) else {
            return 0;
        };
        let migrated = layout::migrate_zones_to_tab(&mut self.items, target);
        if migrated > 0 {
            self.touch(now);
        }
        migrated
    }

    // =========================================================================
    // Tabs
    // =========================================================================

    /// Append a tab.
    ///
    /// # Errors
    ///
    /// Returns `ContainerFull` once the character has [`MAX_TABS`] tabs.
    pub fn add_tab(
        &mut self,
        name: TabName,
        icon: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<TabId, DomainError> {
        if self.tabs.len() >= MAX_TABS {
            return Err(DomainError::container_full(
                "tabs",
                self.tabs.len() as u32,
                MAX_TABS as u32,
            ));
        }
        let mut tab = DashboardTab::new(name, self.tabs.len() as u32);
        if let Some(icon) = icon {
            tab.icon = icon;
        }
        let id = tab.id;
        self.tabs.push(tab);
        self.touch(now);
        Ok(id)
    }

    pub fn rename_tab(
        &mut self,
        id: TabId,
        name: TabName,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let tab = self.tab_mut(id)?;
        tab.name = name;
        self.touch(now);
        Ok(())
    }

    pub fn set_tab_icon(
        &mut self,
        id: TabId,
        icon: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let tab = self.tab_mut(id)?;
        tab.icon = icon.into();
        self.touch(now);
        Ok(())
    }

    /// Reorder tabs to match `ordered`, which must list every tab exactly once.
    pub fn reorder_tabs(
        &mut self,
        ordered: &[TabId],
        now: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        let mut seen = std::collections::HashSet::new();
        if ordered.len() != self.tabs.len()
            || !ordered.iter().all(|id| seen.insert(*id) && self.tab(*id).is_some())
        {
            return Err(DomainError::validation(
                "Tab order must list every tab exactly once",
            ));
        }
        let position: HashMap<TabId, usize> = ordered
            .iter()
            .enumerate()
            .map(|(index, id)| (*id, index))
            .collect();
        for tab in &mut self.tabs {
            if let Some(index) = position.get(&tab.id) {
                tab.order = *index as u32;
            }
        }
        self.renumber_tabs();
        self.touch(now);
        Ok(())
    }

    /// Delete a tab. Returns `false`, changing nothing, when the tab is the
    /// last one, is still referenced by an item, or does not exist.
    pub fn delete_tab(&mut self, id: TabId, now: DateTime<Utc>) -> bool {
        if self.tabs.len() <= 1 {
            return false;
        }
        if self.items.iter().any(|item| item.placement.tab_id() == Some(id)) {
            return false;
        }
        let Some(index) = self.tabs.iter().position(|tab| tab.id == id) else {
            return false;
        };
        self.tabs.remove(index);
        self.renumber_tabs();
        self.touch(now);
        true
    }

    pub fn cycle_column_width(
        &mut self,
        tab_id: TabId,
        column: u8,
        now: DateTime<Utc>,
    ) -> Result<ColumnWidth, DomainError> {
        let width = self.tab_mut(tab_id)?.cycle_column_width(column);
        self.touch(now);
        Ok(width)
    }

    // =========================================================================
    // Import support
    // =========================================================================

    /// Give the character, its tabs, and its items fresh ids and a new owner,
    /// remapping placements to the new tab ids.
    pub fn reassign_ids(&mut self, user_id: UserId, now: DateTime<Utc>) {
        let mut tab_map = HashMap::new();
        for tab in &mut self.tabs {
            let fresh = TabId::new();
            tab_map.insert(tab.id, fresh);
            tab.id = fresh;
        }
        for item in &mut self.items {
            item.id = DataItemId::new();
            if let Placement::Tab { tab_id, .. } = &mut item.placement {
                if let Some(fresh) = tab_map.get(tab_id) {
                    *tab_id = *fresh;
                }
            }
        }
        self.id = CharacterId::new();
        self.user_id = user_id;
        self.created_at = now;
        self.updated_at = now;
    }

    /// Check the aggregate invariants on a document loaded from storage.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.tabs.is_empty() {
            return Err(DomainError::validation("A character needs at least one tab"));
        }
        if self.tabs.len() > MAX_TABS {
            return Err(DomainError::container_full(
                "tabs",
                self.tabs.len() as u32,
                MAX_TABS as u32,
            ));
        }
        for item in &self.items {
            self.check_placement(&item.placement)?;
        }
        Ok(())
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    fn item_index(&self, id: DataItemId) -> Result<usize, DomainError> {
        self.items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| DomainError::not_found("DataItem", id.to_string()))
    }

    fn tab_mut(&mut self, id: TabId) -> Result<&mut DashboardTab, DomainError> {
        self.tabs
            .iter_mut()
            .find(|tab| tab.id == id)
            .ok_or_else(|| DomainError::not_found("DashboardTab", id.to_string()))
    }

    fn require_tab(&self, id: TabId) -> Result<(), DomainError> {
        self.tab(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("DashboardTab", id.to_string()))
    }

    fn check_placement(&self, placement: &Placement) -> Result<(), DomainError> {
        match placement.tab_id() {
            Some(tab_id) => self.require_tab(tab_id),
            None => Ok(()),
        }
    }

    fn renumber_tabs(&mut self) {
        self.tabs.sort_by_key(|tab| tab.order);
        for (index, tab) in self.tabs.iter_mut().enumerate() {
            tab.order = index as u32;
        }
    }

    fn apply_level(&mut self, level_index: usize, level: i32, now: DateTime<Utc>) -> LevelChange {
        let previous_level = self.items[level_index]
            .value
            .as_i32()
            .unwrap_or(DEFAULT_LEVEL);
        let previous_bonus = self.stored_proficiency_bonus();
        self.items[level_index].value = ItemValue::Integer(level);

        let bonus = self.game_system.calculation_engine().proficiency_bonus(level);
        let mut proficiency_bonus = None;
        if let Some(bonus_item) = self
            .items
            .iter_mut()
            .find(|item| item.item_type == DataItemType::ProficiencyBonus)
        {
            bonus_item.value = ItemValue::Integer(bonus);
            bonus_item.set_metadata(META_BONUS, bonus);
            proficiency_bonus = Some(bonus);
        }

        self.touch(now);
        LevelChange {
            previous_level,
            level,
            previous_bonus,
            proficiency_bonus,
        }
    }
}
