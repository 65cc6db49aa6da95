//! Starter sheets for new characters
//!
//! Each game system gets a default set of tabs and the items a fresh sheet
//! needs: level, abilities, skills where the system has them, hit points, and
//! space for gear and notes.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};

use crate::aggregates::PlayerCharacter;
use crate::entities::{
    DashboardTab, DataItem, DataItemType, HitPoints, SkillEntry, META_BONUS, META_SAVING_THROWS,
};
use crate::error::DomainError;
use crate::game_systems::{GameSystem, GameSystemKind};
use crate::ids::{TabId, UserId};
use crate::value_objects::{CharacterName, ItemName, ItemValue, Placement, TabName};

const STARTING_HIT_POINTS: i32 = 10;

/// Lays items out column by column, appending in insertion order.
struct LayoutBuilder {
    tabs: Vec<DashboardTab>,
    items: Vec<DataItem>,
    next_order: HashMap<(TabId, u8), u32>,
}

impl LayoutBuilder {
    fn new() -> Self {
        Self {
            tabs: Vec::new(),
            items: Vec::new(),
            next_order: HashMap::new(),
        }
    }

    fn tab(&mut self, name: &str, icon: &str) -> Result<TabId, DomainError> {
        let tab = DashboardTab::new(TabName::new(name)?, self.tabs.len() as u32).with_icon(icon);
        let id = tab.id;
        self.tabs.push(tab);
        Ok(id)
    }

    fn item(
        &mut self,
        tab_id: TabId,
        column: u8,
        name: &str,
        item_type: DataItemType,
    ) -> Result<&mut DataItem, DomainError> {
        let order = self.next_order.entry((tab_id, column)).or_insert(0);
        let item = DataItem::new(
            ItemName::new(name)?,
            item_type,
            Placement::tab(tab_id, column, *order),
        );
        *order += 1;
        self.items.push(item);
        let index = self.items.len() - 1;
        Ok(&mut self.items[index])
    }
}

/// Build a new character with the starter layout of its game system.
pub fn starter_character(
    user_id: UserId,
    name: CharacterName,
    game_system: GameSystemKind,
    now: DateTime<Utc>,
) -> Result<PlayerCharacter, DomainError> {
    let system = game_system.system();
    let mut layout = LayoutBuilder::new();

    let main = layout.tab("Main", "user")?;
    let combat = layout.tab("Combat", "swords")?;
    let inventory = layout.tab("Inventory", "backpack")?;
    let notes = layout.tab("Notes", "notebook")?;

    layout.item(main, 0, "Level", DataItemType::Level)?;
    if game_system != GameSystemKind::Co2 {
        let engine = system.calculation_engine();
        let bonus = engine.proficiency_bonus(1);
        let label = match game_system {
            GameSystemKind::Dnd4e => "Half-level Bonus",
            _ => "Proficiency Bonus",
        };
        let item = layout.item(main, 0, label, DataItemType::ProficiencyBonus)?;
        item.value = ItemValue::Integer(bonus);
        item.set_metadata(META_BONUS, bonus);
    }

    let abilities = layout.item(
        main,
        0,
        abilities_label(game_system),
        DataItemType::AttributesGroup,
    )?;
    let (scores, saves) = starting_abilities(system);
    abilities.value = ItemValue::Object(scores);
    if game_system == GameSystemKind::Dnd5e {
        abilities.set_metadata(META_SAVING_THROWS, ItemValue::Object(saves));
    }

    if !system.skills().is_empty() {
        let skills: Vec<SkillEntry> = system
            .skills()
            .iter()
            .map(|skill| SkillEntry::new(skill.name, skill.ability))
            .collect();
        layout
            .item(main, 1, "Skills", DataItemType::SkillsGroup)?
            .set_skills(&skills);
    }

    layout
        .item(combat, 0, "Hit Points", DataItemType::Hp)?
        .set_hit_points(HitPoints::new(STARTING_HIT_POINTS));
    layout.item(combat, 0, "Armor Class", DataItemType::Numeric)?.value = ItemValue::Integer(10);
    layout.item(combat, 1, "Attacks", DataItemType::Attack)?;

    layout.item(inventory, 0, "Equipment", DataItemType::Equipment)?;
    layout.item(inventory, 1, "Coins", DataItemType::Numeric)?;

    layout.item(notes, 0, "Notes", DataItemType::Text)?;

    PlayerCharacter::with_layout(user_id, name, game_system, layout.tabs, layout.items, now)
}

fn abilities_label(game_system: GameSystemKind) -> &'static str {
    match game_system {
        GameSystemKind::Co2 => "Caractéristiques",
        _ => "Abilities",
    }
}

fn starting_abilities(
    system: &dyn GameSystem,
) -> (BTreeMap<String, ItemValue>, BTreeMap<String, ItemValue>) {
    // CO2 characteristics are modifiers, so an average character starts at 0
    let start = match system.kind() {
        GameSystemKind::Co2 => 0,
        _ => crate::game_systems::dnd5e::DEFAULT_ABILITY_SCORE,
    };
    let scores = system
        .abilities()
        .iter()
        .map(|ability| ((*ability).to_string(), ItemValue::Integer(start)))
        .collect();
    let saves = system
        .abilities()
        .iter()
        .map(|ability| ((*ability).to_string(), ItemValue::Boolean(false)))
        .collect();
    (scores, saves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet_view::SheetView;

    fn build(system: GameSystemKind) -> PlayerCharacter {
        starter_character(
            UserId::new(),
            CharacterName::new("Starter").expect("valid"),
            system,
            Utc::now(),
        )
        .expect("template is valid")
    }

    #[test]
    fn dnd5e_starter_is_consistent() {
        let pc = build(GameSystemKind::Dnd5e);
        assert_eq!(pc.tabs().len(), 4);
        assert_eq!(pc.level(), 1);
        assert_eq!(pc.proficiency_bonus(), 2);
        assert!(pc.proficiency_in_sync());
        assert_eq!(pc.skills().len(), 18);
        assert!(pc.validate().is_ok());

        let view = SheetView::compute(&pc);
        assert!(view.abilities.iter().all(|line| line.modifier == 0));
    }

    #[test]
    fn starter_items_are_ordered_per_column() {
        let pc = build(GameSystemKind::Dnd5e);
        let main = pc.tabs()[0].id;
        let orders: Vec<u32> = pc
            .items_in_column(main, 0)
            .iter()
            .map(|item| item.placement.order())
            .collect();
        assert_eq!(orders, vec![0, 1, 2]);
    }

    #[test]
    fn co2_starter_has_no_proficiency_bonus_or_skills() {
        let pc = build(GameSystemKind::Co2);
        assert!(pc.first_of_type(DataItemType::ProficiencyBonus).is_none());
        assert!(pc.first_of_type(DataItemType::SkillsGroup).is_none());
        assert_eq!(pc.ability_score("agi"), 0);
        assert!(pc.proficiency_in_sync());
    }

    #[test]
    fn dnd4e_starter_level_bonus_matches_level_one() {
        let pc = build(GameSystemKind::Dnd4e);
        assert_eq!(pc.proficiency_bonus(), 0);
        assert!(pc.proficiency_in_sync());
    }
}
