//! Derived sheet numbers, computed on read
//!
//! Nothing here is stored. A `SheetView` is rebuilt from the character every
//! time it is requested, so modifiers, saves, and skill totals always follow
//! the current scores and the stored proficiency bonus.

use serde::Serialize;

use crate::aggregates::PlayerCharacter;
use crate::game_systems::GameSystemKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityLine {
    pub ability: String,
    pub score: i32,
    pub modifier: i32,
    pub save_proficient: bool,
    pub saving_throw: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillLine {
    pub name: String,
    pub ability: String,
    pub proficient: bool,
    pub expertise: bool,
    pub total: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetView {
    pub game_system: GameSystemKind,
    pub level: i32,
    pub proficiency_bonus: i32,
    /// False while the stored bonus lags behind the level.
    pub proficiency_in_sync: bool,
    pub abilities: Vec<AbilityLine>,
    pub skills: Vec<SkillLine>,
}

impl SheetView {
    pub fn compute(character: &PlayerCharacter) -> Self {
        let system = character.game_system().system();
        let engine = system.calculation_engine();
        let proficiency_bonus = character.proficiency_bonus();

        let abilities = system
            .abilities()
            .iter()
            .map(|ability| {
                let score = character.ability_score(ability);
                let save_proficient = character.has_save_proficiency(ability);
                AbilityLine {
                    ability: (*ability).to_string(),
                    score,
                    modifier: engine.ability_modifier(score),
                    save_proficient,
                    saving_throw: engine.saving_throw(score, save_proficient, proficiency_bonus),
                }
            })
            .collect();

        let skills = character
            .skills()
            .into_iter()
            .map(|skill| {
                let score = character.ability_score(&skill.ability);
                SkillLine {
                    total: engine.skill_total(
                        score,
                        skill.proficient(),
                        skill.expertise(),
                        proficiency_bonus,
                    ),
                    proficient: skill.proficient(),
                    expertise: skill.expertise(),
                    name: skill.name,
                    ability: skill.ability,
                }
            })
            .collect();

        Self {
            game_system: character.game_system(),
            level: character.level(),
            proficiency_bonus,
            proficiency_in_sync: character.proficiency_in_sync(),
            abilities,
            skills,
        }
    }

    pub fn ability(&self, key: &str) -> Option<&AbilityLine> {
        self.abilities.iter().find(|line| line.ability == key)
    }

    pub fn skill(&self, name: &str) -> Option<&SkillLine> {
        self.skills
            .iter()
            .find(|line| line.name.eq_ignore_ascii_case(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    use chrono::Utc;

    use crate::entities::{DataItem, DataItemType, SkillEntry, META_SAVING_THROWS};
    use crate::ids::UserId;
    use crate::value_objects::{CharacterName, ItemName, ItemValue, Placement};

    fn character(system: GameSystemKind) -> PlayerCharacter {
        PlayerCharacter::new(
            UserId::new(),
            CharacterName::new("Vex").expect("valid"),
            system,
            Utc::now(),
        )
    }

    fn add(pc: &mut PlayerCharacter, item: DataItem) {
        pc.add_item(item, Utc::now()).expect("valid placement");
    }

    fn item(pc: &PlayerCharacter, name: &str, item_type: DataItemType) -> DataItem {
        DataItem::new(
            ItemName::new(name).expect("valid"),
            item_type,
            Placement::tab(pc.tabs()[0].id, 0, 0),
        )
    }

    #[test]
    fn empty_sheet_uses_defaults() {
        let pc = character(GameSystemKind::Dnd5e);
        let view = SheetView::compute(&pc);

        assert_eq!(view.level, 1);
        assert_eq!(view.proficiency_bonus, 2);
        assert!(view.proficiency_in_sync);
        assert_eq!(view.abilities.len(), 6);
        let strength = view.ability("str").expect("5e has str");
        assert_eq!(strength.score, 10);
        assert_eq!(strength.modifier, 0);
        assert_eq!(strength.saving_throw, 0);
        assert!(view.skills.is_empty());
    }

    #[test]
    fn saves_and_skills_follow_stored_bonus() {
        let mut pc = character(GameSystemKind::Dnd5e);

        let mut scores = BTreeMap::new();
        scores.insert("dex".to_string(), ItemValue::Integer(16));
        scores.insert("int".to_string(), ItemValue::Integer(8));
        let mut saves = BTreeMap::new();
        saves.insert("dex".to_string(), ItemValue::Boolean(true));
        let group = item(&pc, "Abilities", DataItemType::AttributesGroup)
            .with_value(ItemValue::Object(scores))
            .with_metadata(META_SAVING_THROWS, ItemValue::Object(saves));
        add(&mut pc, group);
        let level = item(&pc, "Level", DataItemType::Level).with_value(5);
        add(&mut pc, level);
        let bonus = item(&pc, "Proficiency", DataItemType::ProficiencyBonus).with_value(3);
        add(&mut pc, bonus);

        let mut stealth = SkillEntry::new("Stealth", "dex");
        stealth.set_expertise(true);
        let mut arcana = SkillEntry::new("Arcana", "int");
        arcana.set_proficient(true);
        let mut skills = item(&pc, "Skills", DataItemType::SkillsGroup);
        skills.set_skills(&[stealth, arcana, SkillEntry::new("Athletics", "str")]);
        add(&mut pc, skills);

        let view = SheetView::compute(&pc);

        let dex = view.ability("dex").expect("dex");
        assert_eq!(dex.modifier, 3);
        assert_eq!(dex.saving_throw, 6);
        assert_eq!(view.ability("int").map(|l| l.saving_throw), Some(-1));
        assert_eq!(view.skill("stealth").map(|s| s.total), Some(9));
        assert_eq!(view.skill("Arcana").map(|s| s.total), Some(2));
        assert_eq!(view.skill("Athletics").map(|s| s.total), Some(0));
        assert!(view.proficiency_in_sync);
    }

    #[test]
    fn level_change_is_visible_on_next_read() {
        let mut pc = character(GameSystemKind::Dnd5e);
        let level = item(&pc, "Level", DataItemType::Level).with_value(4);
        add(&mut pc, level);
        let bonus = item(&pc, "Proficiency", DataItemType::ProficiencyBonus).with_value(2);
        add(&mut pc, bonus);
        let mut skills = item(&pc, "Skills", DataItemType::SkillsGroup);
        let mut perception = SkillEntry::new("Perception", "wis");
        perception.set_proficient(true);
        skills.set_skills(&[perception]);
        add(&mut pc, skills);

        assert_eq!(SheetView::compute(&pc).skill("Perception").map(|s| s.total), Some(2));
        pc.set_level(5, Utc::now()).expect("level item");
        assert_eq!(SheetView::compute(&pc).skill("Perception").map(|s| s.total), Some(3));
    }

    #[test]
    fn co2_characteristics_are_modifiers() {
        let mut pc = character(GameSystemKind::Co2);
        let mut scores = BTreeMap::new();
        scores.insert("agi".to_string(), ItemValue::Integer(3));
        let group = item(&pc, "Caractéristiques", DataItemType::AttributesGroup)
            .with_value(ItemValue::Object(scores));
        add(&mut pc, group);

        let view = SheetView::compute(&pc);
        assert_eq!(view.ability("agi").map(|l| l.modifier), Some(3));
        assert_eq!(view.abilities.len(), 7);
    }
}
