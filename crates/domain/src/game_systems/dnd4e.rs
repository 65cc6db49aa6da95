//! D&D 4th Edition game system implementation.

use super::traits::{CalculationEngine, GameSystem, SkillDefinition};
use super::GameSystemKind;

/// Flat bonus for a trained skill.
const TRAINED_SKILL_BONUS: i32 = 5;

const ABILITIES: [&str; 6] = ["str", "con", "dex", "int", "wis", "cha"];

const SKILLS: [SkillDefinition; 17] = [
    SkillDefinition::new("Acrobatics", "dex"),
    SkillDefinition::new("Arcana", "int"),
    SkillDefinition::new("Athletics", "str"),
    SkillDefinition::new("Bluff", "cha"),
    SkillDefinition::new("Diplomacy", "cha"),
    SkillDefinition::new("Dungeoneering", "wis"),
    SkillDefinition::new("Endurance", "con"),
    SkillDefinition::new("Heal", "wis"),
    SkillDefinition::new("History", "int"),
    SkillDefinition::new("Insight", "wis"),
    SkillDefinition::new("Intimidate", "cha"),
    SkillDefinition::new("Nature", "wis"),
    SkillDefinition::new("Perception", "wis"),
    SkillDefinition::new("Religion", "int"),
    SkillDefinition::new("Stealth", "dex"),
    SkillDefinition::new("Streetwise", "cha"),
    SkillDefinition::new("Thievery", "dex"),
];

/// D&D 4th Edition game system.
///
/// The level-scaled bonus is half the character level and applies to every
/// check; training adds a flat +5. There is no expertise.
pub struct Dnd4eSystem;

impl Dnd4eSystem {
    pub const fn new() -> Self {
        Self
    }
}

impl Default for Dnd4eSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSystem for Dnd4eSystem {
    fn kind(&self) -> GameSystemKind {
        GameSystemKind::Dnd4e
    }

    fn display_name(&self) -> &str {
        "D&D 4th Edition"
    }

    fn calculation_engine(&self) -> &dyn CalculationEngine {
        self
    }

    fn abilities(&self) -> &[&'static str] {
        &ABILITIES
    }

    fn skills(&self) -> &[SkillDefinition] {
        &SKILLS
    }

    fn max_level(&self) -> i32 {
        30
    }
}

impl CalculationEngine for Dnd4eSystem {
    fn ability_modifier(&self, score: i32) -> i32 {
        super::dnd5e::modifier(score)
    }

    fn proficiency_bonus(&self, level: i32) -> i32 {
        level.max(0) / 2
    }

    // Ability checks: half level always applies
    fn saving_throw(&self, score: i32, _proficient: bool, proficiency_bonus: i32) -> i32 {
        self.ability_modifier(score).saturating_add(proficiency_bonus)
    }

    fn skill_total(
        &self,
        score: i32,
        proficient: bool,
        _expertise: bool,
        proficiency_bonus: i32,
    ) -> i32 {
        let trained = if proficient { TRAINED_SKILL_BONUS } else { 0 };
        self.ability_modifier(score)
            .saturating_add(proficiency_bonus)
            .saturating_add(trained)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_level_bonus() {
        let system = Dnd4eSystem::new();
        assert_eq!(system.proficiency_bonus(1), 0);
        assert_eq!(system.proficiency_bonus(2), 1);
        assert_eq!(system.proficiency_bonus(11), 5);
        assert_eq!(system.proficiency_bonus(30), 15);
        assert_eq!(system.proficiency_bonus(-2), 0);
    }

    #[test]
    fn trained_skill_adds_five_and_ignores_expertise() {
        let system = Dnd4eSystem::new();
        // 16 -> +3, level 6 -> +3
        assert_eq!(system.skill_total(16, false, false, 3), 6);
        assert_eq!(system.skill_total(16, true, false, 3), 11);
        assert_eq!(system.skill_total(16, true, true, 3), 11);
    }
}
