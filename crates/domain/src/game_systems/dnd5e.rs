//! D&D 5th Edition game system implementation.
//!
//! The free functions are the canonical formulas; `Dnd5eSystem` exposes them
//! through the `CalculationEngine` trait.

use super::traits::{CalculationEngine, GameSystem, SkillDefinition};
use super::GameSystemKind;

/// Proficiency bonus used when a sheet has none stored.
pub const DEFAULT_PROFICIENCY_BONUS: i32 = 2;

/// Ability score used when a sheet has none stored.
pub const DEFAULT_ABILITY_SCORE: i32 = 10;

const ABILITIES: [&str; 6] = ["str", "dex", "con", "int", "wis", "cha"];

const SKILLS: [SkillDefinition; 18] = [
    SkillDefinition::new("Acrobatics", "dex"),
    SkillDefinition::new("Animal Handling", "wis"),
    SkillDefinition::new("Arcana", "int"),
    SkillDefinition::new("Athletics", "str"),
    SkillDefinition::new("Deception", "cha"),
    SkillDefinition::new("History", "int"),
    SkillDefinition::new("Insight", "wis"),
    SkillDefinition::new("Intimidation", "cha"),
    SkillDefinition::new("Investigation", "int"),
    SkillDefinition::new("Medicine", "wis"),
    SkillDefinition::new("Nature", "int"),
    SkillDefinition::new("Perception", "wis"),
    SkillDefinition::new("Performance", "cha"),
    SkillDefinition::new("Persuasion", "cha"),
    SkillDefinition::new("Religion", "int"),
    SkillDefinition::new("Sleight of Hand", "dex"),
    SkillDefinition::new("Stealth", "dex"),
    SkillDefinition::new("Survival", "wis"),
];

/// `floor((score - 10) / 2)` over the whole integer domain.
pub fn modifier(score: i32) -> i32 {
    // `/` truncates toward zero; floor division needs div_euclid for odd negatives.
    // Widened so `score - 10` cannot overflow; the half always fits back in i32.
    ((i64::from(score) - 10).div_euclid(2)) as i32
}

pub fn saving_throw(score: i32, has_proficiency: bool, proficiency_bonus: i32) -> i32 {
    modifier(score).saturating_add(if has_proficiency { proficiency_bonus } else { 0 })
}

/// Expertise doubles the bonus and takes precedence over plain proficiency.
pub fn skill_total(
    score: i32,
    has_proficiency: bool,
    has_expertise: bool,
    proficiency_bonus: i32,
) -> i32 {
    let bonus = if has_expertise {
        proficiency_bonus.saturating_mul(2)
    } else if has_proficiency {
        proficiency_bonus
    } else {
        0
    };
    modifier(score).saturating_add(bonus)
}

/// Proficiency bonus breakpoints: 1-4 → 2, 5-8 → 3, 9-12 → 4, 13-16 → 5, 17+ → 6.
///
/// Levels at or below zero fall back to 2.
pub fn proficiency_bonus_from_level(level: i32) -> i32 {
    match level {
        i32::MIN..=4 => 2,
        5..=8 => 3,
        9..=12 => 4,
        13..=16 => 5,
        _ => 6,
    }
}

/// D&D 5th Edition game system.
pub struct Dnd5eSystem;

impl Default for Dnd5eSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Dnd5eSystem {
    pub const fn new() -> Self {
        Self
    }
}

impl GameSystem for Dnd5eSystem {
    fn kind(&self) -> GameSystemKind {
        GameSystemKind::Dnd5e
    }

    fn display_name(&self) -> &str {
        "D&D 5th Edition"
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
        20
    }
}

impl CalculationEngine for Dnd5eSystem {
    fn ability_modifier(&self, score: i32) -> i32 {
        modifier(score)
    }

    fn proficiency_bonus(&self, level: i32) -> i32 {
        proficiency_bonus_from_level(level)
    }

    fn saving_throw(&self, score: i32, proficient: bool, proficiency_bonus: i32) -> i32 {
        saving_throw(score, proficient, proficiency_bonus)
    }

    fn skill_total(
        &self,
        score: i32,
        proficient: bool,
        expertise: bool,
        proficiency_bonus: i32,
    ) -> i32 {
        skill_total(score, proficient, expertise, proficiency_bonus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ability_modifier_calculation() {
        assert_eq!(modifier(1), -5);
        assert_eq!(modifier(8), -1);
        assert_eq!(modifier(9), -1);
        assert_eq!(modifier(10), 0);
        assert_eq!(modifier(11), 0);
        assert_eq!(modifier(15), 2);
        assert_eq!(modifier(20), 5);
        assert_eq!(modifier(30), 10);
    }

    #[test]
    fn ability_modifier_is_floor_division_everywhere() {
        for score in -40..=60 {
            let expected = ((score - 10) as f64 / 2.0).floor() as i32;
            assert_eq!(modifier(score), expected, "score {}", score);
        }
    }

    #[test]
    fn extreme_scores_do_not_overflow() {
        assert_eq!(modifier(i32::MIN), -1_073_741_829);
        assert_eq!(modifier(i32::MAX), 1_073_741_818);
        assert_eq!(skill_total(i32::MAX, true, true, i32::MAX), i32::MAX);
        assert_eq!(saving_throw(i32::MIN, true, i32::MIN), i32::MIN);
    }

    #[test]
    fn proficiency_bonus_progression() {
        assert_eq!(proficiency_bonus_from_level(1), 2);
        assert_eq!(proficiency_bonus_from_level(4), 2);
        assert_eq!(proficiency_bonus_from_level(5), 3);
        assert_eq!(proficiency_bonus_from_level(8), 3);
        assert_eq!(proficiency_bonus_from_level(9), 4);
        assert_eq!(proficiency_bonus_from_level(12), 4);
        assert_eq!(proficiency_bonus_from_level(13), 5);
        assert_eq!(proficiency_bonus_from_level(16), 5);
        assert_eq!(proficiency_bonus_from_level(17), 6);
        assert_eq!(proficiency_bonus_from_level(20), 6);
    }

    #[test]
    fn proficiency_bonus_falls_back_for_non_positive_levels() {
        assert_eq!(proficiency_bonus_from_level(0), 2);
        assert_eq!(proficiency_bonus_from_level(-3), 2);
    }

    #[test]
    fn proficiency_bonus_never_decreases() {
        let mut previous = proficiency_bonus_from_level(-5);
        for level in -4..=30 {
            let current = proficiency_bonus_from_level(level);
            assert!(current >= previous, "dropped at level {}", level);
            previous = current;
        }
    }

    #[test]
    fn saving_throw_adds_bonus_only_when_proficient() {
        assert_eq!(saving_throw(14, false, 3), 2);
        assert_eq!(saving_throw(14, true, 3), 5);
        assert_eq!(saving_throw(7, true, 2), 0);
    }

    #[test]
    fn skill_total_precedence() {
        assert_eq!(skill_total(16, false, false, 3), 3);
        assert_eq!(skill_total(16, true, false, 3), 6);
        assert_eq!(skill_total(16, true, true, 3), 9);
        // Expertise alone still doubles; callers own the invariant
        assert_eq!(skill_total(16, false, true, 3), 9);
    }

    #[test]
    fn expertise_never_below_proficiency() {
        for score in 1..=30 {
            for bonus in 1..=6 {
                assert!(
                    skill_total(score, true, true, bonus) >= skill_total(score, true, false, bonus)
                );
            }
        }
    }

    #[test]
    fn engine_delegates_to_formulas() {
        let system = Dnd5eSystem::new();
        let engine = system.calculation_engine();
        assert_eq!(engine.ability_modifier(8), -1);
        assert_eq!(engine.proficiency_bonus(9), 4);
        assert_eq!(engine.skill_total(12, true, false, 4), 5);
        assert_eq!(system.skills().len(), 18);
        assert!(system
            .skills()
            .iter()
            .all(|skill| system.abilities().contains(&skill.ability)));
    }
}
