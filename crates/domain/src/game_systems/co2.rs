//! Chroniques Oubliées 2e game system implementation.

use super::traits::{CalculationEngine, GameSystem, SkillDefinition};
use super::GameSystemKind;

const TRAINED_BONUS: i32 = 2;

const ABILITIES: [&str; 7] = ["agi", "con", "for", "per", "cha", "int", "vol"];

/// Chroniques Oubliées 2e.
///
/// Characteristics are stored directly as modifiers, there is no level-scaled
/// proficiency bonus, and sheets carry no fixed skill list.
pub struct Co2System;

impl Co2System {
    pub const fn new() -> Self {
        Self
    }
}

impl Default for Co2System {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSystem for Co2System {
    fn kind(&self) -> GameSystemKind {
        GameSystemKind::Co2
    }

    fn display_name(&self) -> &str {
        "Chroniques Oubliées 2e"
    }

    fn calculation_engine(&self) -> &dyn CalculationEngine {
        self
    }

    fn abilities(&self) -> &[&'static str] {
        &ABILITIES
    }

    fn skills(&self) -> &[SkillDefinition] {
        &[]
    }

    fn max_level(&self) -> i32 {
        20
    }
}

impl CalculationEngine for Co2System {
    fn ability_modifier(&self, score: i32) -> i32 {
        score
    }

    fn proficiency_bonus(&self, _level: i32) -> i32 {
        0
    }

    fn skill_total(
        &self,
        score: i32,
        proficient: bool,
        _expertise: bool,
        _proficiency_bonus: i32,
    ) -> i32 {
        score.saturating_add(if proficient { TRAINED_BONUS } else { 0 })
    }
}
