//! Game system traits for system-specific sheet mechanics.
//!
//! These traits define the interface for system-specific calculations,
//! allowing different TTRPGs to implement their own rules while sharing
//! a common API.

use super::GameSystemKind;

/// Core trait all game systems must implement.
///
/// This trait provides system identification, the ability/skill vocabulary
/// used by sheet templates, and access to the calculation engine.
pub trait GameSystem: Send + Sync {
    fn kind(&self) -> GameSystemKind;

    /// Unique identifier for this game system (e.g., "dnd5e", "co2").
    fn system_id(&self) -> &str {
        self.kind().as_str()
    }

    /// Human-readable display name (e.g., "D&D 5th Edition").
    fn display_name(&self) -> &str;

    /// Get the calculation engine for this system.
    fn calculation_engine(&self) -> &dyn CalculationEngine;

    /// Short ability keys in sheet order (e.g., "str", "dex").
    fn abilities(&self) -> &[&'static str];

    /// Skills and the ability each one keys off.
    fn skills(&self) -> &[SkillDefinition];

    /// Highest character level the system supports.
    fn max_level(&self) -> i32;
}

/// A skill and its governing ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillDefinition {
    pub name: &'static str,
    pub ability: &'static str,
}

impl SkillDefinition {
    pub const fn new(name: &'static str, ability: &'static str) -> Self {
        Self { name, ability }
    }
}

/// Calculation rules that vary per game system.
///
/// Every derived number on a sheet is computed through this trait from the
/// stored inputs; nothing it returns is persisted except the proficiency
/// bonus, which is synced explicitly when the level changes.
pub trait CalculationEngine: Send + Sync {
    /// Calculate ability modifier from score.
    fn ability_modifier(&self, score: i32) -> i32;

    /// Calculate the level-scaled bonus (proficiency bonus in D&D 5e).
    fn proficiency_bonus(&self, level: i32) -> i32;

    /// Calculate a saving throw.
    fn saving_throw(&self, score: i32, proficient: bool, proficiency_bonus: i32) -> i32 {
        self.ability_modifier(score).saturating_add(if proficient { proficiency_bonus } else { 0 })
    }

    /// Calculate a skill total.
    ///
    /// Callers are responsible for `proficient` being true whenever
    /// `expertise` is; the formula does not enforce it.
    fn skill_total(
        &self,
        score: i32,
        proficient: bool,
        expertise: bool,
        proficiency_bonus: i32,
    ) -> i32;
}
