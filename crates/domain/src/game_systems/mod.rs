//! Game system implementations for the supported TTRPGs.
//!
//! Each system implements the core traits defined in `traits.rs`.
//!
//! # Supported Systems
//!
//! - D&D 5th Edition (`dnd5e`)
//! - D&D 4th Edition (`dnd4e`)
//! - Chroniques Oubliées 2e (`co2`)

mod co2;
mod dnd4e;
pub mod dnd5e;
mod traits;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

pub use co2::Co2System;
pub use dnd4e::Dnd4eSystem;
pub use dnd5e::Dnd5eSystem;
pub use traits::{CalculationEngine, GameSystem, SkillDefinition};

/// The game system a character or adventure is played in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameSystemKind {
    Dnd5e,
    Dnd4e,
    Co2,
}

impl GameSystemKind {
    pub const ALL: [GameSystemKind; 3] =
        [GameSystemKind::Dnd5e, GameSystemKind::Dnd4e, GameSystemKind::Co2];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameSystemKind::Dnd5e => "dnd5e",
            GameSystemKind::Dnd4e => "dnd4e",
            GameSystemKind::Co2 => "co2",
        }
    }

    /// The built-in rules for this system.
    pub fn system(self) -> &'static dyn GameSystem {
        match self {
            GameSystemKind::Dnd5e => &Dnd5eSystem,
            GameSystemKind::Dnd4e => &Dnd4eSystem,
            GameSystemKind::Co2 => &Co2System,
        }
    }

    pub fn calculation_engine(self) -> &'static dyn CalculationEngine {
        match self {
            GameSystemKind::Dnd5e => &Dnd5eSystem,
            GameSystemKind::Dnd4e => &Dnd4eSystem,
            GameSystemKind::Co2 => &Co2System,
        }
    }
}

impl fmt::Display for GameSystemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameSystemKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dnd5e" | "5e" => Ok(GameSystemKind::Dnd5e),
            "dnd4e" | "4e" => Ok(GameSystemKind::Dnd4e),
            "co2" | "cof2" => Ok(GameSystemKind::Co2),
            other => Err(DomainError::parse(format!("Unknown game system: {}", other))),
        }
    }
}

/// Registry of available game systems.
pub struct GameSystemRegistry {
    systems: Vec<Arc<dyn GameSystem>>,
}

impl Default for GameSystemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSystemRegistry {
    /// Create a new registry with all built-in game systems.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(Dnd5eSystem::new()));
        registry.register(Arc::new(Dnd4eSystem::new()));
        registry.register(Arc::new(Co2System::new()));
        registry
    }

    /// Create an empty registry without built-in systems.
    pub fn empty() -> Self {
        Self {
            systems: Vec::new(),
        }
    }

    /// Register a game system.
    pub fn register(&mut self, system: Arc<dyn GameSystem>) {
        self.systems.push(system);
    }

    /// Get a game system by its ID.
    pub fn get(&self, system_id: &str) -> Option<Arc<dyn GameSystem>> {
        self.systems
            .iter()
            .find(|s| s.system_id() == system_id)
            .cloned()
    }

    /// List all registered system IDs.
    pub fn list_systems(&self) -> Vec<&str> {
        self.systems.iter().map(|s| s.system_id()).collect()
    }

    /// List all registered systems with their display names.
    pub fn list_systems_with_names(&self) -> Vec<(&str, &str)> {
        self.systems
            .iter()
            .map(|s| (s.system_id(), s.display_name()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_includes_all_systems() {
        let registry = GameSystemRegistry::new();
        let systems = registry.list_systems();
        assert_eq!(systems, vec!["dnd5e", "dnd4e", "co2"]);
    }

    #[test]
    fn empty_registry_has_no_systems() {
        let registry = GameSystemRegistry::empty();
        assert!(registry.list_systems().is_empty());
        assert!(registry.get("dnd5e").is_none());
    }

    #[test]
    fn registry_list_with_names() {
        let registry = GameSystemRegistry::new();
        let systems = registry.list_systems_with_names();
        assert!(systems.contains(&("dnd5e", "D&D 5th Edition")));
        assert!(systems.contains(&("co2", "Chroniques Oubliées 2e")));
    }

    #[test]
    fn kind_parses_and_displays() {
        for kind in GameSystemKind::ALL {
            let parsed: GameSystemKind = kind.to_string().parse().expect("round trip");
            assert_eq!(parsed, kind);
            assert_eq!(kind.system().kind(), kind);
        }
        assert!("pathfinder".parse::<GameSystemKind>().is_err());
    }

    #[test]
    fn kind_serializes_lowercase() {
        let json = serde_json::to_string(&GameSystemKind::Dnd5e).expect("serialize");
        assert_eq!(json, "\"dnd5e\"");
    }
}
