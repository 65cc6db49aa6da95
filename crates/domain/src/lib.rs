//! SheetKeeper domain: character sheets, game-system rules, dashboard layout,
//! and the game master's adventure notebook.
//!
//! Everything here is synchronous and free of I/O. Time and randomness come in
//! as arguments so the engine can pin them in tests.

pub mod aggregates;
pub mod entities;
pub mod error;
pub mod game_systems;
pub mod ids;
pub mod layout;
pub mod sheet_view;
pub mod templates;
pub mod value_objects;

pub use aggregates::{Adventure, LevelChange, PlayerCharacter, DEFAULT_LEVEL, MAX_TABS};

// Re-export all entities (explicit list in entities/mod.rs)
pub use entities::{
    Combatant, DashboardTab, DataItem, DataItemType, HitPoints, InitiativeTracker, JournalEntry,
    ResourceCounter, SkillEntry, User, UserRole, DEFAULT_TAB_ICON,
};

pub use error::DomainError;

// Re-export game system traits and types
pub use game_systems::{
    CalculationEngine, Co2System, Dnd4eSystem, Dnd5eSystem, GameSystem, GameSystemKind,
    GameSystemRegistry, SkillDefinition,
};

pub use ids::{
    AdventureId, CharacterId, CombatantId, DataItemId, JournalEntryId, TabId, UserId,
};

pub use sheet_view::{AbilityLine, SheetView, SkillLine};
pub use templates::starter_character;

pub use value_objects::{
    AdventureName, CharacterName, ColumnWidth, ItemName, ItemValue, JournalTitle, Metadata,
    Placement, PlacementScope, TabName,
};
