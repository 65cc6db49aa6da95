//! Aggregate roots - domain objects that own their related data
//!
//! Each aggregate:
//! - Has a unique identity
//! - Owns all its constituent parts (enforced by Rust ownership)
//! - Exposes behavior through methods, not public fields
//! - Reports what a mutation did through its return value
//!
//! A character sheet and an adventure are each stored as one JSON document,
//! so an aggregate is also the unit of persistence.

pub mod adventure;
pub mod player_character;

pub use adventure::Adventure;
pub use player_character::{LevelChange, PlayerCharacter, DEFAULT_LEVEL, MAX_TABS};
