//! Domain entities - Core business objects with identity

mod data_item;
mod initiative;
mod journal;
mod tab;
mod user;

pub use data_item::{
    DataItem, DataItemType, HitPoints, ResourceCounter, SkillEntry, META_ABILITY, META_BONUS,
    META_CURRENT_HP, META_MAX, META_MAX_HP, META_OPTIONS, META_SAVING_THROW, META_SAVING_THROWS,
    META_TEMP_HP,
};
pub use initiative::{Combatant, InitiativeTracker};
pub use journal::JournalEntry;
pub use tab::{DashboardTab, DEFAULT_TAB_ICON};
pub use user::{User, UserRole};
