//! Value objects - Immutable objects defined by their attributes

mod column_width;
mod item_value;
mod names;
mod placement;

pub use column_width::ColumnWidth;
pub use item_value::{ItemValue, Metadata};
pub use names::{AdventureName, CharacterName, ItemName, JournalTitle, TabName};
pub use placement::{Placement, PlacementScope};
