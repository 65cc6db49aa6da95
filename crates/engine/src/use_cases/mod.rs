//! Use cases - User story orchestration.
//!
//! Each module owns one area of the application. Use cases load a document
//! through a repository port, mutate it through its aggregate, and save it.

pub mod adventure;
pub mod character;
pub mod layout;
pub mod sheet;
pub mod users;

pub use adventure::{AdventureError, AdventureUseCases};
pub use character::{CharacterError, CharacterUseCases};
pub use layout::LayoutUseCases;
pub use sheet::{SheetError, SheetUseCases};
pub use users::{UserError, UserUseCases};
