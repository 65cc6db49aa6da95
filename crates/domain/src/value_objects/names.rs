//! Validated name newtypes for domain entities
//!
//! These newtypes ensure that names are valid by construction:
//! - Non-empty
//! - Within length limits
//! - Trimmed of leading/trailing whitespace

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Maximum length for character, item, and adventure names
const MAX_NAME_LENGTH: usize = 200;

/// Tab labels share a narrow tab bar
const MAX_TAB_NAME_LENGTH: usize = 40;

macro_rules! define_name {
    ($(#[$meta:meta])* $name:ident, $label:literal, $max:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Create a new validated name.
            ///
            /// # Errors
            ///
            /// Returns `DomainError::Validation` if the name is empty after
            /// trimming or exceeds the length limit.
            pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
                let name = name.into();
                let trimmed = name.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::validation(concat!($label, " cannot be empty")));
                }
                if trimmed.chars().count() > $max {
                    return Err(DomainError::validation(format!(
                        "{} cannot exceed {} characters",
                        $label, $max
                    )));
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Returns the name as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = DomainError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(name: $name) -> String {
                name.0
            }
        }
    };
}

define_name!(
    /// A validated character name (non-empty, <=200 chars, trimmed)
    CharacterName,
    "Character name",
    MAX_NAME_LENGTH
);

define_name!(
    /// A validated data item label
    ItemName,
    "Item name",
    MAX_NAME_LENGTH
);

define_name!(
    /// A validated tab label (non-empty, <=40 chars, trimmed)
    TabName,
    "Tab name",
    MAX_TAB_NAME_LENGTH
);

define_name!(
    /// A validated adventure title
    AdventureName,
    "Adventure name",
    MAX_NAME_LENGTH
);

define_name!(
    /// A validated journal entry title
    JournalTitle,
    "Journal title",
    MAX_NAME_LENGTH
);

impl TabName {
    /// The tab every new character starts with.
    pub fn main() -> Self {
        Self("Main".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed() {
        let name = CharacterName::new("  Tordek  ").expect("valid name");
        assert_eq!(name.as_str(), "Tordek");
    }

    #[test]
    fn empty_names_are_rejected() {
        let err = TabName::new("   ").expect_err("blank name");
        assert_eq!(err, DomainError::validation("Tab name cannot be empty"));
    }

    #[test]
    fn long_tab_names_are_rejected() {
        let err = TabName::new("x".repeat(41)).expect_err("too long");
        assert!(err.to_string().contains("40"));
        assert!(TabName::new("x".repeat(40)).is_ok());
    }

    #[test]
    fn main_tab_name_passes_validation() {
        assert_eq!(TabName::new("Main").expect("valid"), TabName::main());
    }

    #[test]
    fn journal_title_errors_name_the_title() {
        let err = JournalTitle::new("").expect_err("blank title");
        assert_eq!(err.to_string(), "Validation failed: Journal title cannot be empty");
    }

    #[test]
    fn deserialization_validates() {
        let ok: ItemName = serde_json::from_str("\"Longsword\"").expect("valid");
        assert_eq!(ok.as_str(), "Longsword");
        assert!(serde_json::from_str::<ItemName>("\"\"").is_err());
    }
}
