use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Relative width of a dashboard column, always within `1..=4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ColumnWidth(u8);

impl ColumnWidth {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 4;

    pub fn new(width: u8) -> Result<Self, DomainError> {
        if !(Self::MIN..=Self::MAX).contains(&width) {
            return Err(DomainError::validation(format!(
                "Column width must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                width
            )));
        }
        Ok(Self(width))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Next width in the 1 -> 2 -> 3 -> 4 -> 1 cycle.
    pub fn cycled(self) -> Self {
        if self.0 >= Self::MAX {
            Self(Self::MIN)
        } else {
            Self(self.0 + 1)
        }
    }
}

impl Default for ColumnWidth {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl TryFrom<u8> for ColumnWidth {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ColumnWidth> for u8 {
    fn from(width: ColumnWidth) -> u8 {
        width.0
    }
}
