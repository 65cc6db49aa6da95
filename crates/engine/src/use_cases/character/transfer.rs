//! Export document format for moving a character between installations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sheetkeeper_domain::PlayerCharacter;

use super::CharacterError;

/// The only format version this build reads and writes.
pub const EXPORT_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterExport {
    pub format_version: u32,
    pub exported_at: DateTime<Utc>,
    pub character: PlayerCharacter,
}

impl CharacterExport {
    pub fn new(character: PlayerCharacter, exported_at: DateTime<Utc>) -> Self {
        Self {
            format_version: EXPORT_FORMAT_VERSION,
            exported_at,
            character,
        }
    }

    /// Parse an uploaded document.
    ///
    /// The version is checked before the character body is decoded, so a
    /// newer format is reported as unsupported rather than as malformed.
    pub fn parse(document: serde_json::Value) -> Result<Self, CharacterError> {
        let version = document
            .get("formatVersion")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| CharacterError::InvalidDocument("missing formatVersion".into()))?;
        let version = u32::try_from(version).unwrap_or(u32::MAX);
        if version != EXPORT_FORMAT_VERSION {
            return Err(CharacterError::UnsupportedFormat(version));
        }

        let export: CharacterExport = serde_json::from_value(document)
            .map_err(|e| CharacterError::InvalidDocument(e.to_string()))?;
        export.character.validate()?;
        Ok(export)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn other_versions_are_unsupported() {
        let result = CharacterExport::parse(json!({ "formatVersion": 2, "character": {} }));
        assert!(matches!(result, Err(CharacterError::UnsupportedFormat(2))));
    }

    #[test]
    fn missing_version_is_invalid() {
        let result = CharacterExport::parse(json!({ "character": {} }));
        assert!(matches!(result, Err(CharacterError::InvalidDocument(_))));
    }

    #[test]
    fn malformed_character_is_invalid() {
        let result = CharacterExport::parse(json!({
            "formatVersion": 1,
            "exportedAt": "2025-01-01T00:00:00Z",
            "character": { "name": "" }
        }));
        assert!(matches!(result, Err(CharacterError::InvalidDocument(_))));
    }
}
