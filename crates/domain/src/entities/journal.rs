use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::JournalEntryId;
use crate::value_objects::JournalTitle;

/// A game-master journal entry. The body is Markdown, stored verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: JournalEntryId,
    pub title: JournalTitle,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl JournalEntry {
    pub fn new(title: JournalTitle, body: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: JournalEntryId::new(),
            title,
            body: body.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn edit(
        &mut self,
        title: Option<JournalTitle>,
        body: Option<String>,
        now: DateTime<Utc>,
    ) {
        if let Some(title) = title {
            self.title = title;
        }
        if let Some(body) = body {
            self.body = body;
        }
        self.updated_at = now;
    }
}
