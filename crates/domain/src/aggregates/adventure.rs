//! Adventure aggregate - a game master's campaign notebook
//!
//! Owns the journal and the combat initiative tracker. Only a user whose role
//! can run adventures may create one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{Combatant, InitiativeTracker, JournalEntry, User};
use crate::error::DomainError;
use crate::game_systems::GameSystemKind;
use crate::ids::{AdventureId, CombatantId, JournalEntryId, UserId};
use crate::value_objects::{AdventureName, JournalTitle};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Adventure {
    id: AdventureId,
    name: AdventureName,
    #[serde(default)]
    description: String,
    game_system: GameSystemKind,
    owner_id: UserId,
    /// Newest first.
    #[serde(default)]
    journal: Vec<JournalEntry>,
    #[serde(default)]
    initiative: InitiativeTracker,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Adventure {
    /// # Errors
    ///
    /// Returns `Constraint` when `owner` is not a game master.
    pub fn new(
        owner: &User,
        name: AdventureName,
        game_system: GameSystemKind,
        now: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if !owner.role.can_run_adventures() {
            return Err(DomainError::constraint(format!(
                "User {} is not a game master",
                owner.id
            )));
        }
        Ok(Self {
            id: AdventureId::new(),
            name,
            description: String::new(),
            game_system,
            owner_id: owner.id,
            journal: Vec::new(),
            initiative: InitiativeTracker::new(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> AdventureId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &AdventureName {
        &self.name
    }

    #[inline]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[inline]
    pub fn game_system(&self) -> GameSystemKind {
        self.game_system
    }

    #[inline]
    pub fn owner_id(&self) -> UserId {
        self.owner_id
    }

    /// Journal entries, newest first.
    #[inline]
    pub fn journal(&self) -> &[JournalEntry] {
        &self.journal
    }

    #[inline]
    pub fn initiative(&self) -> &InitiativeTracker {
        &self.initiative
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[inline]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }

    // =========================================================================
    // Journal
    // =========================================================================

    pub fn add_journal_entry(
        &mut self,
        title: JournalTitle,
        body: impl Into<String>,
        now: DateTime<Utc>,
    ) -> JournalEntryId {
        let entry = JournalEntry::new(title, body, now);
        let id = entry.id;
        self.journal.push(entry);
        self.sort_journal();
        self.touch(now);
        id
    }

    pub fn update_journal_entry(
        &mut self,
        id: JournalEntryId,
        title: Option<JournalTitle>,
        body: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<&JournalEntry, DomainError> {
        let index = self.journal_index(id)?;
        self.journal[index].edit(title, body, now);
        self.touch(now);
        Ok(&self.journal[index])
    }

    pub fn remove_journal_entry(
        &mut self,
        id: JournalEntryId,
        now: DateTime<Utc>,
    ) -> Result<JournalEntry, DomainError> {
        let index = self.journal_index(id)?;
        let removed = self.journal.remove(index);
        self.touch(now);
        Ok(removed)
    }

    // =========================================================================
    // Initiative
    // =========================================================================

    pub fn add_combatant(&mut self, combatant: Combatant, now: DateTime<Utc>) -> CombatantId {
        let id = self.initiative.add(combatant);
        self.touch(now);
        id
    }

    pub fn remove_combatant(
        &mut self,
        id: CombatantId,
        now: DateTime<Utc>,
    ) -> Result<Combatant, DomainError> {
        let removed = self.initiative.remove(id)?;
        self.touch(now);
        Ok(removed)
    }

    pub fn next_turn(&mut self, now: DateTime<Utc>) -> Option<&Combatant> {
        self.touch(now);
        self.initiative.next_turn()
    }

    pub fn previous_turn(&mut self, now: DateTime<Utc>) -> Option<&Combatant> {
        self.touch(now);
        self.initiative.previous_turn()
    }

    pub fn reset_initiative(&mut self, now: DateTime<Utc>) {
        self.initiative.reset();
        self.touch(now);
    }

    pub fn end_combat(&mut self, now: DateTime<Utc>) {
        self.initiative.clear();
        self.touch(now);
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    fn journal_index(&self, id: JournalEntryId) -> Result<usize, DomainError> {
        self.journal
            .iter()
            .position(|entry| entry.id == id)
            .ok_or_else(|| DomainError::not_found("JournalEntry", id.to_string()))
    }

    fn sort_journal(&mut self) {
        self.journal
            .sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }
}
