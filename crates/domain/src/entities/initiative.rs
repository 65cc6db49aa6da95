//! Combat initiative tracking for game masters.
//!
//! Combatants are kept sorted by descending initiative; ties keep the order in
//! which combatants joined. The tracker remembers whose turn it is by index and
//! keeps pointing at the same combatant when others join or leave.

use serde::{Deserialize, Serialize};

use crate::entities::HitPoints;
use crate::error::DomainError;
use crate::ids::{CharacterId, CombatantId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Combatant {
    pub id: CombatantId,
    pub name: String,
    pub initiative: i32,
    /// Set when the combatant is a player character tracked in the store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_id: Option<CharacterId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hit_points: Option<HitPoints>,
}

impl Combatant {
    pub fn new(name: impl Into<String>, initiative: i32) -> Self {
        Self {
            id: CombatantId::new(),
            name: name.into(),
            initiative,
            character_id: None,
            hit_points: None,
        }
    }

    /// Roll initiative with an injected d20 roller.
    pub fn rolled(
        name: impl Into<String>,
        modifier: i32,
        roll_d20: impl FnOnce() -> i32,
    ) -> Self {
        Self::new(name, roll_d20().saturating_add(modifier))
    }

    pub fn with_character(mut self, character_id: CharacterId) -> Self {
        self.character_id = Some(character_id);
        self
    }

    pub fn with_hit_points(mut self, hit_points: HitPoints) -> Self {
        self.hit_points = Some(hit_points);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiativeTracker {
    combatants: Vec<Combatant>,
    round: u32,
    active: usize,
}

impl Default for InitiativeTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl InitiativeTracker {
    pub fn new() -> Self {
        Self {
            combatants: Vec::new(),
            round: 1,
            active: 0,
        }
    }

    pub fn combatants(&self) -> &[Combatant] {
        &self.combatants
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn active_combatant(&self) -> Option<&Combatant> {
        self.combatants.get(self.active)
    }

    /// Insert after every combatant with an equal or higher initiative.
    pub fn add(&mut self, combatant: Combatant) -> CombatantId {
        let id = combatant.id;
        let index = self
            .combatants
            .iter()
            .position(|c| c.initiative < combatant.initiative)
            .unwrap_or(self.combatants.len());
        let had_combatants = !self.combatants.is_empty();
        self.combatants.insert(index, combatant);
        if had_combatants && index <= self.active {
            self.active += 1;
        }
        id
    }

    pub fn remove(&mut self, id: CombatantId) -> Result<Combatant, DomainError> {
        let index = self
            .combatants
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| DomainError::not_found("Combatant", id.to_string()))?;
        let removed = self.combatants.remove(index);
        if index < self.active {
            self.active -= 1;
        }
        if self.active >= self.combatants.len() {
            self.active = 0;
        }
        Ok(removed)
    }

    /// Change a combatant's initiative and re-sort.
    pub fn set_initiative(&mut self, id: CombatantId, initiative: i32) -> Result<(), DomainError> {
        let combatant = self
            .combatants
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| DomainError::not_found("Combatant", id.to_string()))?;
        combatant.initiative = initiative;
        self.sort();
        Ok(())
    }

    /// Stable sort by descending initiative, keeping the active combatant.
    pub fn sort(&mut self) {
        let active_id = self.active_combatant().map(|c| c.id);
        self.combatants
            .sort_by(|a, b| b.initiative.cmp(&a.initiative));
        if let Some(active_id) = active_id {
            self.active = self
                .combatants
                .iter()
                .position(|c| c.id == active_id)
                .unwrap_or(0);
        }
    }

    /// Advance to the next combatant; wrapping past the end starts a new round.
    pub fn next_turn(&mut self) -> Option<&Combatant> {
        if self.combatants.is_empty() {
            return None;
        }
        self.active += 1;
        if self.active >= self.combatants.len() {
            self.active = 0;
            self.round += 1;
        }
        self.active_combatant()
    }

    /// Step back one turn; the round never drops below 1.
    pub fn previous_turn(&mut self) -> Option<&Combatant> {
        if self.combatants.is_empty() {
            return None;
        }
        if self.active == 0 {
            self.active = self.combatants.len() - 1;
            self.round = self.round.saturating_sub(1).max(1);
        } else {
            self.active -= 1;
        }
        self.active_combatant()
    }

    /// Back to round 1, first combatant. Combatants are kept.
    pub fn reset(&mut self) {
        self.round = 1;
        self.active = 0;
    }

    pub fn clear(&mut self) {
        self.combatants.clear();
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tracker: &InitiativeTracker) -> Vec<&str> {
        tracker.combatants().iter().map(|c| c.name.as_str()).collect()
    }

    fn tracker_with(entries: &[(&str, i32)]) -> InitiativeTracker {
        let mut tracker = InitiativeTracker::new();
        for (name, initiative) in entries {
            tracker.add(Combatant::new(*name, *initiative));
        }
        tracker
    }

    #[test]
    fn combatants_sorted_descending_with_stable_ties() {
        let tracker = tracker_with(&[("Goblin", 12), ("Aria", 18), ("Wolf", 12), ("Bram", 3)]);
        assert_eq!(names(&tracker), vec!["Aria", "Goblin", "Wolf", "Bram"]);
    }

    #[test]
    fn next_turn_wraps_and_increments_round() {
        let mut tracker = tracker_with(&[("Aria", 18), ("Goblin", 12)]);
        assert_eq!(tracker.active_combatant().map(|c| c.name.as_str()), Some("Aria"));
        assert_eq!(tracker.next_turn().map(|c| c.name.as_str()), Some("Goblin"));
        assert_eq!(tracker.round(), 1);
        assert_eq!(tracker.next_turn().map(|c| c.name.as_str()), Some("Aria"));
        assert_eq!(tracker.round(), 2);
    }

    #[test]
    fn previous_turn_never_goes_below_round_one() {
        let mut tracker = tracker_with(&[("Aria", 18), ("Goblin", 12)]);
        assert_eq!(tracker.previous_turn().map(|c| c.name.as_str()), Some("Goblin"));
        assert_eq!(tracker.round(), 1);
    }

    #[test]
    fn joining_combatant_does_not_steal_the_turn() {
        let mut tracker = tracker_with(&[("Aria", 18), ("Goblin", 12)]);
        tracker.next_turn();
        tracker.add(Combatant::new("Ogre", 20));
        assert_eq!(tracker.active_combatant().map(|c| c.name.as_str()), Some("Goblin"));
    }

    #[test]
    fn removing_active_last_combatant_wraps_to_first() {
        let mut tracker = tracker_with(&[("Aria", 18), ("Goblin", 12)]);
        tracker.next_turn();
        let goblin = tracker.combatants()[1].id;
        tracker.remove(goblin).expect("present");
        assert_eq!(tracker.active_combatant().map(|c| c.name.as_str()), Some("Aria"));
        assert!(tracker.remove(goblin).is_err());
    }

    #[test]
    fn rolled_initiative_uses_injected_die() {
        let combatant = Combatant::rolled("Aria", 3, || 14);
        assert_eq!(combatant.initiative, 17);
    }

    #[test]
    fn huge_modifiers_saturate() {
        let combatant = Combatant::rolled("Tarrasque", i32::MAX, || 20);
        assert_eq!(combatant.initiative, i32::MAX);
    }

    #[test]
    fn empty_tracker_has_no_turns() {
        let mut tracker = InitiativeTracker::new();
        assert!(tracker.next_turn().is_none());
        assert!(tracker.previous_turn().is_none());
        assert_eq!(tracker.round(), 1);
    }

    #[test]
    fn changing_initiative_resorts_and_keeps_active() {
        let mut tracker = tracker_with(&[("Aria", 18), ("Goblin", 12), ("Wolf", 5)]);
        let wolf = tracker.combatants()[2].id;
        tracker.set_initiative(wolf, 25).expect("present");
        assert_eq!(names(&tracker), vec!["Wolf", "Aria", "Goblin"]);
        assert_eq!(tracker.active_combatant().map(|c| c.name.as_str()), Some("Aria"));
    }
}
