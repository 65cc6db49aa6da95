//! DataItem entity - a typed value shown on a character sheet
//!
//! Items carry a loosely typed `value` plus a metadata bag whose keys depend
//! on the item type. The typed views in this module (`HitPoints`,
//! `SkillEntry`, `ResourceCounter`) read and write those keys so callers
//! never touch the raw bag for the common item types.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::DataItemId;
use crate::value_objects::{ItemName, ItemValue, Metadata, Placement};

// Metadata keys
pub const META_ABILITY: &str = "ability";
pub const META_SAVING_THROW: &str = "savingThrow";
pub const META_SAVING_THROWS: &str = "savingThrows";
pub const META_BONUS: &str = "bonus";
pub const META_MAX_HP: &str = "maxHp";
pub const META_CURRENT_HP: &str = "currentHp";
pub const META_TEMP_HP: &str = "tempHp";
pub const META_MAX: &str = "max";
pub const META_OPTIONS: &str = "options";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataItemType {
    Text,
    Numeric,
    Select,
    Attribute,
    AttributesGroup,
    ProficiencyBonus,
    Level,
    SkillsGroup,
    Hp,
    Attack,
    Equipment,
    ResourceCounter,
}

impl DataItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DataItemType::Text => "text",
            DataItemType::Numeric => "numeric",
            DataItemType::Select => "select",
            DataItemType::Attribute => "attribute",
            DataItemType::AttributesGroup => "attributes-group",
            DataItemType::ProficiencyBonus => "proficiency-bonus",
            DataItemType::Level => "level",
            DataItemType::SkillsGroup => "skills-group",
            DataItemType::Hp => "hp",
            DataItemType::Attack => "attack",
            DataItemType::Equipment => "equipment",
            DataItemType::ResourceCounter => "resource-counter",
        }
    }

    /// Value a freshly created item of this type starts with.
    pub fn default_value(&self) -> ItemValue {
        match self {
            DataItemType::Text | DataItemType::Select | DataItemType::Attack => {
                ItemValue::String(String::new())
            }
            DataItemType::Numeric | DataItemType::Hp | DataItemType::ResourceCounter => {
                ItemValue::Integer(0)
            }
            DataItemType::Attribute => ItemValue::Integer(10),
            DataItemType::ProficiencyBonus => ItemValue::Integer(2),
            DataItemType::Level => ItemValue::Integer(1),
            DataItemType::AttributesGroup => ItemValue::Object(BTreeMap::new()),
            DataItemType::SkillsGroup | DataItemType::Equipment => ItemValue::List(Vec::new()),
        }
    }
}

impl fmt::Display for DataItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DataItemType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let item_type = match s {
            "text" => DataItemType::Text,
            "numeric" => DataItemType::Numeric,
            "select" => DataItemType::Select,
            "attribute" => DataItemType::Attribute,
            "attributes-group" => DataItemType::AttributesGroup,
            "proficiency-bonus" => DataItemType::ProficiencyBonus,
            "level" => DataItemType::Level,
            "skills-group" => DataItemType::SkillsGroup,
            "hp" => DataItemType::Hp,
            "attack" => DataItemType::Attack,
            "equipment" => DataItemType::Equipment,
            "resource-counter" => DataItemType::ResourceCounter,
            other => return Err(DomainError::parse(format!("Unknown item type: {}", other))),
        };
        Ok(item_type)
    }
}

/// A typed value attached to a character.
///
/// Simple data struct: the character aggregate owns placement invariants,
/// so fields are public.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataItem {
    pub id: DataItemId,
    pub name: ItemName,
    #[serde(rename = "type")]
    pub item_type: DataItemType,
    #[serde(default)]
    pub value: ItemValue,
    pub placement: Placement,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: Metadata,
}

impl DataItem {
    pub fn new(name: ItemName, item_type: DataItemType, placement: Placement) -> Self {
        Self {
            id: DataItemId::new(),
            name,
            item_type,
            value: item_type.default_value(),
            placement,
            metadata: Metadata::new(),
        }
    }

    pub fn with_value(mut self, value: impl Into<ItemValue>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_metadata(mut self, key: &str, value: impl Into<ItemValue>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    pub fn metadata_i32(&self, key: &str) -> Option<i32> {
        self.metadata.get(key).and_then(ItemValue::as_i32)
    }

    /// Missing or non-boolean flags read as false.
    pub fn metadata_flag(&self, key: &str) -> bool {
        self.metadata
            .get(key)
            .and_then(ItemValue::as_bool)
            .unwrap_or(false)
    }

    pub fn set_metadata(&mut self, key: &str, value: impl Into<ItemValue>) {
        self.metadata.insert(key.to_string(), value.into());
    }

    // =========================================================================
    // Hit points
    // =========================================================================

    /// Hit point view of an `hp` item.
    pub fn hit_points(&self) -> Option<HitPoints> {
        if self.item_type != DataItemType::Hp {
            return None;
        }
        let max = self.metadata_i32(META_MAX_HP).unwrap_or(0);
        let current = self
            .metadata_i32(META_CURRENT_HP)
            .or_else(|| self.value.as_i32())
            .unwrap_or(max);
        let temporary = self.metadata_i32(META_TEMP_HP).unwrap_or(0);
        Some(HitPoints {
            current,
            max,
            temporary,
        })
    }

    /// Write hit points back; the item value mirrors current HP.
    pub fn set_hit_points(&mut self, hp: HitPoints) {
        self.value = ItemValue::Integer(hp.current);
        self.set_metadata(META_CURRENT_HP, hp.current);
        self.set_metadata(META_MAX_HP, hp.max);
        self.set_metadata(META_TEMP_HP, hp.temporary);
    }

    // =========================================================================
    // Skills
    // =========================================================================

    /// Skill rows of a `skills-group` item. Malformed rows are skipped.
    pub fn skills(&self) -> Vec<SkillEntry> {
        if self.item_type != DataItemType::SkillsGroup {
            return Vec::new();
        }
        self.value
            .as_list()
            .unwrap_or_default()
            .iter()
            .filter_map(SkillEntry::from_value)
            .collect()
    }

    pub fn set_skills(&mut self, skills: &[SkillEntry]) {
        self.value = ItemValue::List(skills.iter().map(SkillEntry::to_value).collect());
    }

    // =========================================================================
    // Resource counters
    // =========================================================================

    pub fn resource_counter(&self) -> Option<ResourceCounter> {
        if self.item_type != DataItemType::ResourceCounter {
            return None;
        }
        Some(ResourceCounter {
            current: self.value.as_i32().unwrap_or(0),
            max: self.metadata_i32(META_MAX),
        })
    }

    pub fn set_resource_counter(&mut self, counter: ResourceCounter) {
        self.value = ItemValue::Integer(counter.current);
        match counter.max {
            Some(max) => self.set_metadata(META_MAX, max),
            None => {
                self.metadata.remove(META_MAX);
            }
        }
    }
}

/// Hit point tracking for an `hp` item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HitPoints {
    pub current: i32,
    pub max: i32,
    pub temporary: i32,
}

impl HitPoints {
    pub fn new(max: i32) -> Self {
        Self {
            current: max,
            max,
            temporary: 0,
        }
    }

    /// Take damage, reducing temp HP first. Current HP never drops below 0.
    /// Returns the damage absorbed by temporary hit points.
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let amount = amount.max(0);
        let absorbed = self.temporary.min(amount);
        self.temporary -= absorbed;
        self.current = self.current.saturating_sub(amount - absorbed).max(0);
        absorbed
    }

    /// Heal HP (cannot exceed maximum). Returns the amount actually healed.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let old = self.current;
        self.current = self.current.saturating_add(amount.max(0)).min(self.max).max(old);
        self.current - old
    }

    /// Add temporary HP (doesn't stack, takes higher)
    pub fn add_temp_hp(&mut self, amount: i32) {
        self.temporary = self.temporary.max(amount);
    }

    pub fn is_down(&self) -> bool {
        self.current <= 0
    }
}

/// One row of a `skills-group` item.
///
/// The setters keep expertise implying proficiency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillEntry {
    pub name: String,
    pub ability: String,
    proficient: bool,
    expertise: bool,
}

impl SkillEntry {
    pub fn new(name: impl Into<String>, ability: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ability: ability.into(),
            proficient: false,
            expertise: false,
        }
    }

    pub fn proficient(&self) -> bool {
        self.proficient
    }

    pub fn expertise(&self) -> bool {
        self.expertise
    }

    /// Dropping proficiency also drops expertise.
    pub fn set_proficient(&mut self, proficient: bool) {
        self.proficient = proficient;
        if !proficient {
            self.expertise = false;
        }
    }

    /// Gaining expertise also grants proficiency.
    pub fn set_expertise(&mut self, expertise: bool) {
        self.expertise = expertise;
        if expertise {
            self.proficient = true;
        }
    }

    fn from_value(value: &ItemValue) -> Option<Self> {
        let name = value.get("name")?.as_str()?.to_string();
        let ability = value.get("ability")?.as_str()?.to_string();
        let flag = |key: &str| value.get(key).and_then(ItemValue::as_bool).unwrap_or(false);
        let mut entry = SkillEntry::new(name, ability);
        entry.set_proficient(flag("proficient"));
        entry.set_expertise(flag("expertise"));
        Some(entry)
    }

    fn to_value(&self) -> ItemValue {
        let mut map = BTreeMap::new();
        map.insert("name".to_string(), ItemValue::from(self.name.as_str()));
        map.insert("ability".to_string(), ItemValue::from(self.ability.as_str()));
        map.insert("proficient".to_string(), ItemValue::Boolean(self.proficient));
        map.insert("expertise".to_string(), ItemValue::Boolean(self.expertise));
        ItemValue::Object(map)
    }
}

/// Current/max view of a `resource-counter` item (spell slots, ki, rage...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceCounter {
    pub current: i32,
    pub max: Option<i32>,
}

impl ResourceCounter {
    /// Spend `amount`; fails without changing anything if not enough remains.
    pub fn spend(&mut self, amount: i32) -> Result<(), DomainError> {
        if amount < 0 || amount > self.current {
            return Err(DomainError::constraint(format!(
                "Cannot spend {} from a counter at {}",
                amount, self.current
            )));
        }
        self.current -= amount;
        Ok(())
    }

    /// Refill to max, or leave untouched when uncapped.
    pub fn restore(&mut self) {
        if let Some(max) = self.max {
            self.current = max;
        }
    }
}
