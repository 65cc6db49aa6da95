use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Type-specific metadata attached to a data item.
pub type Metadata = BTreeMap<String, ItemValue>;

/// A loosely typed value stored on a data item or in its metadata bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ItemValue {
    Integer(i32),
    Float(f32),
    Boolean(bool),
    String(String),
    List(Vec<ItemValue>),
    Object(BTreeMap<String, ItemValue>),
    #[default]
    Null,
}

impl ItemValue {
    /// Numeric view of the value; strings are parsed, booleans count as 0/1.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            ItemValue::Integer(value) => Some(*value),
            ItemValue::Float(value) => Some(value.floor() as i32),
            ItemValue::Boolean(value) => Some(i32::from(*value)),
            ItemValue::String(value) => value.trim().parse::<i32>().ok(),
            ItemValue::List(_) | ItemValue::Object(_) | ItemValue::Null => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ItemValue::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ItemValue::String(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ItemValue]> {
        match self {
            ItemValue::List(values) => Some(values.as_slice()),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&BTreeMap<String, ItemValue>> {
        match self {
            ItemValue::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Look up a key when the value is an object.
    pub fn get(&self, key: &str) -> Option<&ItemValue> {
        self.as_object().and_then(|map| map.get(key))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ItemValue::Null)
    }
}

impl From<i32> for ItemValue {
    fn from(value: i32) -> Self {
        ItemValue::Integer(value)
    }
}

impl From<bool> for ItemValue {
    fn from(value: bool) -> Self {
        ItemValue::Boolean(value)
    }
}

impl From<&str> for ItemValue {
    fn from(value: &str) -> Self {
        ItemValue::String(value.to_string())
    }
}

impl From<String> for ItemValue {
    fn from(value: String) -> Self {
        ItemValue::String(value)
    }
}
