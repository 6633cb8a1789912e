//! Canonical entity shape and the normalizer that produces it
//!
//! The server decides what a record looks like; the client only guarantees
//! that what reaches UI state is a JSON object (never `null`, never a bare
//! primitive) and that lists contain nothing else.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::ID_FIELD;

/// Top-level field map of an entity.
pub type Fields = serde_json::Map<String, Value>;

/// Identifier of a single record: a non-empty string or a non-negative integer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Int(u64),
    Str(String),
}

impl ResourceId {
    /// Compare against the raw `id` value of a record.
    ///
    /// `Str("7")` and `Int(7)` are considered equal since servers are not
    /// consistent about quoting numeric ids.
    pub fn matches(&self, raw: &Value) -> bool {
        match (self, raw) {
            (Self::Int(n), Value::Number(num)) => num.as_u64() == Some(*n),
            (Self::Str(s), Value::String(other)) => s == other,
            (Self::Int(n), Value::String(other)) => other == &n.to_string(),
            (Self::Str(s), Value::Number(num)) => s == &num.to_string(),
            _ => false,
        }
    }

    /// JSON representation of the identifier
    pub fn to_value(&self) -> Value {
        match self {
            Self::Int(n) => Value::from(*n),
            Self::Str(s) => Value::from(s.as_str()),
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => f.write_str(s),
        }
    }
}

impl From<u64> for ResourceId {
    fn from(value: u64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for ResourceId {
    fn from(value: u32) -> Self {
        Self::Int(u64::from(value))
    }
}

impl From<&str> for ResourceId {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// Opaque record as consumed by UI state.
///
/// No schema is enforced; fields are carried exactly as the server sent them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(Fields);

impl Entity {
    /// Create an empty entity
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing field map
    pub fn from_fields(fields: Fields) -> Self {
        Self(fields)
    }

    /// Look up a top-level field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Set a top-level field, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Identifier of the record, when it carries a usable one.
    ///
    /// Returns `None` for a missing `id`, an empty string, or anything that
    /// is not a string or non-negative integer. Never invents one.
    pub fn id(&self) -> Option<ResourceId> {
        match self.0.get(ID_FIELD)? {
            Value::String(s) if !s.is_empty() => Some(ResourceId::Str(s.clone())),
            Value::Number(n) => n.as_u64().map(ResourceId::Int),
            _ => None,
        }
    }

    /// Whether this record's `id` refers to `id`
    pub fn has_id(&self, id: &ResourceId) -> bool {
        self.0.get(ID_FIELD).is_some_and(|raw| id.matches(raw))
    }

    pub fn fields(&self) -> &Fields {
        &self.0
    }

    pub fn into_fields(self) -> Fields {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Convert back into a JSON object value
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Fields> for Entity {
    fn from(fields: Fields) -> Self {
        Self(fields)
    }
}

/// Normalize a single raw payload.
///
/// Returns `None` for `null` and for anything that is not a JSON object.
/// Objects are copied key by key into a new [`Entity`]; nested values are
/// carried over untouched and field types are not checked.
pub fn normalize_entity(value: &Value) -> Option<Entity> {
    value.as_object().map(|fields| Entity(fields.clone()))
}

/// Normalize a raw list payload.
///
/// Non-array input yields an empty list. Elements that do not normalize are
/// dropped; the remaining ones keep their relative order.
pub fn normalize_entity_list(value: &Value) -> Vec<Entity> {
    value
        .as_array()
        .map(|items| items.iter().filter_map(normalize_entity).collect())
        .unwrap_or_default()
}
