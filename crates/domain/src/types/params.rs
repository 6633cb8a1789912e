//! List query parameters
//!
//! `page`, `limit`, `sort_by` and `order` are typed; anything else the caller
//! passes is kept verbatim in [`ListParams::extra`] and sent along as query
//! parameters.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::entity::Fields;
use crate::impl_wire_name_conversions;

/// Sort direction for list queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl_wire_name_conversions!(SortOrder {
    Asc => "asc",
    Desc => "desc",
});

/// Request parameters for `list` operations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<SortOrder>,
    /// Unrecognized keys, passed through unchanged
    #[serde(flatten)]
    pub extra: Fields,
}

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>) -> Self {
        self.sort_by = Some(field.into());
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    /// Attach an unrecognized key
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// True when no parameter at all is set
    pub fn is_empty(&self) -> bool {
        self.page.is_none()
            && self.limit.is_none()
            && self.sort_by.is_none()
            && self.order.is_none()
            && self.extra.is_empty()
    }

    /// JSON object form, recognized keys first
    pub fn to_value(&self) -> Value {
        let mut fields = Fields::new();
        if let Some(page) = self.page {
            fields.insert("page".into(), Value::from(page));
        }
        if let Some(limit) = self.limit {
            fields.insert("limit".into(), Value::from(limit));
        }
        if let Some(sort_by) = &self.sort_by {
            fields.insert("sort_by".into(), Value::from(sort_by.as_str()));
        }
        if let Some(order) = self.order {
            fields.insert("order".into(), Value::from(order.as_str()));
        }
        for (key, value) in &self.extra {
            fields.entry(key.clone()).or_insert_with(|| value.clone());
        }
        Value::Object(fields)
    }

    /// Flatten into query-string pairs.
    ///
    /// `null` extras are skipped, arrays repeat the key once per scalar
    /// element, nested objects are sent as their JSON text.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(sort_by) = &self.sort_by {
            pairs.push(("sort_by".to_string(), sort_by.clone()));
        }
        if let Some(order) = self.order {
            pairs.push(("order".to_string(), order.to_string()));
        }
        for (key, value) in &self.extra {
            match value {
                Value::Array(items) => {
                    for item in items {
                        if let Some(text) = query_text(item) {
                            pairs.push((key.clone(), text));
                        }
                    }
                }
                other => {
                    if let Some(text) = query_text(other) {
                        pairs.push((key.clone(), text));
                    }
                }
            }
        }
        pairs
    }
}

fn query_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}
