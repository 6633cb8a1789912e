//! Splitting raw list responses into records and pagination
//!
//! Backends answer `list` either with a bare array or with an envelope such
//! as `{data: [...], meta: {page, limit, total}}`. The hook needs both halves
//! separately, so this module pulls them apart without imposing a schema.

use hmis_domain::{normalize_entity_list, Entity, Fields};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const ITEM_KEYS: [&str; 2] = ["data", "items"];
const META_KEYS: [&str; 2] = ["meta", "pagination"];

/// Pagination metadata as reported by the server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaginationMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
    /// Any other metadata (cursors, links) kept verbatim
    #[serde(flatten)]
    pub extra: Fields,
}

impl PaginationMeta {
    /// Read pagination keys from a metadata object
    ///
    /// Keys whose value is not a non-negative integer land in `extra`.
    pub fn from_fields(fields: &Fields) -> Self {
        let mut meta = Self::default();
        for (key, value) in fields {
            let slot = match key.as_str() {
                "page" => &mut meta.page,
                "limit" | "per_page" => &mut meta.limit,
                "total" => &mut meta.total,
                "total_pages" | "pages" => &mut meta.total_pages,
                _ => {
                    meta.extra.insert(key.clone(), value.clone());
                    continue;
                }
            };
            match value.as_u64() {
                Some(n) => *slot = Some(n),
                None => {
                    meta.extra.insert(key.clone(), value.clone());
                }
            }
        }
        meta
    }

    /// Page count from `total_pages`, or derived from `total` and `limit`
    pub fn page_count(&self) -> Option<u64> {
        self.total_pages.or_else(|| match (self.total, self.limit) {
            (Some(total), Some(limit)) if limit > 0 => Some(total.div_ceil(limit)),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.page.is_none()
            && self.limit.is_none()
            && self.total.is_none()
            && self.total_pages.is_none()
            && self.extra.is_empty()
    }
}

/// Normalized records plus optional pagination from one `list` response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListPayload {
    pub items: Vec<Entity>,
    pub pagination: Option<PaginationMeta>,
}

impl ListPayload {
    /// Extract records and pagination from a raw `list` response
    ///
    /// - bare array: records only
    /// - object with `data`/`items` array: records, plus pagination from a
    ///   `meta`/`pagination` object or from top-level `page`/`limit`/`total`
    /// - anything else: empty
    pub fn from_raw(raw: &Value) -> Self {
        match raw {
            Value::Array(_) => Self { items: normalize_entity_list(raw), pagination: None },
            Value::Object(envelope) => {
                let Some(items) = ITEM_KEYS.iter().find_map(|key| envelope.get(*key)) else {
                    return Self::default();
                };

                let pagination = META_KEYS
                    .iter()
                    .find_map(|key| envelope.get(*key).and_then(Value::as_object))
                    .map(PaginationMeta::from_fields)
                    .or_else(|| top_level_meta(envelope));

                Self { items: normalize_entity_list(items), pagination }
            }
            _ => Self::default(),
        }
    }

    /// Number of raw entries dropped during normalization
    pub fn dropped_from(&self, raw: &Value) -> usize {
        let raw_len = match raw {
            Value::Array(entries) => entries.len(),
            Value::Object(envelope) => ITEM_KEYS
                .iter()
                .find_map(|key| envelope.get(*key).and_then(Value::as_array))
                .map_or(0, Vec::len),
            _ => 0,
        };
        raw_len.saturating_sub(self.items.len())
    }
}

fn top_level_meta(envelope: &Fields) -> Option<PaginationMeta> {
    let fields: Fields = envelope
        .iter()
        .filter(|(key, _)| matches!(key.as_str(), "page" | "limit" | "total" | "total_pages"))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let meta = PaginationMeta::from_fields(&fields);
    (!meta.is_empty()).then_some(meta)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn bare_array_has_no_pagination() {
        let payload = ListPayload::from_raw(&json!([{"id": 1}, null, {"id": 2}]));
        assert_eq!(payload.items.len(), 2);
        assert_eq!(payload.pagination, None);
    }

    #[test]
    fn envelope_with_meta() {
        let raw = json!({
            "data": [{"id": "a"}, {"id": "b"}, 3],
            "meta": {"page": 2, "limit": 2, "total": 9, "next_cursor": "xyz"}
        });
        let payload = ListPayload::from_raw(&raw);

        assert_eq!(payload.items.len(), 2);
        assert_eq!(payload.dropped_from(&raw), 1);
        let meta = payload.pagination.unwrap();
        assert_eq!(meta.page, Some(2));
        assert_eq!(meta.total, Some(9));
        assert_eq!(meta.page_count(), Some(5));
        assert_eq!(meta.extra.get("next_cursor"), Some(&json!("xyz")));
    }

    #[test]
    fn envelope_with_top_level_pagination() {
        let raw = json!({"items": [{"id": 1}], "page": 1, "total": 1, "ok": true});
        let payload = ListPayload::from_raw(&raw);
        let meta = payload.pagination.unwrap();
        assert_eq!(meta.page, Some(1));
        assert_eq!(meta.total, Some(1));
        assert!(meta.extra.is_empty());
    }

    #[test]
    fn envelope_without_meta() {
        let payload = ListPayload::from_raw(&json!({"data": [{"id": 1}]}));
        assert_eq!(payload.items.len(), 1);
        assert_eq!(payload.pagination, None);
    }

    #[test]
    fn unrecognized_shapes_are_empty() {
        let shapes =
            [json!(null), json!("x"), json!({"results": [{"id": 1}]}), json!({"data": {"id": 1}})];
        for raw in shapes {
            assert!(ListPayload::from_raw(&raw).items.is_empty(), "{raw}");
        }
    }

    #[test]
    fn non_integer_meta_values_are_kept_as_extra() {
        let fields = json!({"page": "2", "per_page": 50});
        let meta = PaginationMeta::from_fields(fields.as_object().unwrap());
        assert_eq!(meta.page, None);
        assert_eq!(meta.limit, Some(50));
        assert_eq!(meta.extra.get("page"), Some(&json!("2")));
    }
}
