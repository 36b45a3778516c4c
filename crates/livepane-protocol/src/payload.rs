//! Snapshot payload carried by UPDATE messages.

use std::collections::BTreeMap;

use livepane_core::{Collection, Locale, PageKind};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Full snapshot of an entry as currently edited, including unsaved changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePayload {
    /// Template the frame renders.
    pub page: PageKind,

    /// Collection the entry comes from.
    pub collection: Collection,

    /// Entry slug, empty for drafts.
    #[serde(default)]
    pub slug: String,

    /// Display locale.
    #[serde(default)]
    pub locale: Locale,

    /// Whether editable regions are outlined.
    #[serde(default)]
    pub highlight: bool,

    /// Field the editor focused last.
    #[serde(default)]
    pub active_path: Option<String>,

    /// Denormalized entry data.
    #[serde(default = "empty_object")]
    pub data: Value,

    /// Raw media reference → resolvable URL.
    #[serde(default)]
    pub resolved_assets: BTreeMap<String, String>,

    /// Milliseconds since the epoch when the snapshot was built.
    #[serde(default)]
    pub sent_at: u64,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

impl UpdatePayload {
    /// Create a payload for `page` with empty data.
    pub fn new(page: PageKind) -> Self {
        Self {
            page,
            collection: page.collection(),
            slug: String::new(),
            locale: Locale::default(),
            highlight: false,
            active_path: None,
            data: empty_object(),
            resolved_assets: BTreeMap::new(),
            sent_at: 0,
        }
    }

    /// Resolve a raw media reference, falling back to the reference itself.
    pub fn resolve_asset<'a>(&'a self, raw: &'a str) -> &'a str {
        self.resolved_assets
            .get(raw)
            .map(String::as_str)
            .filter(|url| !url.is_empty())
            .unwrap_or(raw)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_wire_field_names_are_camel_case() {
        let mut payload = UpdatePayload::new(PageKind::Apartments);
        payload.slug = "rheinblick".to_string();
        payload.active_path = Some("tagline".to_string());
        payload
            .resolved_assets
            .insert("/images/a.jpg".to_string(), "blob:abc".to_string());

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["page"], "apartments");
        assert_eq!(value["collection"], "apartments");
        assert_eq!(value["activePath"], "tagline");
        assert_eq!(value["resolvedAssets"]["/images/a.jpg"], "blob:abc");
        assert!(value.get("sentAt").is_some());
    }

    #[test]
    fn test_null_active_path() {
        let payload = UpdatePayload::new(PageKind::Home);
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["activePath"], Value::Null);
    }

    #[test]
    fn test_decode_with_missing_optional_fields() {
        let payload: UpdatePayload = serde_json::from_value(json!({
            "page": "home",
            "collection": "pages",
            "locale": "xx"
        }))
        .unwrap();
        assert_eq!(payload.locale, Locale::De);
        assert_eq!(payload.data, json!({}));
        assert!(payload.resolved_assets.is_empty());
    }

    #[test]
    fn test_resolve_asset_fallback() {
        let mut payload = UpdatePayload::new(PageKind::Home);
        payload
            .resolved_assets
            .insert("/images/hero.jpg".to_string(), "https://cdn/hero.jpg".to_string());
        assert_eq!(payload.resolve_asset("/images/hero.jpg"), "https://cdn/hero.jpg");
        assert_eq!(payload.resolve_asset("/images/other.jpg"), "/images/other.jpg");
    }
}
