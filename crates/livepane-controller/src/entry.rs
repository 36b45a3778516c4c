//! Editor entries and which preview they get.

use serde_json::{Map, Value};

use crate::store::Mode;

/// Notice shown instead of a visual preview for unsupported entries.
pub const UNSUPPORTED_NOTICE: &str =
    "Visual preview is available for the homepage and apartments only.";

/// Entry as currently edited, unsaved changes included.
#[derive(Debug, Clone, PartialEq)]
pub struct EntrySnapshot {
    /// Slug as entered, possibly blank for new entries.
    pub slug: String,
    /// Entry data.
    pub data: Value,
}

impl EntrySnapshot {
    pub fn new(slug: impl Into<String>, data: Value) -> Self {
        Self {
            slug: slug.into(),
            data,
        }
    }

    /// Slug as sent in payloads.
    pub fn slug(&self) -> &str {
        self.slug.trim()
    }

    /// Slug used for store keys and frame URLs.
    pub fn normalized_slug(&self) -> String {
        self.slug.trim().to_lowercase()
    }

    /// Entry data, or an empty object when the editor has none yet.
    pub fn data(&self) -> Value {
        if self.data.is_null() {
            Value::Object(Map::new())
        } else {
            self.data.clone()
        }
    }

    /// Pretty-printed data for the structured fallback.
    pub fn fallback_json(&self) -> String {
        serde_json::to_string_pretty(&self.data()).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Preview chosen for an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewRoute {
    /// Live visual preview in a frame.
    Visual(Mode),
    /// Structured data only.
    Unsupported,
}

/// Whether a `pages` entry is the homepage.
pub fn is_home_entry(entry: &EntrySnapshot) -> bool {
    if entry.normalized_slug() == "home" {
        return true;
    }

    entry
        .data
        .get("title")
        .and_then(Value::as_str)
        .is_some_and(|title| title.trim().to_lowercase() == "home")
}

/// Pick the preview for an entry of `collection`.
pub fn route_entry(collection: &str, entry: &EntrySnapshot) -> PreviewRoute {
    match collection {
        "apartments" => PreviewRoute::Visual(Mode::Apartments),
        "home" => PreviewRoute::Visual(Mode::Home),
        "pages" if is_home_entry(entry) => PreviewRoute::Visual(Mode::Home),
        _ => PreviewRoute::Unsupported,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_home_detection() {
        assert!(is_home_entry(&EntrySnapshot::new(" Home ", json!({}))));
        assert!(is_home_entry(&EntrySnapshot::new("", json!({"title": " HOME "}))));
        assert!(!is_home_entry(&EntrySnapshot::new("faq", json!({"title": "FAQ"}))));
        assert!(!is_home_entry(&EntrySnapshot::new("faq", json!({"title": {"de": "home"}}))));
    }

    #[test]
    fn test_routing() {
        let home = EntrySnapshot::new("home", json!({}));
        let faq = EntrySnapshot::new("faq", json!({}));

        assert_eq!(route_entry("apartments", &faq), PreviewRoute::Visual(Mode::Apartments));
        assert_eq!(route_entry("home", &faq), PreviewRoute::Visual(Mode::Home));
        assert_eq!(route_entry("pages", &home), PreviewRoute::Visual(Mode::Home));
        assert_eq!(route_entry("pages", &faq), PreviewRoute::Unsupported);
        assert_eq!(route_entry("guides", &home), PreviewRoute::Unsupported);
    }

    #[test]
    fn test_null_data_becomes_empty_object() {
        let entry = EntrySnapshot::new("draft", Value::Null);
        assert_eq!(entry.data(), json!({}));
        assert_eq!(entry.fallback_json(), "{}");
    }
}
