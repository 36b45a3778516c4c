//! Rich-text allowlists both sides must agree on.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Fingerprint of the allowlists below; bump the date when they change.
pub const RICH_TEXT_SIGNATURE: &str = livepane_core::config::DEFAULT_SIGNATURE;

/// Tags rich text may produce.
pub const ALLOWED_TAGS: &[&str] = &[
    "p",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "blockquote",
    "ul",
    "ol",
    "li",
    "strong",
    "b",
    "em",
    "i",
    "u",
    "s",
    "a",
    "code",
    "pre",
    "hr",
    "br",
    "img",
];

/// Attributes allowed per tag.
pub const ALLOWED_ATTRIBUTES: &[(&str, &[&str])] = &[
    ("a", &["href", "name", "target", "rel"]),
    ("img", &["src", "alt", "title", "loading"]),
];

/// URI schemes allowed in `href`/`src`; root-relative and hash links are always allowed.
pub const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];

/// Serializable form of the allowlists, embedded into the frame bootstrap.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RichTextConfig {
    /// Allowed tags.
    pub allowed_tags: Vec<String>,

    /// Allowed attributes per tag.
    pub allowed_attributes: BTreeMap<String, Vec<String>>,

    /// Allowed URI schemes.
    pub allowed_schemes: Vec<String>,

    /// Configuration fingerprint.
    pub signature: String,
}

impl Default for RichTextConfig {
    fn default() -> Self {
        Self {
            allowed_tags: ALLOWED_TAGS.iter().map(|t| t.to_string()).collect(),
            allowed_attributes: ALLOWED_ATTRIBUTES
                .iter()
                .map(|(tag, attrs)| {
                    (
                        tag.to_string(),
                        attrs.iter().map(|a| a.to_string()).collect(),
                    )
                })
                .collect(),
            allowed_schemes: ALLOWED_SCHEMES.iter().map(|s| s.to_string()).collect(),
            signature: RICH_TEXT_SIGNATURE.to_string(),
        }
    }
}

impl RichTextConfig {
    /// Whether `tag` may appear in rendered rich text.
    pub fn allows_tag(&self, tag: &str) -> bool {
        self.allowed_tags.iter().any(|t| t == tag)
    }

    /// Whether `attribute` may appear on `tag`.
    pub fn allows_attribute(&self, tag: &str, attribute: &str) -> bool {
        self.allowed_attributes
            .get(tag)
            .is_some_and(|attrs| attrs.iter().any(|a| a == attribute))
    }

    /// Whether a link or image target passes the URI allowlist.
    pub fn allows_uri(&self, uri: &str) -> bool {
        let compact: String = uri.chars().filter(|c| !c.is_whitespace()).collect();
        if compact.starts_with('/') || compact.starts_with('#') {
            return true;
        }

        let Some((scheme, _)) = compact.split_once(':') else {
            return false;
        };

        self.allowed_schemes
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(scheme))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_allowlists() {
        let config = RichTextConfig::default();
        assert!(config.allows_tag("blockquote"));
        assert!(!config.allows_tag("script"));
        assert!(!config.allows_tag("table"));
        assert!(config.allows_attribute("a", "href"));
        assert!(!config.allows_attribute("a", "onclick"));
        assert!(!config.allows_attribute("p", "class"));
    }

    #[test]
    fn test_uri_allowlist() {
        let config = RichTextConfig::default();
        assert!(config.allows_uri("https://example.com"));
        assert!(config.allows_uri("HTTP://example.com"));
        assert!(config.allows_uri("mailto:info@example.com"));
        assert!(config.allows_uri("tel:+4926100000"));
        assert!(config.allows_uri("/de/wohnungen"));
        assert!(config.allows_uri("#kontakt"));
        assert!(!config.allows_uri("javascript:alert(1)"));
        assert!(!config.allows_uri("java\tscript:alert(1)"));
        assert!(!config.allows_uri("data:text/html;base64,AAAA"));
        assert!(!config.allows_uri("wohnungen.html"));
    }

    #[test]
    fn test_signature_matches_core_default() {
        assert_eq!(RichTextConfig::default().signature, "cms-richtext-v1-2026-02-28");
    }
}
