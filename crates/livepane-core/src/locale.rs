//! Display locales and bilingual value resolution.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Language the preview is displayed in.
///
/// Decoding is lenient: anything other than `en` is German, matching what the
/// frame does with unknown locale strings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Locale {
    /// German, the site's primary language.
    #[default]
    De,
    /// English.
    En,
}

impl Locale {
    /// Both supported locales in fallback order.
    pub const ALL: [Locale; 2] = [Locale::De, Locale::En];

    /// Parse a locale code, falling back to German.
    pub fn parse_lenient(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("en") {
            Self::En
        } else {
            Self::De
        }
    }

    /// Lowercase locale code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::De => "de",
            Self::En => "en",
        }
    }

    /// Uppercase label used by the toolbar.
    pub fn label(&self) -> &'static str {
        match self {
            Self::De => "DE",
            Self::En => "EN",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Locale {
    fn from(value: String) -> Self {
        Self::parse_lenient(&value)
    }
}

impl From<Locale> for String {
    fn from(value: Locale) -> Self {
        value.as_str().to_string()
    }
}

/// Resolve a possibly bilingual value to one display string.
///
/// Order: requested locale, German, English, empty. Scalars are printed as is.
pub fn localized(value: &Value, locale: Locale) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Object(map) => [locale.as_str(), "de", "en"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_default(),
        Value::Array(_) => String::new(),
    }
}

/// Like [`localized`] but for an optional value.
pub fn localized_opt(value: Option<&Value>, locale: Locale) -> String {
    value.map(|v| localized(v, locale)).unwrap_or_default()
}
