//! Bootstrap object embedded into the preview document at build time.

use std::collections::BTreeMap;

use livepane_core::{Locale, PageKind, field_map};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{error::Result, payload::UpdatePayload, rich_text::RichTextConfig};

/// Everything the frame needs for its first paint without a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bootstrap {
    /// Template the document renders.
    #[serde(default, deserialize_with = "lenient_page")]
    pub page: PageKind,

    /// Initial display locale.
    #[serde(default)]
    pub locale: Locale,

    /// Content path → CSS selector.
    #[serde(default)]
    pub field_map: BTreeMap<String, String>,

    /// Rich-text allowlists.
    #[serde(default)]
    pub rich_text_config: RichTextConfig,

    /// Snapshot rendered before any message arrives.
    #[serde(default)]
    pub initial_payload: Option<UpdatePayload>,
}

fn lenient_page<'de, D>(deserializer: D) -> std::result::Result<PageKind, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(PageKind::parse).unwrap_or_default())
}

impl Bootstrap {
    /// Bootstrap for `page` with its standard field map.
    pub fn for_page(page: PageKind, locale: Locale) -> Self {
        Self {
            page,
            locale,
            field_map: field_map(page),
            rich_text_config: RichTextConfig::default(),
            initial_payload: None,
        }
    }

    /// Attach an initial payload.
    #[must_use]
    pub fn with_initial_payload(mut self, payload: UpdatePayload) -> Self {
        self.initial_payload = Some(payload);
        self
    }

    /// Parse a bootstrap from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
