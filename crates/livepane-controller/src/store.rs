//! Per-entry preview state.

use std::{fmt, sync::LazyLock};

use livepane_core::{Collection, Locale, PageKind};
use livepane_protocol::UpdatePayload;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::host::TimerId;

static KEY_CHARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[^a-z0-9_-]+").expect("valid key regex"));

/// Which visual template a store previews. Fixed when the store is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Home,
    Apartments,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Apartments => "apartments",
        }
    }

    /// Page kind announced in payloads.
    pub fn page(&self) -> PageKind {
        match self {
            Self::Home => PageKind::Home,
            Self::Apartments => PageKind::Apartments,
        }
    }

    /// Collection announced in payloads.
    pub fn collection(&self) -> Collection {
        match self {
            Self::Home => Collection::Pages,
            Self::Apartments => Collection::Apartments,
        }
    }

    /// Iframe source for an entry with the given (normalized) slug.
    pub fn source(&self, slug: &str) -> String {
        match self {
            Self::Home => "/cms-preview/home?cmsPreview=1".to_string(),
            Self::Apartments if slug.is_empty() => {
                "/cms-preview/apartment?cmsPreview=1".to_string()
            }
            Self::Apartments => format!(
                "/cms-preview/apartment?cmsPreview=1&slug={}",
                urlencoding::encode(slug)
            ),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identifier of a preview store, `{mode}-{slug|draft}`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreKey(String);

impl StoreKey {
    /// Derive the key for an entry. Characters outside `[a-z0-9_-]` collapse
    /// to `-`.
    pub fn derive(mode: Mode, slug: &str) -> Self {
        let slug = slug.trim().to_lowercase();
        let base = format!(
            "{}-{}",
            mode.as_str(),
            if slug.is_empty() { "draft" } else { &slug }
        );
        let key = KEY_CHARS_RE.replace_all(&base, "-").into_owned();

        if key.is_empty() {
            Self(format!("{}-preview", mode.as_str()))
        } else {
            Self(key)
        }
    }

    /// Wrap an existing key string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Element ids of the preview view bound to this store.
    pub fn element_ids(&self) -> ElementIds {
        ElementIds::for_key(&self.0)
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// DOM ids of one store's toolbar, frame and fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementIds {
    pub root: String,
    pub iframe: String,
    pub frame_shell: String,
    pub status: String,
    pub note: String,
    pub fallback: String,
    pub fallback_json: String,
    pub locale_group: String,
    pub viewport_group: String,
    pub highlight_button: String,
}

impl ElementIds {
    fn for_key(key: &str) -> Self {
        Self {
            root: format!("cms-preview-root-{key}"),
            iframe: format!("cms-preview-iframe-{key}"),
            frame_shell: format!("cms-preview-shell-{key}"),
            status: format!("cms-preview-status-{key}"),
            note: format!("cms-preview-note-{key}"),
            fallback: format!("cms-preview-fallback-{key}"),
            fallback_json: format!("cms-preview-fallback-json-{key}"),
            locale_group: format!("cms-preview-locale-{key}"),
            viewport_group: format!("cms-preview-viewport-{key}"),
            highlight_button: format!("cms-preview-highlight-{key}"),
        }
    }
}

/// Simulated device width of the preview frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Viewport {
    #[default]
    Desktop,
    Tablet,
    Mobile,
}

impl Viewport {
    pub const ALL: [Viewport; 3] = [Viewport::Desktop, Viewport::Tablet, Viewport::Mobile];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Tablet => "tablet",
            Self::Mobile => "mobile",
        }
    }

    /// Parse a toolbar value.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == value)
    }

    /// CSS width of the frame shell.
    pub fn width(&self) -> &'static str {
        match self {
            Self::Desktop => "100%",
            Self::Tablet => "860px",
            Self::Mobile => "430px",
        }
    }

    /// Toolbar button label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Desktop => "Desktop",
            Self::Tablet => "Tablet",
            Self::Mobile => "Mobile",
        }
    }
}

/// Sync state shown in the toolbar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PreviewStatus {
    #[default]
    Loading,
    Updating,
    Synced,
    AssetPending,
    RenderWarning,
}

impl PreviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Updating => "updating",
            Self::Synced => "synced",
            Self::AssetPending => "asset pending",
            Self::RenderWarning => "render warning",
        }
    }

    /// CSS class of the status badge, e.g. `status-asset-pending`.
    pub fn css_class(&self) -> String {
        format!("status-{}", self.as_str().replace(' ', "-"))
    }

    /// Parse a status string as sent in ACK messages.
    pub fn from_wire(value: &str) -> Option<Self> {
        match value {
            "loading" => Some(Self::Loading),
            "updating" => Some(Self::Updating),
            "synced" => Some(Self::Synced),
            "asset pending" => Some(Self::AssetPending),
            "render warning" => Some(Self::RenderWarning),
            _ => None,
        }
    }
}

impl fmt::Display for PreviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Preview state of one open editor entry.
#[derive(Debug, Clone)]
pub struct PreviewStore {
    pub key: StoreKey,
    pub mode: Mode,
    pub locale: Locale,
    pub viewport: Viewport,
    pub highlight: bool,
    pub active_path: Option<String>,

    /// READY has been observed for the current frame source.
    pub ready: bool,

    /// READY did not arrive within the handshake window.
    pub handshake_timeout: bool,

    pub status: PreviewStatus,
    pub status_note: String,

    /// Last snapshot built for this entry; resent verbatim once ready.
    pub latest_payload: Option<UpdatePayload>,

    /// Desired frame URL.
    pub source: String,

    /// URL the frame was last pointed at.
    pub loaded_source: Option<String>,

    /// The structured-data fallback replaces the frame.
    pub fallback_visible: bool,

    pub(crate) update_timer: Option<TimerId>,
    pub(crate) handshake_timer: Option<TimerId>,
}

impl PreviewStore {
    /// Fresh store in the `loading` state.
    pub fn new(key: StoreKey, mode: Mode) -> Self {
        Self {
            key,
            mode,
            locale: Locale::default(),
            viewport: Viewport::default(),
            highlight: false,
            active_path: None,
            ready: false,
            handshake_timeout: false,
            status: PreviewStatus::Loading,
            status_note: String::new(),
            latest_payload: None,
            source: mode.source(""),
            loaded_source: None,
            fallback_visible: false,
            update_timer: None,
            handshake_timer: None,
        }
    }

    /// Replace status and note together.
    pub fn set_status(&mut self, status: PreviewStatus, note: impl Into<String>) {
        self.status = status;
        self.status_note = note.into();
    }

    /// Replace the status, keeping the current note.
    pub fn set_status_keep_note(&mut self, status: PreviewStatus) {
        self.status = status;
    }

    /// Whether a debounced update is waiting.
    pub fn has_pending_update(&self) -> bool {
        self.update_timer.is_some()
    }

    /// Whether the handshake timer is running.
    pub fn awaiting_handshake(&self) -> bool {
        self.handshake_timer.is_some()
    }

    /// Pretty-printed entry data for the structured fallback.
    pub fn fallback_json(&self) -> String {
        self.latest_payload
            .as_ref()
            .and_then(|payload| serde_json::to_string_pretty(&payload.data).ok())
            .unwrap_or_else(|| "{}".to_string())
    }

    /// Highlight toggle label.
    pub fn highlight_label(&self) -> &'static str {
        if self.highlight {
            "Highlight: On"
        } else {
            "Highlight: Off"
        }
    }
}
