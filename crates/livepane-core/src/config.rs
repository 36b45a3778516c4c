//! Preview bridge configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    error::{CoreError, Result},
    locale::Locale,
};

/// Rich-text configuration fingerprint shared by controller and frame.
pub const DEFAULT_SIGNATURE: &str = "cms-richtext-v1-2026-02-28";

/// Main configuration structure for Livepane.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Site settings.
    #[serde(default)]
    pub site: SiteConfig,

    /// Controller/frame bridge timing and markers.
    #[serde(default)]
    pub bridge: BridgeConfig,

    /// Media reference detection.
    #[serde(default)]
    pub media: MediaConfig,

    /// Focus-request matching.
    #[serde(default)]
    pub focus: FocusConfig,

    /// Frame rendering settings.
    #[serde(default)]
    pub frame: FrameConfig,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Origin shared by the admin page and the preview iframe.
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Locale shown when a store is first created.
    #[serde(default)]
    pub default_locale: Locale,
}

/// Bridge configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Quiet period before a queued update is sent.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,

    /// Time the controller waits for READY before showing the fallback.
    #[serde(default = "default_handshake_timeout_ms")]
    pub handshake_timeout_ms: u64,

    /// Prefix of editor-local references to unpublished uploads.
    #[serde(default = "default_blob_marker")]
    pub blob_marker: String,

    /// Rich-text configuration signature.
    #[serde(default = "default_signature")]
    pub signature: String,
}

/// Media detection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Namespaces whose strings are always media references.
    #[serde(default = "default_media_folders")]
    pub folders: Vec<String>,

    /// Extensions that mark an image under an image-like key.
    #[serde(default = "default_image_extensions")]
    pub image_extensions: Vec<String>,
}

/// Focus matching configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusConfig {
    /// Lowest score a form control needs to be focused.
    #[serde(default = "default_min_score")]
    pub min_score: u32,
}

/// Frame rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameConfig {
    /// Maximum number of gallery tiles.
    #[serde(default = "default_gallery_limit")]
    pub gallery_limit: usize,
}

fn default_origin() -> String {
    "http://localhost:4321".to_string()
}

fn default_debounce_ms() -> u64 {
    120
}

fn default_handshake_timeout_ms() -> u64 {
    2000
}

fn default_blob_marker() -> String {
    "blob:".to_string()
}

fn default_signature() -> String {
    DEFAULT_SIGNATURE.to_string()
}

fn default_media_folders() -> Vec<String> {
    vec!["/images/".to_string()]
}

fn default_image_extensions() -> Vec<String> {
    ["png", "jpg", "jpeg", "webp", "avif", "gif", "svg"]
        .iter()
        .map(|ext| ext.to_string())
        .collect()
}

fn default_min_score() -> u32 {
    1
}

fn default_gallery_limit() -> usize {
    5
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            origin: default_origin(),
            default_locale: Locale::default(),
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            handshake_timeout_ms: default_handshake_timeout_ms(),
            blob_marker: default_blob_marker(),
            signature: default_signature(),
        }
    }
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            folders: default_media_folders(),
            image_extensions: default_image_extensions(),
        }
    }
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
        }
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            gallery_limit: default_gallery_limit(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `LIVEPANE__SECTION__KEY` environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("LIVEPANE").separator("__"))
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.site.origin.trim().is_empty() {
            return Err(CoreError::config("site.origin cannot be empty"));
        }

        if self.bridge.handshake_timeout_ms == 0 {
            return Err(CoreError::config(
                "bridge.handshake_timeout_ms must be greater than zero",
            ));
        }

        if self.focus.min_score == 0 {
            return Err(CoreError::config(
                "focus.min_score must be greater than zero",
            ));
        }

        if self.site.origin.ends_with('/') {
            tracing::warn!("site.origin should not have a trailing slash");
        }

        if self.bridge.debounce_ms >= self.bridge.handshake_timeout_ms {
            tracing::warn!(
                debounce_ms = self.bridge.debounce_ms,
                handshake_timeout_ms = self.bridge.handshake_timeout_ms,
                "debounce interval is not shorter than the handshake timeout"
            );
        }

        Ok(())
    }
}
