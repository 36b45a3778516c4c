//! Media reference discovery and resolution.
//!
//! Entries reference uploads by repository path (`/images/...`). Before an
//! upload is published the admin only has a local `blob:` URL for it, so every
//! snapshot carries a map from each raw reference to whatever URL currently
//! displays it.

use std::collections::{BTreeMap, BTreeSet};

use livepane_core::config::MediaConfig;
use serde_json::Value;
use tracing::debug;

use crate::error::AssetError;

/// Object keys whose string values are treated as images.
const IMAGE_KEYS: &[&str] = &["image", "images", "ogimage", "heroimage"];

/// Rules for recognizing media references in entry data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaHeuristic {
    folders: Vec<String>,
    extensions: Vec<String>,
}

impl Default for MediaHeuristic {
    fn default() -> Self {
        Self::from_config(&MediaConfig::default())
    }
}

impl MediaHeuristic {
    pub fn from_config(config: &MediaConfig) -> Self {
        Self {
            folders: config
                .folders
                .iter()
                .map(|folder| folder.trim().to_lowercase())
                .filter(|folder| !folder.is_empty())
                .collect(),
            extensions: config
                .image_extensions
                .iter()
                .map(|ext| format!(".{}", ext.trim().trim_start_matches('.').to_lowercase()))
                .collect(),
        }
    }

    /// Whether `value`, found under the key trail `trail`, is a media reference.
    pub fn is_media_reference(&self, value: &str, trail: &[String]) -> bool {
        let value = value.trim();
        if value.is_empty() {
            return false;
        }

        let lower = value.to_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            return false;
        }

        if self.folders.iter().any(|folder| lower.starts_with(folder)) {
            return true;
        }

        let under_image_key = trail.iter().any(|segment| {
            IMAGE_KEYS
                .iter()
                .any(|key| segment.eq_ignore_ascii_case(key))
        });

        under_image_key && self.extensions.iter().any(|ext| lower.ends_with(ext))
    }
}

/// Every media reference reachable in `data`.
pub fn collect_media_paths(data: &Value, heuristic: &MediaHeuristic) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    let mut trail = Vec::new();
    walk(data, &mut trail, heuristic, &mut found);
    found
}

fn walk(
    node: &Value,
    trail: &mut Vec<String>,
    heuristic: &MediaHeuristic,
    found: &mut BTreeSet<String>,
) {
    match node {
        Value::String(value) => {
            if heuristic.is_media_reference(value, trail) {
                found.insert(value.clone());
            }
        }
        Value::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                trail.push(index.to_string());
                walk(item, trail, heuristic, found);
                trail.pop();
            }
        }
        Value::Object(map) => {
            for (key, value) in map {
                trail.push(key.clone());
                walk(value, trail, heuristic, found);
                trail.pop();
            }
        }
        _ => {}
    }
}

/// Maps a raw media reference to a displayable URL.
///
/// `Ok(None)` means the resolver has nothing better than the reference itself.
pub trait AssetResolver {
    fn resolve(&self, reference: &str) -> Result<Option<String>, AssetError>;
}

impl<F> AssetResolver for F
where
    F: Fn(&str) -> Result<Option<String>, AssetError>,
{
    fn resolve(&self, reference: &str) -> Result<Option<String>, AssetError> {
        self(reference)
    }
}

/// Resolver that leaves every reference as written.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityResolver;

impl AssetResolver for IdentityResolver {
    fn resolve(&self, _reference: &str) -> Result<Option<String>, AssetError> {
        Ok(None)
    }
}

/// Resolve every media reference in `data`, falling back to the raw
/// reference on failure.
pub fn build_resolved_assets(
    data: &Value,
    heuristic: &MediaHeuristic,
    resolver: &dyn AssetResolver,
) -> BTreeMap<String, String> {
    collect_media_paths(data, heuristic)
        .into_iter()
        .map(|reference| {
            let url = match resolver.resolve(&reference) {
                Ok(Some(url)) if !url.is_empty() => url,
                Ok(_) => reference.clone(),
                Err(err) => {
                    debug!(%err, "using raw media reference");
                    reference.clone()
                }
            };
            (reference, url)
        })
        .collect()
}

/// Whether any resolved URL is a local, unpublished upload.
pub fn has_blob_asset(assets: &BTreeMap<String, String>, marker: &str) -> bool {
    !marker.is_empty() && assets.values().any(|url| url.starts_with(marker))
}
