//! Recursive media library listing.
//!
//! The admin's media library only lists the top level of one folder. Uploads
//! for this site live in nested, per-entry folders (`{{slug}}` templates in
//! the CMS config), so [`RecursiveMediaBackend`] wraps a backend and lists
//! everything below the configured folders instead.

use std::{
    collections::{BTreeMap, BTreeSet},
    path::Path,
    sync::LazyLock,
};

use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;

/// Depth passed to recursive file listings.
pub const LIST_DEPTH: usize = 100;

static SLUG_TEMPLATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*slug\s*\}\}").expect("valid slug template regex"));

/// One file as reported by a backend's raw file listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileEntry {
    pub path: String,
    pub id: Option<String>,
    pub sha: Option<String>,
    pub name: Option<String>,
    pub size: Option<u64>,
}

impl FileEntry {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }
}

/// One item of the media library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaFile {
    pub id: String,
    pub name: String,
    pub size: u64,
    pub path: String,
    #[serde(default, rename = "displayURL")]
    pub display_url: Option<String>,
}

impl MediaFile {
    /// Media file for a repository path with no further metadata.
    pub fn at(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            id: path.clone(),
            name: last_segment(&path).to_string(),
            size: 0,
            path,
            display_url: None,
        }
    }

    fn from_entry(file: FileEntry) -> Self {
        let id = file
            .id
            .or(file.sha)
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| file.path.clone());
        let name = file
            .name
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| last_segment(&file.path).to_string());

        Self {
            id,
            name,
            size: file.size.unwrap_or(0),
            path: file.path,
            display_url: None,
        }
    }
}

fn last_segment(path: &str) -> &str {
    match path.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => segment,
        _ => path,
    }
}

fn has_hidden_segment(path: &str) -> bool {
    path.split('/').any(|segment| segment.starts_with('.'))
}

/// Media library operations of a CMS backend.
pub trait MediaBackend {
    /// Folder listed when none is given.
    fn media_folder(&self) -> &str;

    /// Media items directly inside `folder`.
    fn get_media(&self, folder: &str) -> Result<Vec<MediaFile>>;

    /// Paths of entry files in a collection folder.
    fn entries_by_folder(&self, folder: &str, extension: &str, depth: usize)
    -> Result<Vec<String>>;

    /// Recursive raw file listing, for backends that have one.
    fn list_files(&self, _folder: &str, _depth: usize) -> Option<Result<Vec<FileEntry>>> {
        None
    }
}

/// Media-relevant part of the admin `config.yml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CmsConfig {
    #[serde(default)]
    pub media_folder: Option<String>,

    #[serde(default)]
    pub collections: Vec<CmsCollection>,
}

/// One collection of the CMS config.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CmsCollection {
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub folder: Option<String>,

    #[serde(default)]
    pub extension: Option<String>,

    #[serde(default)]
    pub media_folder: Option<String>,

    #[serde(default)]
    pub files: Vec<CmsFile>,
}

/// One file of a file collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CmsFile {
    #[serde(default)]
    pub media_folder: Option<String>,
}

impl CmsConfig {
    /// Parse the YAML text of `config.yml`.
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Read `config.yml` from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml(&text)
    }
}

/// Backend decorator that lists media recursively.
///
/// Everything except [`MediaBackend::get_media`] is forwarded to the inner
/// backend unchanged.
#[derive(Debug, Clone)]
pub struct RecursiveMediaBackend<B> {
    inner: B,
    config: CmsConfig,
}

impl<B: MediaBackend> RecursiveMediaBackend<B> {
    pub fn new(inner: B, config: CmsConfig) -> Self {
        Self { inner, config }
    }

    pub fn inner(&self) -> &B {
        &self.inner
    }

    pub fn config(&self) -> &CmsConfig {
        &self.config
    }

    /// Every concrete media folder the configuration names, sorted.
    ///
    /// Includes `requested`, the global folder and each collection or file
    /// folder. `{{slug}}` templates are expanded from the entries of the
    /// collection; other templates are skipped.
    pub fn resolve_media_folders(&self, requested: Option<&str>) -> Vec<String> {
        let mut folders = BTreeSet::new();

        add_folder(&mut folders, requested);
        add_folder(&mut folders, self.config.media_folder.as_deref());

        for collection in &self.config.collections {
            add_folder(&mut folders, collection.media_folder.as_deref());
            self.expand_slug_template(&mut folders, collection.media_folder.as_deref(), collection);

            for file in &collection.files {
                add_folder(&mut folders, file.media_folder.as_deref());
                self.expand_slug_template(&mut folders, file.media_folder.as_deref(), collection);
            }
        }

        folders.into_iter().collect()
    }

    fn expand_slug_template(
        &self,
        folders: &mut BTreeSet<String>,
        template: Option<&str>,
        collection: &CmsCollection,
    ) {
        let Some(template) = template.filter(|t| t.contains("{{slug}}")) else {
            return;
        };
        let Some(folder) = collection.folder.as_deref() else {
            return;
        };
        let extension = collection.extension.as_deref().unwrap_or("md");

        let entries = match self.inner.entries_by_folder(folder, extension, 1) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(
                    collection = collection.name.as_deref().unwrap_or("collection"),
                    %err,
                    "could not expand slug media folders"
                );
                return;
            }
        };

        for path in entries {
            let name = last_segment(&path);
            let slug = match name.rfind('.') {
                Some(dot) => &name[..dot],
                None => name,
            };
            if slug.is_empty() {
                continue;
            }
            let expanded = SLUG_TEMPLATE_RE.replace_all(template, NoExpand(slug));
            add_folder(folders, Some(&expanded));
        }
    }

    fn list_recursive(&self, folder: &str) -> Result<Option<Vec<MediaFile>>> {
        if let Some(listing) = self.inner.list_files(folder, LIST_DEPTH) {
            let mut files: Vec<MediaFile> = listing?
                .into_iter()
                .filter(|file| !has_hidden_segment(&file.path))
                .map(MediaFile::from_entry)
                .collect();
            files.sort_by(|a, b| a.path.cmp(&b.path));
            return Ok(Some(files));
        }

        let folders = self.resolve_media_folders(Some(folder));
        if folders.is_empty() {
            return Ok(None);
        }

        let mut by_path = BTreeMap::new();
        for folder in &folders {
            let items = match self.inner.get_media(folder) {
                Ok(items) => items,
                Err(err) => {
                    warn!(folder = %folder, %err, "could not read media folder");
                    continue;
                }
            };

            for item in items {
                if !has_hidden_segment(&item.path) {
                    by_path.insert(item.path.clone(), item);
                }
            }
        }

        if by_path.is_empty() {
            return Ok(None);
        }

        Ok(Some(by_path.into_values().collect()))
    }
}

fn add_folder(folders: &mut BTreeSet<String>, value: Option<&str>) {
    let Some(value) = value.map(str::trim) else {
        return;
    };
    if value.is_empty() || value.contains("{{") {
        return;
    }
    folders.insert(value.to_string());
}

impl<B: MediaBackend> MediaBackend for RecursiveMediaBackend<B> {
    fn media_folder(&self) -> &str {
        self.inner.media_folder()
    }

    fn get_media(&self, folder: &str) -> Result<Vec<MediaFile>> {
        match self.list_recursive(folder) {
            Ok(Some(files)) => Ok(files),
            Ok(None) => self.inner.get_media(folder),
            Err(err) => {
                warn!(folder, %err, "falling back to the default media listing");
                self.inner.get_media(folder)
            }
        }
    }

    fn entries_by_folder(
        &self,
        folder: &str,
        extension: &str,
        depth: usize,
    ) -> Result<Vec<String>> {
        self.inner.entries_by_folder(folder, extension, depth)
    }

    fn list_files(&self, folder: &str, depth: usize) -> Option<Result<Vec<FileEntry>>> {
        self.inner.list_files(folder, depth)
    }
}
