//! Media folders command - resolve and list the CMS media library

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use livepane_controller::{
    CmsConfig, MediaBackend, MediaFile, RecursiveMediaBackend,
    media::{FileEntry, LIST_DEPTH},
};

/// Folder listed when the CMS config names none.
const DEFAULT_MEDIA_FOLDER: &str = "public/images";

/// Media backend reading a repository checkout.
///
/// Paths are repository-relative with forward slashes; a leading `/` in a
/// configured folder is ignored.
#[derive(Debug, Clone)]
pub struct FsMediaBackend {
    root: PathBuf,
    media_folder: String,
}

impl FsMediaBackend {
    pub fn new(root: impl Into<PathBuf>, media_folder: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            media_folder: media_folder.into(),
        }
    }

    fn resolve(&self, folder: &str) -> PathBuf {
        self.root.join(folder.trim().trim_start_matches('/'))
    }

    fn relative(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    fn walk(&self, folder: &str, depth: usize) -> impl Iterator<Item = walkdir::DirEntry> {
        walkdir::WalkDir::new(self.resolve(folder))
            .min_depth(1)
            .max_depth(depth)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
    }
}

impl MediaBackend for FsMediaBackend {
    fn media_folder(&self) -> &str {
        &self.media_folder
    }

    fn get_media(&self, folder: &str) -> livepane_controller::Result<Vec<MediaFile>> {
        let dir = self.resolve(folder);
        if !dir.is_dir() {
            tracing::debug!(folder, "Media folder does not exist");
            return Ok(Vec::new());
        }

        let mut files: Vec<MediaFile> = self
            .walk(folder, 1)
            .map(|entry| {
                let mut file = MediaFile::at(self.relative(entry.path()));
                file.size = entry.metadata().map(|m| m.len()).unwrap_or(0);
                file
            })
            .collect();
        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    fn entries_by_folder(
        &self,
        folder: &str,
        extension: &str,
        depth: usize,
    ) -> livepane_controller::Result<Vec<String>> {
        let extension = extension.trim_start_matches('.');
        let mut entries: Vec<String> = self
            .walk(folder, depth.max(1))
            .filter(|entry| {
                entry.path().extension().and_then(|e| e.to_str()) == Some(extension)
            })
            .map(|entry| self.relative(entry.path()))
            .collect();
        entries.sort();
        Ok(entries)
    }

    fn list_files(
        &self,
        folder: &str,
        depth: usize,
    ) -> Option<livepane_controller::Result<Vec<FileEntry>>> {
        let files = self
            .walk(folder, depth)
            .map(|entry| FileEntry {
                path: self.relative(entry.path()),
                name: entry.file_name().to_str().map(str::to_string),
                size: entry.metadata().ok().map(|m| m.len()),
                ..FileEntry::default()
            })
            .collect();
        Some(Ok(files))
    }
}

/// Resolved folders and, when requested, the media files below them.
#[derive(Debug, Default)]
pub struct MediaReport {
    pub folders: Vec<String>,
    pub files: Option<Vec<MediaFile>>,
}

/// Resolve the media folders of `config` against the checkout at `root`.
pub fn report(root: &Path, config: CmsConfig, list: bool) -> Result<MediaReport> {
    let media_folder = config
        .media_folder
        .clone()
        .unwrap_or_else(|| DEFAULT_MEDIA_FOLDER.to_string());
    let backend = RecursiveMediaBackend::new(FsMediaBackend::new(root, media_folder), config);

    let folders = backend.resolve_media_folders(None);
    let files = if list {
        Some(backend.get_media(backend.media_folder())?)
    } else {
        None
    };

    Ok(MediaReport { folders, files })
}

/// Run the media-folders command from the repository root.
pub fn run(config_yml: &Path, list: bool) -> Result<()> {
    tracing::info!(?config_yml, list, "Resolving media folders");

    let config = CmsConfig::load(config_yml)
        .wrap_err_with(|| format!("Failed to read {}", config_yml.display()))?;
    let root = Path::new(".");
    let report = report(root, config, list)?;

    println!("Media folders:");
    for folder in &report.folders {
        let dir = root.join(folder.trim_start_matches('/'));
        if dir.is_dir() {
            println!("  ✓ {folder}");
        } else {
            println!("  ⚠ {folder} (missing)");
        }
    }

    if let Some(files) = &report.files {
        println!("\nMedia files:");
        for file in files {
            println!("  {} ({} bytes)", file.path, file.size);
        }
        println!("\n  {} file(s)", files.len());
    }

    Ok(())
}
