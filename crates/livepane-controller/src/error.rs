//! Error types for the preview controller.
//!
//! None of these reach the host as a failed operation: the controller turns
//! them into a store status and note. They exist so the seams (asset
//! resolvers, media backends, the clipboard) can report what went wrong.

use thiserror::Error;

/// Result type alias for media library operations.
pub type Result<T> = std::result::Result<T, MediaError>;

/// Failure of a media library backend.
#[derive(Error, Debug)]
pub enum MediaError {
    /// Filesystem access failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The CMS configuration could not be parsed.
    #[error("CMS config error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A folder could not be listed.
    #[error("cannot read media folder {folder}: {message}")]
    Folder { folder: String, message: String },

    /// The backend reported a failure of its own.
    #[error("media backend error: {0}")]
    Backend(String),
}

impl MediaError {
    /// Create a folder listing error.
    pub fn folder(folder: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Folder {
            folder: folder.into(),
            message: message.into(),
        }
    }
}

/// A media reference could not be resolved to a URL.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot resolve asset {reference}: {message}")]
pub struct AssetError {
    /// Raw reference as written in the entry.
    pub reference: String,
    /// What went wrong.
    pub message: String,
}

impl AssetError {
    /// Create a new asset error.
    pub fn new(reference: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            message: message.into(),
        }
    }
}

/// The host clipboard refused a write.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClipboardError {
    /// No clipboard API is available.
    #[error("clipboard is unavailable")]
    Unavailable,

    /// The write was rejected.
    #[error("clipboard write failed: {0}")]
    Rejected(String),
}
