//! Error types for the Livepane core library.

use std::path::PathBuf;

use thiserror::Error;

use crate::{contract::ContractBreak, page::PageKind};

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types for Livepane.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration loading or parsing error.
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Rendered markup breaks the content-path contract of its page.
    #[error("{page} markup breaks the content-path contract in {} place(s)", breaks.len())]
    Contract {
        page: PageKind,
        breaks: Vec<ContractBreak>,
    },

    /// Entry frontmatter could not be read.
    #[error("Frontmatter error in {path}: {message}")]
    Frontmatter { path: PathBuf, message: String },

    /// File system I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic configuration crate error.
    #[error("Config crate error: {0}")]
    ConfigCrate(#[from] config::ConfigError),
}

impl CoreError {
    /// Create a new configuration error with a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source.
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new frontmatter error.
    pub fn frontmatter(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Frontmatter {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error() {
        let err = CoreError::config("missing origin");
        assert!(err.to_string().contains("Configuration error"));
        assert!(err.to_string().contains("missing origin"));
    }

    #[test]
    fn test_frontmatter_error() {
        let err = CoreError::frontmatter("content/apartments/rheinblick.md", "bad yaml");
        assert!(err.to_string().contains("Frontmatter error"));
        assert!(err.to_string().contains("rheinblick.md"));
    }

    #[test]
    fn test_contract_error() {
        let err = CoreError::Contract {
            page: PageKind::Guide,
            breaks: vec![
                ContractBreak::Missing("hero.headline".to_string()),
                ContractBreak::Duplicated("faq".to_string(), 3),
            ],
        };
        assert_eq!(
            err.to_string(),
            "guide markup breaks the content-path contract in 2 place(s)"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: CoreError = io_err.into();
        assert!(err.to_string().contains("IO error"));
    }
}
