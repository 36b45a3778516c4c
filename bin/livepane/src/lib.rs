//! Livepane CLI Library
//!
//! Build-time tooling for the live-preview bridge, used by the `livepane`
//! binary.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (check, bootstrap, media-folders)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use livepane::cmd;
//!
//! // Check built pages against the content-path contract
//! cmd::check::run(Path::new("config.toml"), Path::new("dist"), false).unwrap();
//! ```

use std::path::Path;

pub mod cmd;

pub use livepane_core::{Config, PageKind};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
///
/// # Example
///
/// ```no_run
/// livepane::init_tracing(2); // Enable DEBUG level logging
/// ```
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}

/// Load the configuration if the file exists, defaults otherwise.
///
/// A file that exists but does not parse is an error.
pub fn load_config(path: &Path) -> livepane_core::Result<Config> {
    if !path.exists() {
        tracing::info!(?path, "No configuration file, using defaults");
        return Ok(Config::default());
    }
    Config::load_with_env(path)
}
