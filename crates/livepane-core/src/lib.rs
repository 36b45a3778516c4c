//! Livepane Core Library
//!
//! Shared types for the CMS live-preview bridge: configuration, locales and
//! bilingual values, page kinds, content-path field maps and the markup
//! contract check.

pub mod config;
pub mod content;
pub mod contract;
pub mod error;
pub mod field_map;
pub mod locale;
pub mod page;

pub use config::Config;
pub use contract::{ContractBreak, ContractReport, check_markup};
pub use error::{CoreError, Result};
pub use field_map::{field_map, path_selector, required_paths};
pub use locale::{Locale, localized};
pub use page::{Collection, PageKind};
