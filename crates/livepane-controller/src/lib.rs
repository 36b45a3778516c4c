//! Livepane Controller
//!
//! The admin half of the live-preview bridge. Each open editor entry gets a
//! preview store; edits are snapshotted into UPDATE payloads, debounced, and
//! posted to the entry's preview frame once it has reported READY. Focus
//! requests coming back from the frame are mapped onto form controls.
//!
//! The controller is host-agnostic: timers, message posting, form access and
//! the clipboard are provided through [`PreviewHost`].

pub mod assets;
pub mod controller;
pub mod entry;
pub mod error;
pub mod focus;
pub mod host;
pub mod media;
pub mod store;

pub use assets::{AssetResolver, IdentityResolver, MediaHeuristic};
pub use controller::{BridgeSettings, PreviewController};
pub use entry::{EntrySnapshot, PreviewRoute, route_entry};
pub use error::{AssetError, ClipboardError, MediaError, Result};
pub use host::{ClipboardWrite, FormControl, PreviewHost, TimerId};
pub use media::{CmsConfig, MediaBackend, MediaFile, RecursiveMediaBackend};
pub use store::{Mode, PreviewStatus, PreviewStore, StoreKey, Viewport};
