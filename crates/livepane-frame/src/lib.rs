//! Livepane Frame
//!
//! The iframe half of the live-preview bridge. A frame boots from the payload
//! embedded in its page, announces READY, and from then on patches only the
//! regions addressed by content path whenever an UPDATE or SET_LOCALE
//! arrives. Every render is acknowledged; clicks on regions are forwarded to
//! the controller as focus requests.

pub mod channel;
pub mod document;
pub mod format;
pub mod frame;
pub mod highlight;
pub mod render;

pub use channel::ParentChannel;
pub use document::{Document, MemoryDocument, MemoryNode};
pub use frame::{FrameSettings, PreviewFrame};
pub use highlight::{ACTIVE_CLASS, HIGHLIGHTABLE_CLASS, apply_highlights};
pub use render::{GalleryImage, RenderContext, Regions, normalize_images, render_page};
