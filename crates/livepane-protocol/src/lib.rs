//! Livepane Protocol
//!
//! Message types shared verbatim by the preview controller (admin side) and
//! the preview frame (iframe side). The version constant and the five type
//! strings are a contract: changing them requires updating both sides, and a
//! receiver drops anything whose version does not match exactly.

pub mod bootstrap;
pub mod error;
pub mod message;
pub mod payload;
pub mod rich_text;

pub use bootstrap::Bootstrap;
pub use error::{ProtocolError, Result};
pub use message::{Message, PROTOCOL_VERSION, accepts_origin};
pub use payload::UpdatePayload;
pub use rich_text::{RICH_TEXT_SIGNATURE, RichTextConfig};
