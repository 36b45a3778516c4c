//! Livepane Web
//!
//! WebAssembly bindings of the preview bridge. The same module serves both
//! windows:
//!
//! - **PreviewControllerApp** runs in the CMS admin page, renders the preview
//!   pane markup for each entry and drives its iframe.
//! - **PreviewFrameApp** runs inside the preview iframe and patches the page
//!   template as snapshots arrive.
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { PreviewFrameApp } from 'livepane-web';
//!
//! await init();
//! const frame = new PreviewFrameApp(window.__CMS_PREVIEW_BOOTSTRAP__);
//! frame.start();
//! ```

mod bridge;
pub mod controller;
pub mod document;
pub mod error;
pub mod frame;
pub mod host;
pub mod parent;
pub mod shell;

pub use controller::PreviewControllerApp;
pub use document::BrowserDocument;
pub use error::{Result, WebError};
pub use frame::PreviewFrameApp;
pub use host::{BrowserController, BrowserHost};
pub use parent::ParentWindow;
use wasm_bindgen::prelude::*;

/// Initialize the WASM module.
///
/// Installs the panic hook and routes log output to the console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Debug);
}

/// Protocol version spoken by this build.
#[wasm_bindgen(js_name = protocolVersion)]
pub fn protocol_version() -> u32 {
    livepane_protocol::PROTOCOL_VERSION as u32
}

/// Get the version of the library.
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_version() {
        let version = get_version();
        assert!(!version.is_empty());
        assert!(version.starts_with("0."));
    }

    #[test]
    fn test_protocol_version() {
        assert_eq!(protocol_version(), 1);
    }
}
