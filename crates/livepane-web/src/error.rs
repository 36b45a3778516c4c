//! Errors of the browser bindings.

use livepane_protocol::ProtocolError;
use thiserror::Error;
use wasm_bindgen::JsValue;

/// Result type for browser operations.
pub type Result<T> = std::result::Result<T, WebError>;

/// Failures at the JavaScript boundary.
#[derive(Debug, Error)]
pub enum WebError {
    /// No `window` or `document` in this context.
    #[error("no browser window available")]
    NoWindow,

    /// A value passed from JavaScript had the wrong shape.
    #[error("invalid {what}: {message}")]
    Invalid { what: &'static str, message: String },

    /// Message encoding failed.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// A JavaScript call threw.
    #[error("javascript error: {0}")]
    Js(String),
}

impl WebError {
    pub fn invalid(what: &'static str, message: impl ToString) -> Self {
        Self::Invalid {
            what,
            message: message.to_string(),
        }
    }
}

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
    }
}

impl From<serde_wasm_bindgen::Error> for WebError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        Self::invalid("value", err)
    }
}

impl From<WebError> for JsValue {
    fn from(err: WebError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
