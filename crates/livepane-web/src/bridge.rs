//! Conversions between JSON values and JavaScript values.

use livepane_protocol::Message;
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::JsValue;
use web_sys::{Document, Window};

use crate::error::{Result, WebError};

pub(crate) fn window() -> Result<Window> {
    web_sys::window().ok_or(WebError::NoWindow)
}

pub(crate) fn document() -> Result<Document> {
    window()?.document().ok_or(WebError::NoWindow)
}

/// Origin of the current page.
pub(crate) fn page_origin() -> Result<String> {
    Ok(window()?.location().origin()?)
}

/// Plain JavaScript object for a JSON value.
pub(crate) fn to_js(value: &Value) -> Result<JsValue> {
    Ok(value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?)
}

pub(crate) fn from_js(value: JsValue) -> Result<Value> {
    if value.is_undefined() || value.is_null() {
        return Ok(Value::Null);
    }
    Ok(serde_wasm_bindgen::from_value(value)?)
}

/// Wire form of a message, ready for `postMessage`.
pub(crate) fn encode_message(message: &Message) -> Result<JsValue> {
    to_js(&message.encode()?)
}
