//! Cross-window message union.

use livepane_core::Locale;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::{
    error::{ProtocolError, Result},
    payload::UpdatePayload,
};

/// Protocol version every message carries; anything else is ignored.
pub const PROTOCOL_VERSION: u64 = 1;

/// Frame finished bootstrapping.
pub const READY: &str = "CMS_PREVIEW_READY";
/// Controller sends a full snapshot.
pub const UPDATE: &str = "CMS_PREVIEW_UPDATE";
/// Controller switches the display locale.
pub const SET_LOCALE: &str = "CMS_PREVIEW_SET_LOCALE";
/// Frame asks the controller to focus a field.
pub const REQUEST_FOCUS: &str = "CMS_PREVIEW_REQUEST_FOCUS";
/// Frame acknowledges a render.
pub const ACK: &str = "CMS_PREVIEW_ACK";

/// All message type strings.
pub const MESSAGE_TYPES: [&str; 5] = [READY, UPDATE, SET_LOCALE, REQUEST_FOCUS, ACK];

/// One message exchanged between controller and frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Message {
    /// Sent once by the frame after load.
    #[serde(rename = "CMS_PREVIEW_READY")]
    Ready {
        #[serde(default)]
        signature: String,
    },

    /// Full entry snapshot.
    #[serde(rename = "CMS_PREVIEW_UPDATE")]
    Update { payload: UpdatePayload },

    /// Locale-only switch for instant feedback.
    #[serde(rename = "CMS_PREVIEW_SET_LOCALE")]
    SetLocale {
        #[serde(default)]
        locale: Locale,
    },

    /// A rendered region was clicked.
    #[serde(rename = "CMS_PREVIEW_REQUEST_FOCUS")]
    RequestFocus {
        #[serde(default)]
        path: String,
    },

    /// Render acknowledgement.
    #[serde(rename = "CMS_PREVIEW_ACK")]
    Ack {
        #[serde(default = "default_ack_status")]
        status: String,
        #[serde(default)]
        message: String,
        #[serde(default)]
        signature: String,
    },
}

fn default_ack_status() -> String {
    "synced".to_string()
}

impl Message {
    /// Wire type string of this message.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Ready { .. } => READY,
            Self::Update { .. } => UPDATE,
            Self::SetLocale { .. } => SET_LOCALE,
            Self::RequestFocus { .. } => REQUEST_FOCUS,
            Self::Ack { .. } => ACK,
        }
    }

    /// Encode into a JSON object carrying the protocol version.
    pub fn encode(&self) -> Result<Value> {
        let mut value = serde_json::to_value(self)?;
        match value.as_object_mut() {
            Some(map) => {
                map.insert("version".to_string(), Value::from(PROTOCOL_VERSION));
                Ok(value)
            }
            None => Err(ProtocolError::NotAnObject(self.type_name())),
        }
    }

    /// Decode a received value.
    ///
    /// Non-objects, missing or mismatched versions, unknown types and
    /// malformed bodies all yield `None`; receivers drop such messages.
    pub fn decode(value: &Value) -> Option<Self> {
        let map = value.as_object()?;

        let version = map.get("version").and_then(Value::as_u64);
        if version != Some(PROTOCOL_VERSION) {
            debug!(?version, "dropping message with mismatched protocol version");
            return None;
        }

        let kind = map.get("type").and_then(Value::as_str)?;
        if !MESSAGE_TYPES.contains(&kind) {
            debug!(kind, "dropping message with unknown type");
            return None;
        }

        match serde_json::from_value(value.clone()) {
            Ok(message) => Some(message),
            Err(err) => {
                debug!(kind, %err, "dropping malformed message");
                None
            }
        }
    }

    /// Decode from JSON text.
    pub fn decode_str(text: &str) -> Option<Self> {
        let value: Value = serde_json::from_str(text).ok()?;
        Self::decode(&value)
    }
}

/// Whether a message from `actual` may be accepted by a page at `expected`.
pub fn accepts_origin(expected: &str, actual: &str) -> bool {
    !expected.is_empty() && expected == actual
}
