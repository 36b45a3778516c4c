use livepane_frame::ParentChannel;
use livepane_protocol::Message;
use tracing::debug;
use web_sys::Window;

use crate::bridge::encode_message;

/// `postMessage` link to the admin window embedding the frame.
#[derive(Debug, Clone)]
pub struct ParentWindow {
    parent: Option<Window>,
    origin: String,
}

impl ParentWindow {
    /// Link to the parent of `window`, restricted to `origin`.
    pub fn of(window: &Window, origin: impl Into<String>) -> Self {
        let parent = window.parent().ok().flatten();
        Self {
            parent,
            origin: origin.into(),
        }
    }
}

impl ParentChannel for ParentWindow {
    fn post_to_parent(&mut self, message: &Message) -> bool {
        let Some(parent) = self.parent.as_ref() else {
            return false;
        };

        let posted = encode_message(message)
            .and_then(|value| Ok(parent.post_message(&value, &self.origin)?));
        match posted {
            Ok(()) => true,
            Err(err) => {
                debug!(kind = message.type_name(), %err, "cannot post to parent");
                false
            }
        }
    }
}
