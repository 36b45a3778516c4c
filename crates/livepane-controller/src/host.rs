//! Side effects the controller delegates to its environment.
//!
//! In the browser these are `postMessage`, `setTimeout`, the admin form and
//! the clipboard; tests substitute an in-memory host.

use livepane_protocol::Message;

use crate::{
    error::ClipboardError,
    store::{PreviewStore, StoreKey},
};

/// Handle of a scheduled timer.
pub type TimerId = u64;

/// One focusable control of the editor form, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormControl {
    pub name: Option<String>,
    pub id: Option<String>,
    pub aria_label: Option<String>,
}

impl FormControl {
    /// Control with only a `name` attribute.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// First non-blank of name, id and aria-label.
    pub fn identifier(&self) -> Option<&str> {
        [&self.name, &self.id, &self.aria_label]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|value| !value.trim().is_empty())
    }
}

/// How a clipboard write went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardWrite {
    /// The text is on the clipboard.
    Written,
    /// The write completes later; the host reports the result through
    /// [`PreviewController::clipboard_settled`](crate::PreviewController::clipboard_settled).
    Pending,
}

/// Environment of a [`PreviewController`](crate::PreviewController).
pub trait PreviewHost {
    /// Post a message to the store's frame. Returns `false` when no frame is
    /// mounted for the store.
    fn post_to_frame(&mut self, key: &StoreKey, message: &Message) -> bool;

    /// Point the store's frame at `source`.
    fn load_frame(&mut self, key: &StoreKey, source: &str);

    /// Schedule a timer; the host later calls
    /// [`PreviewController::on_timer`](crate::PreviewController::on_timer) with the id.
    fn schedule(&mut self, delay_ms: u64) -> TimerId;

    /// Cancel a scheduled timer. Unknown ids are ignored.
    fn cancel(&mut self, timer: TimerId);

    /// Visible form controls in document order.
    fn controls(&self) -> Vec<FormControl>;

    /// Scroll the control at `index` into view and focus it.
    fn focus_control(&mut self, index: usize) -> bool;

    /// Copy text to the clipboard.
    fn write_clipboard(
        &mut self,
        key: &StoreKey,
        text: &str,
    ) -> Result<ClipboardWrite, ClipboardError>;

    /// Milliseconds since the epoch.
    fn now_ms(&self) -> u64;

    /// Reflect the store's state in its view (toolbar, status, fallback).
    fn store_changed(&mut self, _store: &PreviewStore) {}
}
