//! Controller host backed by the admin page.

use std::{
    cell::RefCell,
    collections::HashMap,
    rc::{Rc, Weak},
};

use gloo_timers::callback::Timeout;
use js_sys::{Function, Promise, Reflect};
use livepane_controller::{
    ClipboardError, ClipboardWrite, FormControl, PreviewController, PreviewHost, PreviewStore,
    StoreKey, TimerId,
};
use livepane_protocol::Message;
use tracing::debug;
use wasm_bindgen::{JsCast, prelude::*};
use web_sys::{Element, HtmlElement, HtmlIFrameElement, Window};

use crate::{
    bridge::{document, encode_message, window},
    shell::VALUE_ATTRIBUTE,
};

/// Controller type driven from the browser.
pub type BrowserController = PreviewController<BrowserHost>;

/// Elements of the editor form that can take focus.
const CONTROL_SELECTOR: &str = r#"input, textarea, select, [contenteditable="true"]"#;

/// Id of the iframe some CMS builds render the preview pane into.
const PREVIEW_PANE_ID: &str = "preview-pane";

/// Document holding the preview panes.
pub(crate) fn pane_document() -> Option<web_sys::Document> {
    let document = document().ok()?;
    let pane = document
        .get_element_by_id(PREVIEW_PANE_ID)
        .and_then(|element| element.dyn_into::<HtmlIFrameElement>().ok())
        .and_then(|iframe| iframe.content_document());
    pane.or(Some(document))
}

fn form_controls() -> Vec<Element> {
    let Ok(list) = document().and_then(|document| Ok(document.query_selector_all(CONTROL_SELECTOR)?))
    else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|index| list.item(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

/// Form control description of an element.
pub(crate) fn form_control(element: &Element) -> FormControl {
    FormControl {
        name: element.get_attribute("name"),
        id: element.get_attribute("id"),
        aria_label: element.get_attribute("aria-label"),
    }
}

/// Side effects of a [`BrowserController`].
pub struct BrowserHost {
    controller: Weak<RefCell<BrowserController>>,
    origin: String,
    timers: HashMap<TimerId, Timeout>,
    next_timer: TimerId,
}

impl BrowserHost {
    pub fn new(controller: Weak<RefCell<BrowserController>>, origin: impl Into<String>) -> Self {
        Self {
            controller,
            origin: origin.into(),
            timers: HashMap::new(),
            next_timer: 0,
        }
    }

    fn iframe(&self, key: &StoreKey) -> Option<HtmlIFrameElement> {
        pane_document()?
            .get_element_by_id(&key.element_ids().iframe)
            .filter(|element| element.tag_name().eq_ignore_ascii_case("iframe"))
            .map(JsCast::unchecked_into)
    }

    /// Key of the store whose frame is `source`.
    pub fn store_for_window(&self, stores: &[StoreKey], source: &JsValue) -> Option<StoreKey> {
        stores
            .iter()
            .find(|key| {
                self.iframe(key)
                    .and_then(|iframe| iframe.content_window())
                    .is_some_and(|window: Window| js_sys::Object::is(source, window.as_ref()))
            })
            .cloned()
    }
}

/// Run `f` on the controller unless a caller further up the stack holds it.
pub(crate) fn with_shared<R>(
    controller: &SharedController,
    f: impl FnOnce(&mut BrowserController) -> R,
) -> Option<R> {
    match controller.try_borrow_mut() {
        Ok(mut controller) => Some(f(&mut controller)),
        Err(_) => {
            debug!("controller busy, dropping callback");
            None
        }
    }
}

fn with_controller(weak: &Weak<RefCell<BrowserController>>, f: impl FnOnce(&mut BrowserController)) {
    if let Some(controller) = weak.upgrade() {
        with_shared(&controller, f);
    }
}

/// Element of a pane document as an `HtmlElement`.
///
/// Panes may live in the `#preview-pane` iframe, whose elements fail
/// `instanceof` checks against this window.
fn html_element(element: Element) -> HtmlElement {
    element.unchecked_into()
}

fn show(element: &Element, visible: bool) {
    let display = if visible { "block" } else { "none" };
    let _ = html_element(element.clone())
        .style()
        .set_property("display", display);
}

fn mark_active_buttons(document: &web_sys::Document, group_id: &str, active: &str) {
    let Some(group) = document.get_element_by_id(group_id) else {
        return;
    };
    let Ok(buttons) = group.query_selector_all(&format!("[{VALUE_ATTRIBUTE}]")) else {
        return;
    };
    for button in (0..buttons.length())
        .filter_map(|index| buttons.item(index))
        .map(JsCast::unchecked_into::<Element>)
    {
        let is_active = button.get_attribute(VALUE_ATTRIBUTE).as_deref() == Some(active);
        let _ = button.class_list().toggle_with_force("is-active", is_active);
    }
}

impl PreviewHost for BrowserHost {
    fn post_to_frame(&mut self, key: &StoreKey, message: &Message) -> bool {
        let Some(target) = self.iframe(key).and_then(|iframe| iframe.content_window()) else {
            return false;
        };

        let posted = encode_message(message)
            .and_then(|value| Ok(target.post_message(&value, &self.origin)?));
        match posted {
            Ok(()) => true,
            Err(err) => {
                debug!(store = %key, %err, "cannot post to frame");
                false
            }
        }
    }

    fn load_frame(&mut self, key: &StoreKey, source: &str) {
        if let Some(iframe) = self.iframe(key) {
            if iframe.get_attribute("src").as_deref() != Some(source) {
                iframe.set_src(source);
            }
        }
    }

    fn schedule(&mut self, delay_ms: u64) -> TimerId {
        self.next_timer += 1;
        let id = self.next_timer;
        let controller = self.controller.clone();

        let timeout = Timeout::new(u32::try_from(delay_ms).unwrap_or(u32::MAX), move || {
            with_controller(&controller, |controller| {
                controller.host_mut().timers.remove(&id);
                controller.on_timer(id);
            });
        });
        self.timers.insert(id, timeout);
        id
    }

    fn cancel(&mut self, timer: TimerId) {
        // Dropping a pending timeout clears it.
        self.timers.remove(&timer);
    }

    fn controls(&self) -> Vec<FormControl> {
        form_controls().iter().map(form_control).collect()
    }

    fn focus_control(&mut self, index: usize) -> bool {
        let Some(control) = form_controls().into_iter().nth(index).map(html_element) else {
            return false;
        };

        // focus() dispatches focusin synchronously, and the focusin listener
        // needs the controller this call is borrowed from.
        Timeout::new(0, move || {
            control.scroll_into_view_with_bool(false);
            if let Err(err) = control.focus() {
                debug!(?err, "cannot focus form control");
            }
        })
        .forget();
        true
    }

    fn write_clipboard(
        &mut self,
        key: &StoreKey,
        text: &str,
    ) -> Result<ClipboardWrite, ClipboardError> {
        let navigator = window()
            .map_err(|_| ClipboardError::Unavailable)?
            .navigator();
        let clipboard = Reflect::get(&navigator, &JsValue::from_str("clipboard"))
            .ok()
            .filter(|clipboard| clipboard.is_object())
            .ok_or(ClipboardError::Unavailable)?;
        let write_text = Reflect::get(&clipboard, &JsValue::from_str("writeText"))
            .ok()
            .and_then(|write| write.dyn_into::<Function>().ok())
            .ok_or(ClipboardError::Unavailable)?;

        let promise = write_text
            .call1(&clipboard, &JsValue::from_str(text))
            .map_err(|err| ClipboardError::Rejected(format!("{err:?}")))?
            .dyn_into::<Promise>()
            .map_err(|_| ClipboardError::Rejected("writeText returned no promise".to_string()))?;

        let settle = |copied: bool| {
            let controller = self.controller.clone();
            let key = key.clone();
            let path = text.to_string();
            Closure::once(move |_: JsValue| {
                with_controller(&controller, |controller| {
                    controller.clipboard_settled(&key, &path, copied);
                });
            })
        };
        let on_copied = settle(true);
        let on_failed = settle(false);
        let _ = promise.then2(&on_copied, &on_failed);
        on_copied.forget();
        on_failed.forget();

        Ok(ClipboardWrite::Pending)
    }

    fn now_ms(&self) -> u64 {
        js_sys::Date::now() as u64
    }

    fn store_changed(&mut self, store: &PreviewStore) {
        let Some(document) = pane_document() else {
            return;
        };
        let ids = store.key.element_ids();

        if let Some(status) = document.get_element_by_id(&ids.status) {
            status.set_class_name(&format!("cms-preview-status {}", store.status.css_class()));
            status.set_text_content(Some(store.status.as_str()));
        }
        if let Some(note) = document.get_element_by_id(&ids.note) {
            note.set_text_content(Some(&store.status_note));
            show(&note, !store.status_note.is_empty());
        }
        if let Some(fallback) = document.get_element_by_id(&ids.fallback) {
            show(&fallback, store.fallback_visible);
        }
        if let Some(json) = document.get_element_by_id(&ids.fallback_json) {
            json.set_text_content(Some(&store.fallback_json()));
        }
        if let Some(shell) = document.get_element_by_id(&ids.frame_shell).map(html_element) {
            let _ = shell.style().set_property("width", store.viewport.width());
        }
        if let Some(button) = document.get_element_by_id(&ids.highlight_button) {
            let _ = button.class_list().toggle_with_force("is-active", store.highlight);
            button.set_text_content(Some(store.highlight_label()));
        }

        mark_active_buttons(&document, &ids.locale_group, store.locale.as_str());
        mark_active_buttons(&document, &ids.viewport_group, store.viewport.as_str());
    }
}

/// Shared handle passed to event listeners.
pub(crate) type SharedController = Rc<RefCell<BrowserController>>;
