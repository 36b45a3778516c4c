//! The frame document as seen through `web_sys`.

use livepane_core::field_map::PATH_ATTRIBUTE;
use livepane_frame::Document;
use tracing::debug;
use wasm_bindgen::JsCast;
use web_sys::{Element, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition};

/// Live DOM of the preview page.
#[derive(Debug, Clone)]
pub struct BrowserDocument {
    document: web_sys::Document,
}

impl BrowserDocument {
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }

    /// Content path of the nearest addressable ancestor of `element`.
    pub fn path_of(element: &Element) -> Option<String> {
        let selector = format!("[{PATH_ATTRIBUTE}]");
        element
            .closest(&selector)
            .ok()
            .flatten()
            .and_then(|node| node.get_attribute(PATH_ATTRIBUTE))
    }
}

impl Document for BrowserDocument {
    type Node = Element;

    fn query(&self, selector: &str) -> Option<Element> {
        match self.document.query_selector(selector) {
            Ok(found) => found,
            Err(err) => {
                debug!(selector, ?err, "invalid selector");
                None
            }
        }
    }

    fn path_nodes(&self) -> Vec<Element> {
        let Ok(list) = self
            .document
            .query_selector_all(&format!("[{PATH_ATTRIBUTE}]"))
        else {
            return Vec::new();
        };

        (0..list.length())
            .filter_map(|index| list.item(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn set_text(&mut self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn set_inner_html(&mut self, node: &Element, html: &str) {
        node.set_inner_html(html);
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) {
        if let Err(err) = node.set_attribute(name, value) {
            debug!(name, ?err, "cannot set attribute");
        }
    }

    fn remove_attribute(&mut self, node: &Element, name: &str) {
        if let Err(err) = node.remove_attribute(name) {
            debug!(name, ?err, "cannot remove attribute");
        }
    }

    fn toggle_class(&mut self, node: &Element, class: &str, on: bool) {
        if let Err(err) = node.class_list().toggle_with_force(class, on) {
            debug!(class, ?err, "cannot toggle class");
        }
    }

    fn scroll_into_view(&mut self, node: &Element) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Center);
        node.scroll_into_view_with_scroll_into_view_options(&options);
    }
}
