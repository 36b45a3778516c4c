//! Outlines for editable regions.

use livepane_core::path_selector;

use crate::document::Document;

/// Class marking every region as editable while highlighting is on.
pub const HIGHLIGHTABLE_CLASS: &str = "cms-preview-highlightable";
/// Class marking the region of the focused form field.
pub const ACTIVE_CLASS: &str = "cms-preview-highlight-active";

/// Outline regions when `highlight` is on and emphasize the active path.
///
/// The active region is scrolled into view.
pub fn apply_highlights<D: Document>(document: &mut D, highlight: bool, active_path: Option<&str>) {
    for node in document.path_nodes() {
        document.toggle_class(&node, HIGHLIGHTABLE_CLASS, highlight);
        document.toggle_class(&node, ACTIVE_CLASS, false);
    }

    if !highlight {
        return;
    }
    let Some(path) = active_path.filter(|path| !path.is_empty()) else {
        return;
    };

    if let Some(node) = document.query(&path_selector(path)) {
        document.toggle_class(&node, ACTIVE_CLASS, true);
        document.scroll_into_view(&node);
    }
}
