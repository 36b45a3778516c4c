//! Markup of the preview pane: toolbar, frame and structured fallback.

use livepane_controller::{PreviewStore, Viewport, entry::UNSUPPORTED_NOTICE};
use livepane_core::Locale;
use livepane_richtext::escape_html;

/// Attribute naming the toolbar action of a button.
pub const ACTION_ATTRIBUTE: &str = "data-cms-action";
/// Attribute carrying the value a toolbar button selects.
pub const VALUE_ATTRIBUTE: &str = "data-cms-value";
/// Attribute carrying the store key on the pane root.
pub const STORE_ATTRIBUTE: &str = "data-cms-store";

const FALLBACK_TITLE: &str = "Visual bridge unavailable. Showing structured fallback.";

fn button(label: &str, action: &str, value: &str, active: bool, id: Option<&str>) -> String {
    let class = if active {
        "cms-preview-toolbar-button is-active"
    } else {
        "cms-preview-toolbar-button"
    };
    let id = id
        .map(|id| format!(r#" id="{}""#, escape_html(id)))
        .unwrap_or_default();

    format!(
        r#"<button type="button"{id} class="{class}" {ACTION_ATTRIBUTE}="{action}" {VALUE_ATTRIBUTE}="{value}">{}</button>"#,
        escape_html(label)
    )
}

fn display(visible: bool) -> &'static str {
    if visible { "block" } else { "none" }
}

/// Preview pane for a store.
pub fn pane_markup(store: &PreviewStore) -> String {
    let ids = store.key.element_ids();
    let mut html = String::new();

    html.push_str(&format!(
        r#"<div id="{}" class="cms-preview-wrapper" {STORE_ATTRIBUTE}="{}">"#,
        ids.root,
        escape_html(store.key.as_str())
    ));
    html.push_str(r#"<div class="cms-preview-toolbar">"#);

    html.push_str(&format!(
        r#"<div class="cms-preview-toolbar-group" id="{}">"#,
        ids.locale_group
    ));
    for locale in Locale::ALL {
        html.push_str(&button(
            locale.label(),
            "locale",
            locale.as_str(),
            store.locale == locale,
            None,
        ));
    }
    html.push_str("</div>");

    html.push_str(&format!(
        r#"<div class="cms-preview-toolbar-group" id="{}">"#,
        ids.viewport_group
    ));
    for viewport in Viewport::ALL {
        html.push_str(&button(
            viewport.label(),
            "viewport",
            viewport.as_str(),
            store.viewport == viewport,
            None,
        ));
    }
    html.push_str("</div>");

    html.push_str(r#"<div class="cms-preview-toolbar-group">"#);
    html.push_str(&button(
        store.highlight_label(),
        "highlight",
        "",
        store.highlight,
        Some(&ids.highlight_button),
    ));
    html.push_str(&format!(
        r#"<span id="{}" class="cms-preview-status {}">{}</span>"#,
        ids.status,
        store.status.css_class(),
        store.status
    ));
    html.push_str("</div></div>");

    html.push_str(&format!(
        r#"<p id="{}" class="cms-preview-note" style="display: {}">{}</p>"#,
        ids.note,
        display(!store.status_note.is_empty()),
        escape_html(&store.status_note)
    ));

    html.push_str(&format!(
        r#"<div class="cms-preview-frame-stage"><div id="{}" class="cms-preview-frame-shell" style="width: {}"><iframe id="{}" class="cms-preview-iframe" src="{}" title="Visual CMS Preview"></iframe></div></div>"#,
        ids.frame_shell,
        store.viewport.width(),
        ids.iframe,
        escape_html(&store.source)
    ));

    html.push_str(&format!(
        r#"<div id="{}" class="cms-preview-fallback" style="display: {}"><p class="cms-preview-fallback-title">{FALLBACK_TITLE}</p><pre id="{}" class="cms-preview-fallback-json">{}</pre></div>"#,
        ids.fallback,
        display(store.fallback_visible),
        ids.fallback_json,
        escape_html(&store.fallback_json())
    ));

    html.push_str("</div>");
    html
}

/// Structured view for entries without a visual preview.
pub fn unsupported_markup(fallback_json: &str) -> String {
    format!(
        r#"<div class="cms-preview-fallback" style="display: block"><p class="cms-preview-fallback-title">{}</p><pre class="cms-preview-fallback-json">{}</pre></div>"#,
        escape_html(UNSUPPORTED_NOTICE),
        escape_html(fallback_json)
    )
}

#[cfg(test)]
mod tests {
    use livepane_controller::{Mode, PreviewStatus, StoreKey};

    use super::*;

    fn store() -> PreviewStore {
        let key = StoreKey::derive(Mode::Apartments, "loft");
        let mut store = PreviewStore::new(key, Mode::Apartments);
        store.source = Mode::Apartments.source("loft");
        store
    }

    #[test]
    fn test_pane_markup_ids_and_toolbar() {
        let html = pane_markup(&store());

        assert!(html.contains(r#"id="cms-preview-iframe-apartments-loft""#));
        assert!(html.contains(r#"data-cms-action="locale" data-cms-value="de""#));
        assert!(html.contains("cms-preview-toolbar-button is-active"));
        assert!(html.contains("Highlight: Off"));
        assert!(html.contains("status-loading"));
        assert!(html.contains("&amp;slug=loft"));
        assert!(html.contains(r#"style="width: 100%""#));
    }

    #[test]
    fn test_pane_markup_reflects_state() {
        let mut store = store();
        store.viewport = Viewport::Mobile;
        store.fallback_visible = true;
        store.set_status(PreviewStatus::RenderWarning, "Preview <bridge> timeout");

        let html = pane_markup(&store);
        assert!(html.contains(r#"style="width: 430px""#));
        assert!(html.contains("status-render-warning"));
        assert!(html.contains("Preview &lt;bridge&gt; timeout"));
        assert!(html.contains(r#"class="cms-preview-fallback" style="display: block""#));
    }

    #[test]
    fn test_unsupported_markup_escapes_json() {
        let html = unsupported_markup(r#"{"title": "<FAQ>"}"#);
        assert!(html.contains("&lt;FAQ&gt;"));
        assert!(html.contains(UNSUPPORTED_NOTICE));
    }
}
