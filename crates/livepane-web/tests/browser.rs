//! Browser tests, run with `wasm-pack test --headless --firefox`.

#![cfg(target_arch = "wasm32")]

use gloo_timers::future::TimeoutFuture;
use livepane_core::{Locale, PageKind};
use livepane_frame::{Document, FrameSettings, PreviewFrame, HIGHLIGHTABLE_CLASS};
use livepane_protocol::{Bootstrap, Message, UpdatePayload};
use livepane_web::{BrowserDocument, PreviewControllerApp};
use serde_json::json;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;
use web_sys::{HtmlElement, HtmlIFrameElement, MessageEvent, MessageEventInit};

wasm_bindgen_test_configure!(run_in_browser);

fn mount(markup: &str) -> web_sys::Document {
    let document = web_sys::window().unwrap().document().unwrap();
    document.body().unwrap().set_inner_html(markup);
    document
}

#[wasm_bindgen_test]
fn test_browser_document_patches_regions() {
    let document = mount(
        r#"<h1 data-cms-path="hero.headline">Alt</h1><img data-cms-path="hero.images.desktop">"#,
    );
    let mut browser = BrowserDocument::new(document.clone());

    let node = browser.query(r#"[data-cms-path="hero.headline"]"#).unwrap();
    browser.set_text(&node, "Hallo");
    browser.toggle_class(&node, HIGHLIGHTABLE_CLASS, true);

    assert_eq!(node.text_content().as_deref(), Some("Hallo"));
    assert!(node.class_list().contains(HIGHLIGHTABLE_CLASS));
    assert_eq!(browser.path_nodes().len(), 2);
}

#[wasm_bindgen_test]
fn test_frame_renders_into_live_dom() {
    let document = mount(r#"<h1 data-cms-path="hero.headline"><span>Alt</span></h1>"#);

    let mut payload = UpdatePayload::new(PageKind::Home);
    payload.data = json!({"hero": {"headline": {"de": "Hallo", "en": "Hi"}}});
    let bootstrap = Bootstrap::for_page(PageKind::Home, Locale::De).with_initial_payload(payload);

    let mut frame = PreviewFrame::new(
        bootstrap,
        BrowserDocument::new(document.clone()),
        Vec::<Message>::new(),
        FrameSettings::default(),
    );
    frame.start();
    frame.set_locale(Locale::En);

    let headline = document
        .query_selector(r#"[data-cms-path="hero.headline"]"#)
        .unwrap()
        .unwrap();
    assert_eq!(headline.text_content().as_deref(), Some("Hi"));

    let inner = headline.query_selector("span").unwrap();
    assert!(inner.is_none());
    assert_eq!(BrowserDocument::path_of(&headline).as_deref(), Some("hero.headline"));
}

const LOFT: &str = "apartments-loft";

fn entry_data() -> JsValue {
    js_sys::JSON::parse(r#"{"name": {"de": "Loft"}}"#).unwrap()
}

fn iframe(document: &web_sys::Document, id: &str) -> HtmlIFrameElement {
    document.get_element_by_id(id).unwrap().unchecked_into()
}

#[wasm_bindgen_test]
async fn test_focus_request_focuses_control_and_keeps_controller_usable() {
    let mut app = PreviewControllerApp::new(JsValue::NULL).unwrap();
    app.start().unwrap();
    let markup = app
        .render_entry("apartments", "loft", entry_data(), None)
        .unwrap();
    let document = mount(&format!(r#"<input name="name">{markup}"#));

    let frame = iframe(&document, "cms-preview-iframe-apartments-loft");
    let data = js_sys::JSON::parse(
        r#"{"version": 1, "type": "CMS_PREVIEW_REQUEST_FOCUS", "path": "name"}"#,
    )
    .unwrap();
    let init = MessageEventInit::new();
    init.set_data(&data);
    init.set_origin(&web_sys::window().unwrap().location().origin().unwrap());
    init.set_source(frame.content_window().map(js_sys::Object::from).as_ref());
    let event = MessageEvent::new_with_event_init_dict("message", &init).unwrap();
    web_sys::window().unwrap().dispatch_event(&event).unwrap();

    // focus runs on the next tick and its focusin reaches the idle controller
    TimeoutFuture::new(10).await;

    let input = document.query_selector(r#"input[name="name"]"#).unwrap().unwrap();
    assert_eq!(document.active_element(), Some(input));
    assert_eq!(app.status(LOFT).as_deref(), Some("synced"));

    app.toggle_highlight(LOFT);
    let button = document
        .get_element_by_id("cms-preview-highlight-apartments-loft")
        .unwrap();
    assert!(button.class_list().contains("is-active"));
}

#[wasm_bindgen_test]
async fn test_toolbar_bound_to_pane_created_after_start() {
    let mut app = PreviewControllerApp::new(JsValue::NULL).unwrap();
    app.start().unwrap();

    let document = mount(r#"<iframe id="preview-pane"></iframe>"#);
    let pane = iframe(&document, "preview-pane").content_document().unwrap();
    let markup = app
        .render_entry("apartments", "loft", entry_data(), None)
        .unwrap();
    pane.body().unwrap().set_inner_html(&markup);
    TimeoutFuture::new(10).await;

    let button = pane
        .query_selector(r#"[data-cms-action="highlight"]"#)
        .unwrap()
        .unwrap();
    button.clone().unchecked_into::<HtmlElement>().click();

    assert!(button.class_list().contains("is-active"));
    assert_eq!(button.text_content().as_deref(), Some("Highlight: On"));

    let mobile = pane
        .query_selector(r#"[data-cms-action="viewport"][data-cms-value="mobile"]"#)
        .unwrap()
        .unwrap();
    mobile.clone().unchecked_into::<HtmlElement>().click();
    assert!(mobile.class_list().contains("is-active"));
}
