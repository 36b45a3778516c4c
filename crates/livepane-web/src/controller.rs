//! Admin-side entry point.

use std::{cell::RefCell, rc::Rc};

use gloo_timers::callback::Timeout;
use js_sys::{Function, Object, Reflect};
use livepane_controller::{
    AssetError, AssetResolver, BridgeSettings, EntrySnapshot, PreviewController, PreviewRoute,
    StoreKey, Viewport, route_entry,
};
use livepane_core::{Config, Locale};
use tracing::{debug, info};
use wasm_bindgen::{JsCast, prelude::*};
use web_sys::{Document, Element, Event, EventTarget, MessageEvent};

use crate::{
    bridge::{document, from_js, page_origin, window},
    error::{Result, WebError},
    host::{BrowserHost, SharedController, form_control, pane_document, with_shared},
    shell::{ACTION_ATTRIBUTE, STORE_ATTRIBUTE, VALUE_ATTRIBUTE, pane_markup, unsupported_markup},
};

/// Resolves media references through the CMS `getAsset` callback.
struct CmsAssets {
    get_asset: Option<Function>,
}

impl AssetResolver for CmsAssets {
    fn resolve(&self, reference: &str) -> std::result::Result<Option<String>, AssetError> {
        let Some(get_asset) = self.get_asset.as_ref() else {
            return Ok(None);
        };

        let asset = get_asset
            .call1(&JsValue::NULL, &JsValue::from_str(reference))
            .map_err(|err| AssetError::new(reference, format!("{err:?}")))?;
        if asset.is_null() || asset.is_undefined() {
            return Ok(None);
        }
        if let Some(url) = asset.as_string() {
            return Ok(Some(url));
        }

        if let Some(object) = asset.dyn_ref::<js_sys::Object>() {
            let text: String = object.to_string().into();
            if !text.is_empty() && text != "[object Object]" {
                return Ok(Some(text));
            }
        }
        Ok(js_sys::Reflect::get(&asset, &JsValue::from_str("url"))
            .ok()
            .and_then(|url| url.as_string()))
    }
}

/// Preview controller running in the CMS admin page.
#[wasm_bindgen]
pub struct PreviewControllerApp {
    controller: SharedController,
    on_message: Option<Closure<dyn FnMut(MessageEvent)>>,
    on_focus: Option<Closure<dyn FnMut(Event)>>,
    toolbar: Option<Rc<ToolbarBinding>>,
}

/// Toolbar click listener, attached to every document that held panes.
///
/// The CMS may create the `#preview-pane` iframe after `start`, and recreate
/// it later, so binding follows the current pane document.
struct ToolbarBinding {
    on_click: Closure<dyn FnMut(Event)>,
    documents: RefCell<Vec<Document>>,
}

impl ToolbarBinding {
    fn new(controller: SharedController) -> Self {
        let on_click = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            toolbar_click(&controller, &event);
        });
        Self {
            on_click,
            documents: RefCell::new(Vec::new()),
        }
    }

    /// Attach to the current pane document unless already attached.
    fn bind(&self) -> Result<()> {
        let document = pane_document().ok_or(WebError::NoWindow)?;
        let mut documents = self.documents.borrow_mut();
        documents.retain(|bound| bound.default_view().is_some());
        if documents.iter().any(|bound| Object::is(bound, &document)) {
            return Ok(());
        }

        document.add_event_listener_with_callback("click", self.on_click.as_ref().unchecked_ref())?;
        debug!(bound = documents.len() + 1, "toolbar listener attached");
        documents.push(document);
        Ok(())
    }

    /// Bind now, and again once the CMS has mounted the returned markup.
    fn bind_soon(self: &Rc<Self>) {
        if let Err(err) = self.bind() {
            debug!(%err, "toolbar listener not attached");
        }
        let binding = Rc::clone(self);
        Timeout::new(0, move || {
            if let Err(err) = binding.bind() {
                debug!(%err, "toolbar listener not attached");
            }
        })
        .forget();
    }
}

impl Drop for ToolbarBinding {
    fn drop(&mut self) {
        let callback = self.on_click.as_ref().unchecked_ref();
        for document in self.documents.get_mut().drain(..) {
            let _ = document.remove_event_listener_with_callback("click", callback);
        }
    }
}

fn read_config(value: JsValue) -> Result<Config> {
    let json = from_js(value)?;
    if json.is_null() {
        return Ok(Config::default());
    }
    let config: Config =
        serde_json::from_value(json).map_err(|err| WebError::invalid("config", err))?;
    config
        .validate()
        .map_err(|err| WebError::invalid("config", err))?;
    Ok(config)
}

#[wasm_bindgen]
impl PreviewControllerApp {
    /// Create the controller; `config` takes the shape of the TOML config.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> std::result::Result<PreviewControllerApp, JsValue> {
        let config = read_config(config)?;
        let origin = page_origin()?;
        let settings = BridgeSettings::from_config(&config).with_origin(origin.clone());

        let controller = Rc::new_cyclic(|weak| {
            RefCell::new(PreviewController::new(
                BrowserHost::new(weak.clone(), origin),
                settings,
            ))
        });

        Ok(Self {
            controller,
            on_message: None,
            on_focus: None,
            toolbar: None,
        })
    }

    /// Install the message, field focus and toolbar listeners once.
    ///
    /// May run before the preview pane exists; `renderEntry` binds the
    /// toolbar to panes created later.
    pub fn start(&mut self) -> std::result::Result<(), JsValue> {
        if self.on_message.is_none() {
            self.listen()?;
        }
        Ok(())
    }

    /// Preview markup for an entry of `collection`.
    ///
    /// Visual previews refresh their store and queue an update.
    #[wasm_bindgen(js_name = renderEntry)]
    pub fn render_entry(
        &self,
        collection: &str,
        slug: &str,
        data: JsValue,
        get_asset: Option<Function>,
    ) -> std::result::Result<String, JsValue> {
        let entry = EntrySnapshot::new(slug, from_js(data)?);

        let PreviewRoute::Visual(mode) = route_entry(collection, &entry) else {
            return Ok(unsupported_markup(&entry.fallback_json()));
        };

        let markup = with_shared(&self.controller, |controller| {
            let key = controller.render_entry(&entry, mode, &CmsAssets { get_asset });
            controller.store(&key).map(pane_markup).unwrap_or_default()
        })
        .ok_or_else(|| WebError::Js("controller busy".to_string()))?;

        if let Some(toolbar) = &self.toolbar {
            toolbar.bind_soon();
        }
        Ok(markup)
    }

    #[wasm_bindgen(js_name = setLocale)]
    pub fn set_locale(&self, key: &str, locale: &str) {
        with_shared(&self.controller, |controller| {
            controller.set_locale(&StoreKey::new(key), Locale::parse_lenient(locale));
        });
    }

    #[wasm_bindgen(js_name = setViewport)]
    pub fn set_viewport(&self, key: &str, viewport: &str) {
        if let Some(viewport) = Viewport::parse(viewport) {
            with_shared(&self.controller, |controller| {
                controller.set_viewport(&StoreKey::new(key), viewport);
            });
        }
    }

    #[wasm_bindgen(js_name = toggleHighlight)]
    pub fn toggle_highlight(&self, key: &str) {
        with_shared(&self.controller, |controller| {
            controller.toggle_highlight(&StoreKey::new(key));
        });
    }

    /// Status label of a store.
    pub fn status(&self, key: &str) -> Option<String> {
        self.controller
            .try_borrow()
            .ok()?
            .store(&StoreKey::new(key))
            .map(|store| store.status.as_str().to_string())
    }
}

/// Event target as an element, whichever window created it.
fn target_element(event: &Event) -> Option<Element> {
    let target: EventTarget = event.target()?;
    Reflect::has(&target, &JsValue::from_str("closest"))
        .unwrap_or(false)
        .then(|| target.unchecked_into())
}

fn toolbar_click(controller: &SharedController, event: &Event) {
    let Some(button) = target_element(event)
        .and_then(|target| target.closest(&format!("[{ACTION_ATTRIBUTE}]")).ok().flatten())
    else {
        return;
    };
    let Some(key) = button
        .closest(&format!("[{STORE_ATTRIBUTE}]"))
        .ok()
        .flatten()
        .and_then(|root| root.get_attribute(STORE_ATTRIBUTE))
        .map(StoreKey::new)
    else {
        return;
    };
    let action = button.get_attribute(ACTION_ATTRIBUTE).unwrap_or_default();
    let value = button.get_attribute(VALUE_ATTRIBUTE).unwrap_or_default();

    with_shared(controller, |controller| match action.as_str() {
        "locale" => controller.set_locale(&key, Locale::parse_lenient(&value)),
        "viewport" => {
            if let Some(viewport) = Viewport::parse(&value) {
                controller.set_viewport(&key, viewport);
            }
        }
        "highlight" => controller.toggle_highlight(&key),
        other => debug!(action = other, "unknown toolbar action"),
    });
}

impl PreviewControllerApp {
    fn listen(&mut self) -> Result<()> {
        let controller = Rc::clone(&self.controller);
        let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            let Some(source) = event.source() else {
                return;
            };
            with_shared(&controller, |controller| {
                let keys: Vec<StoreKey> =
                    controller.stores().map(|store| store.key.clone()).collect();
                let Some(key) = controller.host().store_for_window(&keys, &source) else {
                    return;
                };
                match from_js(event.data()) {
                    Ok(data) => controller.handle_message(&event.origin(), &key, &data),
                    Err(err) => debug!(%err, "dropping unreadable message"),
                }
            });
        });
        window()?
            .add_event_listener_with_callback("message", on_message.as_ref().unchecked_ref())?;

        let controller = Rc::clone(&self.controller);
        let on_focus = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(target) = target_element(&event) else {
                return;
            };
            with_shared(&controller, |controller| {
                controller.handle_field_focus(&form_control(&target));
            });
        });
        document()?.add_event_listener_with_callback_and_bool(
            "focusin",
            on_focus.as_ref().unchecked_ref(),
            true,
        )?;

        let toolbar = Rc::new(ToolbarBinding::new(Rc::clone(&self.controller)));
        toolbar.bind()?;

        info!("preview controller listening");
        self.on_message = Some(on_message);
        self.on_focus = Some(on_focus);
        self.toolbar = Some(toolbar);
        Ok(())
    }
}

impl Drop for PreviewControllerApp {
    fn drop(&mut self) {
        if let (Some(on_message), Ok(window)) = (self.on_message.take(), window()) {
            let _ = window
                .remove_event_listener_with_callback("message", on_message.as_ref().unchecked_ref());
        }
        if let (Some(on_focus), Ok(document)) = (self.on_focus.take(), document()) {
            let _ = document.remove_event_listener_with_callback_and_bool(
                "focusin",
                on_focus.as_ref().unchecked_ref(),
                true,
            );
        }
    }
}
