//! Frame-side entry point.

use std::{cell::RefCell, rc::Rc};

use livepane_frame::{FrameSettings, PreviewFrame};
use livepane_protocol::Bootstrap;
use tracing::{debug, info};
use wasm_bindgen::{JsCast, prelude::*};
use web_sys::{Element, Event, MessageEvent};

use crate::{
    bridge::{document, from_js, page_origin, window},
    document::BrowserDocument,
    error::{Result, WebError},
    parent::ParentWindow,
};

/// Global the preview page embeds its bootstrap in.
const BOOTSTRAP_GLOBAL: &str = "__CMS_PREVIEW_BOOTSTRAP__";

type Frame = PreviewFrame<BrowserDocument, ParentWindow>;

/// Preview frame running inside the preview iframe.
#[wasm_bindgen]
pub struct PreviewFrameApp {
    frame: Rc<RefCell<Frame>>,
    on_message: Option<Closure<dyn FnMut(MessageEvent)>>,
    on_click: Option<Closure<dyn FnMut(Event)>>,
}

fn read_bootstrap(value: JsValue) -> Result<Bootstrap> {
    let value = if value.is_undefined() || value.is_null() {
        js_sys::Reflect::get(window()?.as_ref(), &JsValue::from_str(BOOTSTRAP_GLOBAL))?
    } else {
        value
    };

    let json = from_js(value)?;
    if json.is_null() {
        return Err(WebError::invalid("bootstrap", "no bootstrap embedded"));
    }
    serde_json::from_value(json).map_err(|err| WebError::invalid("bootstrap", err))
}

#[wasm_bindgen]
impl PreviewFrameApp {
    /// Create the frame from a bootstrap object, or from the embedded global
    /// when none is given.
    #[wasm_bindgen(constructor)]
    pub fn new(bootstrap: JsValue) -> std::result::Result<PreviewFrameApp, JsValue> {
        let bootstrap = read_bootstrap(bootstrap)?;
        let origin = page_origin()?;
        let parent = ParentWindow::of(&window()?, origin.clone());
        let settings = FrameSettings::default().with_origin(origin);

        let frame = PreviewFrame::new(
            bootstrap,
            BrowserDocument::new(document()?),
            parent,
            settings,
        );

        Ok(Self {
            frame: Rc::new(RefCell::new(frame)),
            on_message: None,
            on_click: None,
        })
    }

    /// Install listeners, paint the embedded payload and send READY.
    pub fn start(&mut self) -> std::result::Result<(), JsValue> {
        if self.on_message.is_none() {
            self.listen()?;
        }
        self.frame.borrow_mut().start();
        Ok(())
    }

    /// Page template this frame renders.
    #[wasm_bindgen(getter)]
    pub fn page(&self) -> String {
        self.frame.borrow().page().as_str().to_string()
    }

    /// Current display locale.
    #[wasm_bindgen(getter)]
    pub fn locale(&self) -> String {
        self.frame.borrow().locale().as_str().to_string()
    }
}

impl PreviewFrameApp {
    fn listen(&mut self) -> Result<()> {
        let frame = Rc::clone(&self.frame);
        let on_message = Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
            let data = match from_js(event.data()) {
                Ok(data) => data,
                Err(err) => {
                    debug!(%err, "dropping unreadable message");
                    return;
                }
            };
            frame.borrow_mut().handle_message(&event.origin(), &data);
        });
        window()?
            .add_event_listener_with_callback("message", on_message.as_ref().unchecked_ref())?;

        let frame = Rc::clone(&self.frame);
        let on_click = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let path = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok())
                .and_then(|element| BrowserDocument::path_of(&element));
            if let Some(path) = path {
                frame.borrow_mut().handle_click(Some(&path));
            }
        });
        document()?
            .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;

        info!("preview frame listening");
        self.on_message = Some(on_message);
        self.on_click = Some(on_click);
        Ok(())
    }
}
