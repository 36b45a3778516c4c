//! The preview frame state machine.

use livepane_core::{Config, Locale, PageKind};
use livepane_protocol::{Bootstrap, Message, RICH_TEXT_SIGNATURE, UpdatePayload, accepts_origin};
use livepane_richtext::RichTextRenderer;
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    channel::ParentChannel,
    document::Document,
    highlight::apply_highlights,
    render::{RenderContext, Regions, render_page},
};

/// Frame-side settings.
#[derive(Debug, Clone)]
pub struct FrameSettings {
    /// Origin messages must come from.
    pub origin: String,
    pub gallery_limit: usize,
}

impl FrameSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            origin: config.site.origin.clone(),
            gallery_limit: config.frame.gallery_limit,
        }
    }

    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// Renders snapshots into the preview document and talks to the parent.
pub struct PreviewFrame<D: Document, C: ParentChannel> {
    bootstrap: Bootstrap,
    document: D,
    channel: C,
    settings: FrameSettings,
    markdown: RichTextRenderer,
    signature: String,
    locale: Locale,
    highlight: bool,
    active_path: Option<String>,
    payload: Option<UpdatePayload>,
    started: bool,
}

impl<D: Document, C: ParentChannel> PreviewFrame<D, C> {
    pub fn new(bootstrap: Bootstrap, document: D, channel: C, settings: FrameSettings) -> Self {
        let signature = match bootstrap.rich_text_config.signature.trim() {
            "" => RICH_TEXT_SIGNATURE.to_string(),
            signature => signature.to_string(),
        };
        let markdown = RichTextRenderer::with_config(bootstrap.rich_text_config.clone());

        Self {
            locale: bootstrap.locale,
            payload: bootstrap.initial_payload.clone(),
            bootstrap,
            document,
            channel,
            settings,
            markdown,
            signature,
            highlight: false,
            active_path: None,
            started: false,
        }
    }

    /// Paint the embedded payload and announce READY.
    ///
    /// Only the first call has an effect.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;

        self.render();
        info!(page = %self.bootstrap.page, "preview frame ready");
        let ready = Message::Ready {
            signature: self.signature.clone(),
        };
        self.channel.post_to_parent(&ready);
    }

    /// Handle a raw message from the parent window.
    ///
    /// Returns whether the message was applied.
    pub fn handle_message(&mut self, origin: &str, raw: &Value) -> bool {
        if !accepts_origin(&self.settings.origin, origin) {
            debug!(origin, "dropping message from foreign origin");
            return false;
        }

        match Message::decode(raw) {
            Some(Message::Update { payload }) => {
                self.apply_payload(payload);
                true
            }
            Some(Message::SetLocale { locale }) => {
                self.set_locale(locale);
                true
            }
            Some(other) => {
                debug!(kind = other.type_name(), "ignoring message meant for the controller");
                false
            }
            None => false,
        }
    }

    /// Take over a snapshot and re-render.
    pub fn apply_payload(&mut self, payload: UpdatePayload) {
        if payload.page != self.bootstrap.page {
            debug!(
                expected = %self.bootstrap.page,
                received = %payload.page,
                "payload page differs from template"
            );
        }

        self.locale = payload.locale;
        self.highlight = payload.highlight;
        self.active_path = payload.active_path.clone();
        self.payload = Some(payload);
        self.render();
    }

    /// Switch the display locale of the current snapshot.
    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
        if let Some(payload) = self.payload.as_mut() {
            payload.locale = locale;
        }
        self.render();
    }

    /// Forward a click on the region at `path` as a focus request.
    pub fn handle_click(&mut self, path: Option<&str>) -> bool {
        let Some(path) = path.map(str::trim).filter(|path| !path.is_empty()) else {
            return false;
        };

        debug!(path, "requesting focus");
        self.channel.post_to_parent(&Message::RequestFocus {
            path: path.to_string(),
        })
    }

    /// Render the current snapshot and acknowledge it.
    pub fn render(&mut self) {
        let Some(payload) = self.payload.as_ref() else {
            return;
        };

        let ctx = RenderContext {
            payload,
            locale: self.locale,
            markdown: &self.markdown,
            gallery_limit: self.settings.gallery_limit,
        };
        let mut regions = Regions::new(&mut self.document, &self.bootstrap.field_map);
        render_page(self.bootstrap.page, &ctx, &mut regions);

        apply_highlights(
            &mut self.document,
            self.highlight,
            self.active_path.as_deref(),
        );

        self.channel.post_to_parent(&Message::Ack {
            status: "synced".to_string(),
            message: String::new(),
            signature: self.signature.clone(),
        });
    }

    pub fn page(&self) -> PageKind {
        self.bootstrap.page
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn highlight(&self) -> bool {
        self.highlight
    }

    pub fn active_path(&self) -> Option<&str> {
        self.active_path.as_deref()
    }

    pub fn payload(&self) -> Option<&UpdatePayload> {
        self.payload.as_ref()
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn channel(&self) -> &C {
        &self.channel
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }
}
