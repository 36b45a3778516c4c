//! Page renderers.
//!
//! Each renderer reads the current payload and patches the regions its page
//! template exposes. Regions are looked up through the bootstrap field map,
//! falling back to the plain `data-cms-path` selector; missing regions are
//! skipped.

mod apartment;
mod fragments;
mod generic;
mod home;

use std::collections::BTreeMap;

use livepane_core::{Locale, PageKind, content::lookup, locale::localized_opt, path_selector};
use livepane_protocol::UpdatePayload;
use livepane_richtext::RichTextRenderer;
use serde_json::Value;

use crate::document::Document;

pub use fragments::{GalleryImage, normalize_images};

/// Everything a renderer reads.
pub struct RenderContext<'a> {
    pub payload: &'a UpdatePayload,
    pub locale: Locale,
    pub markdown: &'a RichTextRenderer,
    pub gallery_limit: usize,
}

impl RenderContext<'_> {
    pub fn data(&self) -> &Value {
        &self.payload.data
    }

    /// Value at a dotted path of the entry data.
    pub fn value(&self, path: &str) -> Option<&Value> {
        lookup(&self.payload.data, path)
    }

    /// Locale-resolved text at a dotted path.
    pub fn text(&self, path: &str) -> String {
        localized_opt(self.value(path), self.locale)
    }

    /// Markdown at a dotted path, rendered to sanitized HTML.
    pub fn rich(&self, path: &str) -> String {
        self.markdown.render(&self.text(path))
    }

    /// Displayable URL of the media reference at a dotted path.
    pub fn asset(&self, path: &str) -> String {
        match self.value(path) {
            Some(Value::String(raw)) if !raw.is_empty() => {
                self.payload.resolve_asset(raw).to_string()
            }
            _ => String::new(),
        }
    }
}

/// Writes into the regions of a document.
pub struct Regions<'a, D: Document> {
    document: &'a mut D,
    field_map: &'a BTreeMap<String, String>,
}

impl<'a, D: Document> Regions<'a, D> {
    pub fn new(document: &'a mut D, field_map: &'a BTreeMap<String, String>) -> Self {
        Self {
            document,
            field_map,
        }
    }

    fn find(&self, path: &str) -> Option<D::Node> {
        match self.field_map.get(path) {
            Some(selector) => self.document.query(selector),
            None => self.document.query(&path_selector(path)),
        }
    }

    pub fn set_text(&mut self, path: &str, text: &str) {
        if let Some(node) = self.find(path) {
            self.document.set_text(&node, text);
        }
    }

    pub fn set_html(&mut self, path: &str, html: &str) {
        if let Some(node) = self.find(path) {
            self.document.set_inner_html(&node, html);
        }
    }

    /// Set an attribute; an empty value removes it.
    pub fn set_attr(&mut self, path: &str, name: &str, value: &str) {
        let Some(node) = self.find(path) else {
            return;
        };
        if value.is_empty() {
            self.document.remove_attribute(&node, name);
        } else {
            self.document.set_attribute(&node, name, value);
        }
    }
}

fn render_seo<D: Document>(ctx: &RenderContext<'_>, regions: &mut Regions<'_, D>) {
    regions.set_text("seo.title", &ctx.text("seo.title"));
    regions.set_text("seo.description", &ctx.text("seo.description"));
    regions.set_attr("seo.ogImage", "src", &ctx.asset("seo.ogImage"));
}

/// Render the payload into the regions of `page`.
pub fn render_page<D: Document>(page: PageKind, ctx: &RenderContext<'_>, regions: &mut Regions<'_, D>) {
    match page {
        PageKind::Home => home::render(ctx, regions),
        PageKind::Apartments => apartment::render(ctx, regions),
        other => generic::render(other, ctx, regions),
    }
}
