//! Field-by-field rendering for pages without a dedicated template.

use livepane_core::{PageKind, content::path_tail, required_paths};
use serde_json::Value;

use super::{RenderContext, Regions, fragments};
use crate::{document::Document, format::format_date};

/// Fields holding markdown.
const RICH_FIELDS: &[&str] = &["intro", "body", "description", "aboutVallendar", "remoteBooking"];

pub fn render<D: Document>(page: PageKind, ctx: &RenderContext<'_>, regions: &mut Regions<'_, D>) {
    for path in required_paths(page) {
        if path.starts_with("seo.") {
            continue;
        }
        let tail = path_tail(path);

        match ctx.value(path) {
            Some(Value::Array(_)) => {
                regions.set_html(path, &fragments::item_list(ctx.value(path), ctx.locale));
            }
            _ if tail.to_ascii_lowercase().ends_with("image") => {
                regions.set_attr(path, "src", &ctx.asset(path));
            }
            _ if tail.ends_with("At") || tail.ends_with("Date") => {
                regions.set_text(path, &format_date(&ctx.text(path), ctx.locale));
            }
            _ if RICH_FIELDS.contains(&tail) => regions.set_html(path, &ctx.rich(path)),
            _ => regions.set_text(path, &ctx.text(path)),
        }
    }

    super::render_seo(ctx, regions);
}

#[cfg(test)]
mod tests {
    use livepane_core::{Locale, field_map};
    use livepane_protocol::UpdatePayload;
    use livepane_richtext::RichTextRenderer;
    use serde_json::json;

    use super::*;
    use crate::document::MemoryDocument;

    #[test]
    fn test_render_guide() {
        let mut payload = UpdatePayload::new(PageKind::Guide);
        payload.data = json!({
            "title": {"de": "Ankommen", "en": "Arriving"},
            "description": "Erste *Schritte*",
            "publishedAt": "2026-03-15",
            "sections": [{"heading": "Anmeldung"}, {"heading": {"en": "Bank"}}],
            "seo": {"title": "Guide"}
        });

        let mut document =
            MemoryDocument::with_paths(required_paths(PageKind::Guide).iter().copied());
        let map = field_map(PageKind::Guide);
        let markdown = RichTextRenderer::new();
        let ctx = RenderContext {
            payload: &payload,
            locale: Locale::En,
            markdown: &markdown,
            gallery_limit: 5,
        };
        render(PageKind::Guide, &ctx, &mut Regions::new(&mut document, &map));

        assert_eq!(document.text("title"), Some("Arriving"));
        assert_eq!(document.html("description"), Some("<p>Erste <em>Schritte</em></p>\n"));
        assert_eq!(document.text("publishedAt"), Some("March 15, 2026"));
        assert_eq!(
            document.html("sections"),
            Some("<ul><li>Anmeldung</li><li>Bank</li></ul>")
        );
        assert_eq!(document.html("faq"), Some(""));
        assert_eq!(document.text("seo.title"), Some("Guide"));
    }
}
