use serde_json::Value;

use super::{RenderContext, Regions, fragments};
use crate::{
    document::Document,
    format::{amount, availability, format_date, is_truthy, monthly_total, price, scalar_text},
};

fn or_dash(value: Option<&Value>) -> String {
    if is_truthy(value) {
        value.map(scalar_text).unwrap_or_default()
    } else {
        "-".to_string()
    }
}

pub fn render<D: Document>(ctx: &RenderContext<'_>, regions: &mut Regions<'_, D>) {
    let name = ctx.text("name");
    regions.set_text("name", &name);
    regions.set_text("nameSecondary", &name);
    regions.set_text("tagline", &ctx.text("tagline"));
    regions.set_html("description", &ctx.rich("description"));

    regions.set_text("size", &format!("{} m²", or_dash(ctx.value("size"))));
    regions.set_text("rooms", &ctx.text("rooms"));
    regions.set_text("floor", &ctx.text("floor"));
    regions.set_text("maxOccupants", &or_dash(ctx.value("maxOccupants")));

    let rent = amount(ctx.value("pricePerMonth"));
    let utilities = amount(ctx.value("utilitiesPerMonth"));
    regions.set_text("pricePerMonth", &price(rent, ctx.locale));
    regions.set_text("utilitiesPerMonth", &price(utilities, ctx.locale));
    regions.set_text("totalRent", &monthly_total(rent + utilities, ctx.locale));

    let available_from = ctx.text("availableFrom");
    regions.set_text(
        "available",
        &availability(
            is_truthy(ctx.value("available")),
            Some(available_from.as_str()),
            ctx.locale,
        ),
    );
    regions.set_text("availableFrom", &format_date(&available_from, ctx.locale));

    regions.set_html(
        "amenities",
        &fragments::amenities(ctx.value("amenities"), ctx.locale),
    );
    regions.set_html(
        "images",
        &fragments::gallery(
            ctx.value("images"),
            &name,
            ctx.locale,
            ctx.gallery_limit,
            |raw| ctx.payload.resolve_asset(raw).to_string(),
        ),
    );

    super::render_seo(ctx, regions);
}

#[cfg(test)]
mod tests {
    use livepane_core::{Locale, PageKind, field_map, required_paths};
    use livepane_protocol::UpdatePayload;
    use livepane_richtext::RichTextRenderer;
    use serde_json::json;

    use super::*;
    use crate::document::MemoryDocument;

    fn render_apartment(data: Value, locale: Locale) -> MemoryDocument {
        let mut payload = UpdatePayload::new(PageKind::Apartments);
        payload.data = data;
        payload
            .resolved_assets
            .insert("/images/kitchen.jpg".to_string(), "blob:kitchen".to_string());

        let mut document = MemoryDocument::with_paths(
            required_paths(PageKind::Apartments)
                .iter()
                .copied()
                .chain(["nameSecondary"]),
        );
        let map = field_map(PageKind::Apartments);
        let markdown = RichTextRenderer::new();
        let ctx = RenderContext {
            payload: &payload,
            locale,
            markdown: &markdown,
            gallery_limit: 5,
        };
        render(&ctx, &mut Regions::new(&mut document, &map));
        document
    }

    #[test]
    fn test_render_apartment_facts_and_prices() {
        let document = render_apartment(
            json!({
                "name": "Studio Rhein",
                "tagline": {"de": "Hell", "en": "Bright"},
                "size": 24,
                "rooms": 1,
                "floor": {"de": "2. OG", "en": "2nd floor"},
                "pricePerMonth": 620,
                "utilitiesPerMonth": "150",
                "available": true,
                "availableFrom": "2026-04-01"
            }),
            Locale::En,
        );

        assert_eq!(document.text("name"), Some("Studio Rhein"));
        assert_eq!(document.text("nameSecondary"), Some("Studio Rhein"));
        assert_eq!(document.text("tagline"), Some("Bright"));
        assert_eq!(document.text("size"), Some("24 m²"));
        assert_eq!(document.text("rooms"), Some("1"));
        assert_eq!(document.text("floor"), Some("2nd floor"));
        assert_eq!(document.text("maxOccupants"), Some("-"));
        assert_eq!(document.text("pricePerMonth"), Some("€620"));
        assert_eq!(document.text("utilitiesPerMonth"), Some("€150"));
        assert_eq!(document.text("totalRent"), Some("€770 / month"));
        assert_eq!(
            document.text("available"),
            Some("Available from April 1, 2026")
        );
        assert_eq!(document.text("availableFrom"), Some("April 1, 2026"));
    }

    #[test]
    fn test_render_apartment_empty_entry() {
        let document = render_apartment(json!({}), Locale::De);

        assert_eq!(document.text("name"), Some(""));
        assert_eq!(document.text("size"), Some("- m²"));
        assert_eq!(document.text("totalRent"), Some("0 € / Monat"));
        assert_eq!(document.text("available"), Some("Vermietet"));
        assert_eq!(document.text("availableFrom"), Some(""));
        assert_eq!(document.text("amenities"), Some("No amenities configured."));
        assert_eq!(document.text("images"), Some("No apartment images configured."));
    }

    #[test]
    fn test_render_apartment_gallery_uses_resolved_assets() {
        let document = render_apartment(
            json!({
                "name": "Loft",
                "images": [
                    {"image": "/images/bath.jpg", "caption": "Bad"},
                    {"image": "/images/kitchen.jpg", "isPrimary": true}
                ]
            }),
            Locale::De,
        );
        let html = document.html("images").unwrap();

        let kitchen = html.find("blob:kitchen").unwrap();
        let bath = html.find("/images/bath.jpg").unwrap();
        assert!(kitchen < bath);
        assert!(html.contains(r#"alt="Loft — 1""#));
        assert!(html.contains(r#"alt="Loft — Bad""#));
    }
}
