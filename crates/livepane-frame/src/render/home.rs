use livepane_richtext::sanitize_href;

use super::{RenderContext, Regions, fragments};
use crate::document::Document;

pub fn render<D: Document>(ctx: &RenderContext<'_>, regions: &mut Regions<'_, D>) {
    for path in ["hero.headline", "hero.subheadline", "hero.cta"] {
        regions.set_text(path, &ctx.text(path));
    }

    regions.set_attr("hero.images.desktop", "src", &ctx.asset("hero.images.desktop"));
    regions.set_attr("hero.images.tablet", "srcset", &ctx.asset("hero.images.tablet"));
    regions.set_attr("hero.images.mobile", "srcset", &ctx.asset("hero.images.mobile"));

    for path in [
        "welcomeSpotlight.eyebrow",
        "welcomeSpotlight.headline",
        "welcomeSpotlight.body",
        "welcomeSpotlight.ctaLabel",
    ] {
        regions.set_text(path, &ctx.text(path));
    }
    regions.set_attr(
        "welcomeSpotlight.ctaHref",
        "href",
        &sanitize_href(&ctx.text("welcomeSpotlight.ctaHref")),
    );
    regions.set_attr("welcomeSpotlight.image", "src", &ctx.asset("welcomeSpotlight.image"));
    regions.set_attr(
        "welcomeSpotlight.image",
        "alt",
        &ctx.text("welcomeSpotlight.imageAlt"),
    );

    regions.set_html("sectionSubheadline", &ctx.rich("sectionSubheadline"));
    regions.set_html(
        "features",
        &fragments::features(ctx.value("features"), ctx.locale),
    );
    regions.set_html(
        "editorialBlocks",
        &fragments::editorial_blocks(ctx.value("editorialBlocks"), ctx.locale, ctx.markdown),
    );

    super::render_seo(ctx, regions);
}
