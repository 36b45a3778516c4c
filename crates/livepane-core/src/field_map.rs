//! Content-path field maps per page template.
//!
//! Every previewable region in the rendered markup carries a `data-cms-path`
//! attribute. The maps below list the paths each template must expose; the
//! frame resolves them to selectors and the `check` command verifies the
//! markup against them.

use std::collections::BTreeMap;

use crate::page::PageKind;

/// Attribute holding a region's content path.
pub const PATH_ATTRIBUTE: &str = "data-cms-path";

const HOME_PATHS: &[&str] = &[
    "hero.headline",
    "hero.subheadline",
    "hero.cta",
    "hero.images.desktop",
    "hero.images.tablet",
    "hero.images.mobile",
    "welcomeSpotlight.eyebrow",
    "welcomeSpotlight.headline",
    "welcomeSpotlight.body",
    "welcomeSpotlight.ctaLabel",
    "welcomeSpotlight.ctaHref",
    "welcomeSpotlight.image",
    "sectionSubheadline",
    "features",
    "editorialBlocks",
    "seo.title",
    "seo.description",
    "seo.ogImage",
];

const APARTMENT_PATHS: &[&str] = &[
    "name",
    "tagline",
    "description",
    "size",
    "rooms",
    "floor",
    "maxOccupants",
    "pricePerMonth",
    "utilitiesPerMonth",
    "totalRent",
    "available",
    "availableFrom",
    "amenities",
    "images",
    "seo.title",
    "seo.description",
    "seo.ogImage",
];

const FAQ_PATHS: &[&str] = &["faq"];

const EXCHANGE_STUDENTS_PATHS: &[&str] = &[
    "heading",
    "subheading",
    "intro",
    "highlights",
    "whatsIncluded",
    "aboutVallendar",
    "remoteBooking",
    "ctaText",
];

const CONTENT_PAGE_PATHS: &[&str] = &[
    "pageType",
    "heading",
    "subheading",
    "intro",
    "highlights",
    "whatsIncluded",
    "aboutVallendar",
    "remoteBooking",
    "ctaText",
    "sections",
    "faq",
    "seo.title",
    "seo.description",
    "seo.ogImage",
];

const GUIDE_PATHS: &[&str] = &[
    "title",
    "description",
    "publishedAt",
    "sections",
    "faq",
    "seo.title",
    "seo.description",
    "seo.ogImage",
];

/// Paths a page's markup must expose exactly once.
pub fn required_paths(page: PageKind) -> &'static [&'static str] {
    match page {
        PageKind::Home => HOME_PATHS,
        PageKind::Apartments => APARTMENT_PATHS,
        PageKind::Faq => FAQ_PATHS,
        PageKind::ExchangeStudents => EXCHANGE_STUDENTS_PATHS,
        PageKind::Guide => GUIDE_PATHS,
        PageKind::ContentPage => CONTENT_PAGE_PATHS,
    }
}

/// Attribute selector addressing a content path.
pub fn path_selector(path: &str) -> String {
    format!("[{PATH_ATTRIBUTE}=\"{path}\"]")
}

/// Path → selector map embedded into the frame bootstrap.
pub fn field_map(page: PageKind) -> BTreeMap<String, String> {
    required_paths(page)
        .iter()
        .map(|path| (path.to_string(), path_selector(path)))
        .collect()
}
