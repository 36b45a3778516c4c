//! Markup for list-shaped regions.

use livepane_core::{Locale, localized, locale::localized_opt};
use livepane_richtext::{RichTextRenderer, escape_html, sanitize_href};
use serde_json::Value;

use crate::format::{is_truthy, scalar_text};

const EMPTY_EDITORIAL: &str =
    r#"<div class="cms-preview-empty">No editorial blocks configured.</div>"#;
const EMPTY_AMENITIES: &str = r#"<div class="cms-preview-empty">No amenities configured.</div>"#;
const EMPTY_IMAGES: &str =
    r#"<div class="cms-preview-empty">No apartment images configured.</div>"#;

fn items(value: Option<&Value>) -> &[Value] {
    value.and_then(Value::as_array).map_or(&[], Vec::as_slice)
}

/// Feature tiles of the homepage; an icon shows as its first two letters.
pub fn features(value: Option<&Value>, locale: Locale) -> String {
    items(value)
        .iter()
        .map(|feature| {
            let icon = feature
                .get("icon")
                .filter(|icon| is_truthy(Some(icon)))
                .map(scalar_text)
                .unwrap_or_else(|| "ic".to_string());
            let icon: String = icon.chars().take(2).collect::<String>().to_uppercase();
            let label = localized_opt(feature.get("label"), locale);

            format!(
                r#"<div class="feature-tile"><span class="feature-icon"><span>{}</span></span><span class="feature-label">{}</span></div>"#,
                escape_html(&icon),
                escape_html(&label)
            )
        })
        .collect()
}

/// Editorial blocks: `richText`, `callout` with a tone, and `ctaRow`.
pub fn editorial_blocks(
    value: Option<&Value>,
    locale: Locale,
    markdown: &RichTextRenderer,
) -> String {
    let blocks = items(value);
    if blocks.is_empty() {
        return EMPTY_EDITORIAL.to_string();
    }

    blocks
        .iter()
        .map(|block| {
            let text = |key: &str| localized_opt(block.get(key), locale);

            match block.get("type").and_then(Value::as_str) {
                Some("richText") => format!(
                    r#"<div class="editorial-block editorial-block-info"><div class="richtext">{}</div></div>"#,
                    markdown.render(&text("body"))
                ),
                Some("callout") => {
                    let tone = match block.get("tone").and_then(Value::as_str) {
                        Some("success") => "editorial-block-success",
                        Some("warning") => "editorial-block-warning",
                        _ => "editorial-block-info",
                    };
                    format!(
                        r#"<div class="editorial-block {tone}"><h3>{}</h3><div class="richtext">{}</div></div>"#,
                        escape_html(&text("title")),
                        markdown.render(&text("body"))
                    )
                }
                Some("ctaRow") => format!(
                    r#"<div class="editorial-block editorial-block-info editorial-cta"><p>{}</p><a href="{}" class="btn btn-primary">{} <span aria-hidden="true">→</span></a></div>"#,
                    escape_html(&text("text")),
                    escape_html(&sanitize_href(&text("buttonHref"))),
                    escape_html(&text("buttonLabel"))
                ),
                _ => String::new(),
            }
        })
        .collect()
}

/// Amenity checklist of an apartment.
pub fn amenities(value: Option<&Value>, locale: Locale) -> String {
    let list = items(value);
    if list.is_empty() {
        return EMPTY_AMENITIES.to_string();
    }

    list.iter()
        .map(|amenity| {
            format!(
                r#"<div class="amenity"><span class="amenity-check">✓</span><span>{}</span></div>"#,
                escape_html(&localized(amenity, locale))
            )
        })
        .collect()
}

/// One gallery entry with an image.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryImage {
    pub image: String,
    pub kind: String,
    pub caption: Option<Value>,
    pub is_primary: bool,
}

/// Gallery entries that have an image, primary images first.
pub fn normalize_images(value: Option<&Value>) -> Vec<GalleryImage> {
    let mut images: Vec<GalleryImage> = items(value)
        .iter()
        .filter_map(|entry| {
            let image = entry.get("image").filter(|image| is_truthy(Some(image)))?;
            Some(GalleryImage {
                image: scalar_text(image),
                kind: entry
                    .get("kind")
                    .filter(|kind| is_truthy(Some(kind)))
                    .map(scalar_text)
                    .unwrap_or_else(|| "other".to_string()),
                caption: entry.get("caption").filter(|c| is_truthy(Some(c))).cloned(),
                is_primary: is_truthy(entry.get("isPrimary")),
            })
        })
        .collect();

    images.sort_by_key(|image| !image.is_primary);
    images
}

/// Apartment gallery; the first tile is the large one.
pub fn gallery(
    value: Option<&Value>,
    apartment_name: &str,
    locale: Locale,
    limit: usize,
    resolve: impl Fn(&str) -> String,
) -> String {
    let images = normalize_images(value);
    if images.is_empty() {
        return EMPTY_IMAGES.to_string();
    }

    images
        .iter()
        .take(limit)
        .enumerate()
        .map(|(index, entry)| {
            let caption = localized_opt(entry.caption.as_ref(), locale);
            let alt = if caption.is_empty() {
                format!("{apartment_name} — {}", index + 1)
            } else {
                format!("{apartment_name} — {caption}")
            };
            let class = if index == 0 {
                "gallery-tile gallery-tile-large"
            } else {
                "gallery-tile"
            };

            format!(
                r#"<div class="{class}"><img src="{}" alt="{}" loading="lazy" /></div>"#,
                escape_html(&resolve(&entry.image)),
                escape_html(&alt)
            )
        })
        .collect()
}

/// Keys tried, in order, to summarize an object in a list.
const SUMMARY_KEYS: &[&str] = &["title", "question", "heading", "label", "name", "text"];

/// Plain list of locale-resolved items.
pub fn item_list(value: Option<&Value>, locale: Locale) -> String {
    let list = items(value);
    if list.is_empty() {
        return String::new();
    }

    let entries: String = list
        .iter()
        .map(|item| {
            let summary = SUMMARY_KEYS
                .iter()
                .find_map(|key| item.get(*key))
                .map(|value| localized(value, locale))
                .unwrap_or_else(|| localized(item, locale));
            format!("<li>{}</li>", escape_html(&summary))
        })
        .collect();

    format!("<ul>{entries}</ul>")
}
