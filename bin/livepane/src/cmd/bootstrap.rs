//! Bootstrap command - build the preview bootstrap for an entry file

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr, eyre};
use livepane_controller::{IdentityResolver, MediaHeuristic, assets::build_resolved_assets};
use livepane_core::{Config, Locale, PageKind, content::load_entry};
use livepane_protocol::{Bootstrap, RichTextConfig, UpdatePayload};

/// Run the bootstrap command.
///
/// Prints the bootstrap JSON to embed as `window.__CMS_PREVIEW_BOOTSTRAP__`.
pub fn run(
    config_path: &Path,
    entry: &Path,
    page: &str,
    locale: Option<&str>,
    slug: Option<&str>,
) -> Result<()> {
    let config = crate::load_config(config_path)?;
    let bootstrap = build(&config, entry, page, locale, slug)?;

    println!("{}", bootstrap.to_json_pretty()?);
    Ok(())
}

/// Build the bootstrap for `entry`, rendered with the `page` template.
pub fn build(
    config: &Config,
    entry: &Path,
    page: &str,
    locale: Option<&str>,
    slug: Option<&str>,
) -> Result<Bootstrap> {
    let page = PageKind::parse(page).ok_or_else(|| {
        let known: Vec<_> = PageKind::ALL.iter().map(PageKind::as_str).collect();
        eyre!("Unknown page '{page}' (expected one of {})", known.join(", "))
    })?;
    let locale = locale.map_or(config.site.default_locale, Locale::parse_lenient);

    let data = load_entry(entry).wrap_err_with(|| format!("Failed to load {}", entry.display()))?;
    tracing::info!(?entry, %page, locale = locale.as_str(), "Building bootstrap");

    let heuristic = MediaHeuristic::from_config(&config.media);
    let mut payload = UpdatePayload::new(page);
    payload.slug = slug
        .map(str::to_string)
        .or_else(|| {
            entry
                .file_stem()
                .and_then(|s| s.to_str())
                .map(str::to_string)
        })
        .unwrap_or_default();
    payload.locale = locale;
    payload.resolved_assets = build_resolved_assets(&data, &heuristic, &IdentityResolver);
    payload.data = data;
    payload.sent_at = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default();

    let mut bootstrap = Bootstrap::for_page(page, locale).with_initial_payload(payload);
    bootstrap.rich_text_config = RichTextConfig {
        signature: config.bridge.signature.clone(),
        ..RichTextConfig::default()
    };

    Ok(bootstrap)
}
