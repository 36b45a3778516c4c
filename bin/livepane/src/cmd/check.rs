//! Check command - validate built pages against the content-path contract

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, bail};
use livepane_core::{Config, CoreError, PageKind, check_markup, contract::detect_page};

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Validates the configuration, when present, and every HTML page below `dir`
/// that declares or is named after a preview template.
pub fn run(config_path: &Path, dir: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, ?dir, strict, "Checking configuration and pages");

    let mut result = ValidationResult::default();

    println!("Checking configuration...");
    match crate::load_config(config_path) {
        Ok(config) => {
            println!("  ✓ Configuration valid");
            check_config_values(&config, &mut result);
        }
        Err(e) => {
            result.add_error(format!("Configuration error: {e}"));
            println!("  ✗ Configuration invalid: {e}");
        }
    }

    println!("\nChecking pages...");
    if dir.is_dir() {
        check_pages(dir, &mut result);
    } else {
        result.add_error(format!("Page directory missing: {}", dir.display()));
        println!("  ✗ {}/ missing", dir.display());
    }

    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

fn check_config_values(config: &Config, result: &mut ValidationResult) {
    let origin = &config.site.origin;
    if !origin.starts_with("http://") && !origin.starts_with("https://") {
        result.add_warning(format!(
            "site.origin should start with http:// or https:// (found '{origin}')"
        ));
    }

    if config.bridge.blob_marker.is_empty() {
        result.add_warning("bridge.blob_marker is empty, unpublished uploads will not be flagged");
    }
}

/// Template a page renders, from its marker or its file name.
///
/// `apartments/loft/index.html` is named after its first directory,
/// `faq.html` or `faq/index.html` after the stem or parent.
fn page_kind(relative: &Path, html: &str) -> Option<PageKind> {
    if let Some(page) = detect_page(html) {
        return Some(page);
    }

    let stem = relative.file_stem().and_then(|s| s.to_str())?;
    if stem != "index" {
        return PageKind::parse(stem);
    }

    match relative.components().next() {
        Some(first) if relative.components().count() > 1 => {
            PageKind::parse(first.as_os_str().to_str()?)
        }
        _ => Some(PageKind::Home),
    }
}

fn html_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|path| path.extension().and_then(|e| e.to_str()) == Some("html"))
        .collect();
    files.sort();
    files
}

fn check_pages(dir: &Path, result: &mut ValidationResult) {
    let mut checked = 0;
    let mut failed = 0;

    for path in html_files(dir) {
        let relative = path.strip_prefix(dir).unwrap_or(&path);

        let html = match std::fs::read_to_string(&path) {
            Ok(html) => html,
            Err(e) => {
                result.add_error(format!("{}: Failed to read file: {e}", path.display()));
                failed += 1;
                continue;
            }
        };

        let Some(page) = page_kind(relative, &html) else {
            tracing::debug!(?path, "Skipping page without preview template");
            continue;
        };

        checked += 1;
        let report = check_markup(page, &html);
        tracing::debug!(?path, %page, ?report, "Checked page");

        for unknown in &report.unknown {
            result.add_warning(format!(
                "{} ({page}): unknown data-cms-path \"{unknown}\"",
                relative.display()
            ));
        }

        match report.ensure_satisfied(page) {
            Ok(()) => {}
            Err(CoreError::Contract { breaks, .. }) => {
                failed += 1;
                for contract_break in breaks {
                    result.add_error(format!("{} ({page}): {contract_break}", relative.display()));
                }
            }
            Err(e) => {
                failed += 1;
                result.add_error(format!("{}: {e}", relative.display()));
            }
        }
    }

    if checked == 0 {
        result.add_warning(format!("No preview pages found in {}", dir.display()));
        println!("  ⚠ No preview pages found");
    } else if failed == 0 {
        println!("  ✓ All {checked} pages satisfy the contract");
    } else {
        println!("  ✗ {failed}/{checked} pages break the contract");
    }
}

#[cfg(test)]
mod tests {
    use livepane_core::required_paths;
    use tempfile::TempDir;

    use super::*;

    fn complete_markup(page: PageKind) -> String {
        let mut html = format!(r#"<main data-cms-page="{page}">"#);
        for path in required_paths(page) {
            html.push_str(&format!(r#"<div data-cms-path="{path}"></div>"#));
        }
        html.push_str("</main>");
        html
    }

    fn write(dir: &Path, relative: &str, content: &str) {
        let path = dir.join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    #[test]
    fn test_page_kind_from_marker_and_path() {
        assert_eq!(
            page_kind(Path::new("whatever.html"), r#"<body data-cms-page="faq">"#),
            Some(PageKind::Faq)
        );
        assert_eq!(page_kind(Path::new("index.html"), ""), Some(PageKind::Home));
        assert_eq!(
            page_kind(Path::new("apartments/loft/index.html"), ""),
            Some(PageKind::Apartments)
        );
        assert_eq!(
            page_kind(Path::new("exchange-students.html"), ""),
            Some(PageKind::ExchangeStudents)
        );
        assert_eq!(page_kind(Path::new("impressum/index.html"), ""), None);
    }

    #[test]
    fn test_check_pages_reports_contract_breaks() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "index.html", &complete_markup(PageKind::Home));

        let faq = complete_markup(PageKind::Faq).replace(
            "</main>",
            r#"<p data-cms-path="faq"></p><p data-cms-path="legacy.teaser"></p></main>"#,
        );
        write(dir.path(), "faq/index.html", &faq);

        let mut result = ValidationResult::default();
        check_pages(dir.path(), &mut result);

        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("\"faq\" appears 2 times"));
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("legacy.teaser"));
    }

    #[test]
    fn test_check_pages_reports_missing_paths() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "guide.html",
            r#"<article data-cms-page="guide"></article>"#,
        );

        let mut result = ValidationResult::default();
        check_pages(dir.path(), &mut result);

        assert_eq!(result.errors.len(), required_paths(PageKind::Guide).len());
        assert!(result.errors.iter().all(|e| e.contains("(guide): missing")));
    }

    #[test]
    fn test_check_pages_warns_when_nothing_matches() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "impressum/index.html", "<p>Impressum</p>");

        let mut result = ValidationResult::default();
        check_pages(dir.path(), &mut result);

        assert!(!result.has_errors());
        assert!(result.has_warnings());
    }

    #[test]
    fn test_run_strict_fails_on_warnings() {
        let dir = TempDir::new().unwrap();
        let page = complete_markup(PageKind::Home)
            .replace("</main>", r#"<i data-cms-path="extra"></i></main>"#);
        write(dir.path(), "index.html", &page);
        let config = dir.path().join("missing.toml");

        assert!(run(&config, dir.path(), false).is_ok());
        assert!(run(&config, dir.path(), true).is_err());
    }

    #[test]
    fn test_run_fails_on_missing_dir() {
        let dir = TempDir::new().unwrap();
        let result = run(
            &dir.path().join("config.toml"),
            &dir.path().join("dist"),
            false,
        );
        assert!(result.is_err());
    }
}
