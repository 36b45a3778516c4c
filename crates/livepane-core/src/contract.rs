//! Build-time check of the content-path contract between templates and markup.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    sync::LazyLock,
};

use regex::Regex;

use crate::{
    error::{CoreError, Result},
    field_map::required_paths,
    page::PageKind,
};

static PATH_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"data-cms-path\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid path regex")
});

static PAGE_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"data-cms-page\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid page regex")
});

/// Outcome of checking one rendered page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractReport {
    /// Required paths absent from the markup.
    pub missing: Vec<String>,

    /// Paths declared more than once, with their count.
    pub duplicated: BTreeMap<String, usize>,

    /// Paths present in the markup that the field map does not know.
    pub unknown: BTreeSet<String>,
}

impl ContractReport {
    /// Whether the markup satisfies the contract.
    pub fn is_satisfied(&self) -> bool {
        self.missing.is_empty() && self.duplicated.is_empty()
    }

    /// Fail with [`CoreError::Contract`] listing every break of `page`.
    ///
    /// Unknown paths are not breaks.
    pub fn ensure_satisfied(&self, page: PageKind) -> Result<()> {
        if self.is_satisfied() {
            return Ok(());
        }

        let breaks = self
            .missing
            .iter()
            .map(|path| ContractBreak::Missing(path.clone()))
            .chain(
                self.duplicated
                    .iter()
                    .map(|(path, &count)| ContractBreak::Duplicated(path.clone(), count)),
            )
            .collect();
        Err(CoreError::Contract { page, breaks })
    }
}

/// One way a page can break the contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContractBreak {
    /// A required path is absent.
    Missing(String),
    /// A required path is declared this many times.
    Duplicated(String, usize),
}

impl fmt::Display for ContractBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing(path) => write!(f, "missing data-cms-path \"{path}\""),
            Self::Duplicated(path, count) => {
                write!(f, "data-cms-path \"{path}\" appears {count} times")
            }
        }
    }
}

/// Count every `data-cms-path` occurrence in the markup.
pub fn path_occurrences(html: &str) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for caps in PATH_ATTR_RE.captures_iter(html) {
        let Some(path) = caps.get(1).or_else(|| caps.get(2)) else {
            continue;
        };
        *counts.entry(path.as_str().to_string()).or_insert(0) += 1;
    }
    counts
}

/// Read a `data-cms-page` marker from the markup.
pub fn detect_page(html: &str) -> Option<PageKind> {
    let caps = PAGE_ATTR_RE.captures(html)?;
    let value = caps.get(1).or_else(|| caps.get(2))?;
    PageKind::parse(value.as_str())
}

/// Verify that every required path of `page` occurs exactly once.
pub fn check_markup(page: PageKind, html: &str) -> ContractReport {
    let counts = path_occurrences(html);
    let required = required_paths(page);

    let mut report = ContractReport::default();
    for path in required {
        match counts.get(*path) {
            None => report.missing.push(path.to_string()),
            Some(&n) if n > 1 => {
                report.duplicated.insert(path.to_string(), n);
            }
            Some(_) => {}
        }
    }

    report.unknown = counts
        .keys()
        .filter(|path| !required.contains(&path.as_str()))
        .cloned()
        .collect();

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_markup(page: PageKind) -> String {
        required_paths(page)
            .iter()
            .map(|path| format!("<div data-cms-path=\"{path}\"></div>"))
            .collect()
    }

    #[test]
    fn test_complete_markup_is_satisfied() {
        let html = full_markup(PageKind::Apartments);
        let report = check_markup(PageKind::Apartments, &html);
        assert!(report.is_satisfied());
        assert!(report.unknown.is_empty());
    }

    #[test]
    fn test_missing_and_duplicate_paths() {
        let mut html = full_markup(PageKind::Faq);
        html.push_str("<span data-cms-path='faq'></span>");
        let report = check_markup(PageKind::Faq, &html);
        assert_eq!(report.duplicated.get("faq"), Some(&2));

        let report = check_markup(PageKind::Faq, "<main></main>");
        assert_eq!(report.missing, vec!["faq".to_string()]);
        assert!(!report.is_satisfied());
    }

    #[test]
    fn test_ensure_satisfied_lists_breaks() {
        let mut html = full_markup(PageKind::Faq);
        html.push_str("<span data-cms-path='faq'></span>");
        let err = check_markup(PageKind::Faq, &html)
            .ensure_satisfied(PageKind::Faq)
            .unwrap_err();
        let CoreError::Contract { page, breaks } = err else {
            panic!("expected a contract error");
        };
        assert_eq!(page, PageKind::Faq);
        assert_eq!(breaks, vec![ContractBreak::Duplicated("faq".to_string(), 2)]);
        assert_eq!(breaks[0].to_string(), "data-cms-path \"faq\" appears 2 times");

        let report = check_markup(PageKind::Apartments, &full_markup(PageKind::Apartments));
        assert!(report.ensure_satisfied(PageKind::Apartments).is_ok());
    }

    #[test]
    fn test_unknown_paths_do_not_fail() {
        let mut html = full_markup(PageKind::Faq);
        html.push_str("<h1 data-cms-path=\"nameSecondary\"></h1>");
        let report = check_markup(PageKind::Faq, &html);
        assert!(report.is_satisfied());
        assert!(report.unknown.contains("nameSecondary"));
    }

    #[test]
    fn test_detect_page_marker() {
        assert_eq!(
            detect_page("<body data-cms-page=\"apartments\">"),
            Some(PageKind::Apartments)
        );
        assert_eq!(detect_page("<body>"), None);
    }
}
