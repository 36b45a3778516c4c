//! Mapping between content paths and editor form controls.

use std::sync::LazyLock;

use livepane_core::content::path_tail;
use regex::Regex;

use crate::host::FormControl;

static LEADING_DATA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^data\.").expect("valid data prefix regex"));
static INDEX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\d+\]").expect("valid index regex"));
static WIDGET_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.?(fields?|widgets?)\.?").expect("valid widget regex"));
static DOTS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.+").expect("valid dots regex"));

/// Lowercase and drop everything but ASCII letters and digits.
pub fn normalize_token(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// How well `control` matches the content path.
///
/// +4 when the identifiers contain the whole path, +2 when they contain its
/// last segment, +3 when name or id ends with the last segment.
pub fn score_control(control: &FormControl, path: &str) -> u32 {
    let name = normalize_token(control.name.as_deref().unwrap_or_default());
    let id = normalize_token(control.id.as_deref().unwrap_or_default());
    let label = normalize_token(control.aria_label.as_deref().unwrap_or_default());

    let haystack = format!("{name} {id} {label}");
    if haystack.trim().is_empty() {
        return 0;
    }

    let whole = normalize_token(path);
    let tail = normalize_token(path_tail(path));

    let mut score = 0;
    if !whole.is_empty() && haystack.contains(&whole) {
        score += 4;
    }
    if !tail.is_empty() && haystack.contains(&tail) {
        score += 2;
    }
    if !tail.is_empty() && (name.ends_with(&tail) || id.ends_with(&tail)) {
        score += 3;
    }
    score
}

/// Index of the best matching control, if it reaches `min_score`.
///
/// Ties keep the earliest control.
pub fn find_best_match(controls: &[FormControl], path: &str, min_score: u32) -> Option<usize> {
    let mut best = None;
    let mut best_score = 0;

    for (index, control) in controls.iter().enumerate() {
        let score = score_control(control, path);
        if score > best_score {
            best = Some(index);
            best_score = score;
        }
    }

    best.filter(|_| best_score >= min_score.max(1))
}

/// Turn a form field identifier into a content path.
///
/// `data.hero.fields.headline` and `hero.widget.headline` both become
/// `hero.headline`; list indices are dropped.
pub fn normalize_field_path(raw: &str) -> Option<String> {
    let path = LEADING_DATA_RE.replace(raw, "");
    let path = INDEX_RE.replace_all(&path, "");
    let path = WIDGET_TOKEN_RE.replace_all(&path, ".");
    let collapsed = DOTS_RE.replace_all(&path, ".");
    let path = collapsed.trim_start_matches('.').trim_end_matches('.');

    (!path.is_empty()).then(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn control(name: &str, id: &str, label: &str) -> FormControl {
        let opt = |s: &str| (!s.is_empty()).then(|| s.to_string());
        FormControl {
            name: opt(name),
            id: opt(id),
            aria_label: opt(label),
        }
    }

    #[test]
    fn test_normalize_token() {
        assert_eq!(normalize_token("Hero.Headline"), "heroheadline");
        assert_eq!(normalize_token("welcome_spotlight-body"), "welcomespotlightbody");
        assert_eq!(normalize_token("Größe"), "gre");
    }

    #[test]
    fn test_scoring() {
        let path = "hero.headline";
        assert_eq!(score_control(&control("hero.headline", "", ""), path), 9);
        assert_eq!(score_control(&control("headline", "", ""), path), 5);
        assert_eq!(score_control(&control("", "", "Headline"), path), 2);
        assert_eq!(score_control(&control("seo.title", "", ""), path), 0);
        assert_eq!(score_control(&control("", "", ""), path), 0);
    }

    #[test]
    fn test_best_match_is_deterministic() {
        let controls = vec![
            control("seo.title", "", ""),
            control("", "", "Headline"),
            control("hero-headline", "", ""),
            control("hero.headline", "other", ""),
        ];

        assert_eq!(find_best_match(&controls, "hero.headline", 1), Some(2));
        assert_eq!(find_best_match(&controls, "hero.headline", 1), Some(2));
        assert_eq!(find_best_match(&controls, "seo.title", 1), Some(0));
        assert_eq!(find_best_match(&controls, "amenities", 1), None);
    }

    #[test]
    fn test_min_score_threshold() {
        let controls = vec![control("", "", "Headline")];
        assert_eq!(find_best_match(&controls, "hero.headline", 1), Some(0));
        assert_eq!(find_best_match(&controls, "hero.headline", 3), None);
    }

    #[test]
    fn test_normalize_field_path() {
        assert_eq!(
            normalize_field_path("data.hero.fields.headline").as_deref(),
            Some("hero.headline")
        );
        assert_eq!(
            normalize_field_path("editorialBlocks[2].widget.title").as_deref(),
            Some("editorialBlocks.title")
        );
        assert_eq!(normalize_field_path("pricePerMonth").as_deref(), Some("pricePerMonth"));
        assert_eq!(normalize_field_path("..fields..").as_deref(), None);
        assert_eq!(normalize_field_path("data."), None);
    }
}
