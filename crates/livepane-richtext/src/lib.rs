//! Livepane Rich Text
//!
//! Markdown to HTML conversion restricted to a fixed tag, attribute and URI
//! allowlist. Rich text comes from CMS entries, so it is treated as untrusted:
//! raw HTML in the source is escaped, never passed through.

pub mod markdown;

pub use markdown::RichTextRenderer;

/// Escape HTML special characters for text and attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Restrict a template link target to safe schemes, `#` otherwise.
pub fn sanitize_href(href: &str) -> String {
    let raw = href.trim();
    if raw.is_empty() {
        return "#".to_string();
    }

    let lower = raw.to_ascii_lowercase();
    let allowed = ["http://", "https://", "/", "#", "mailto:", "tel:"]
        .iter()
        .any(|prefix| lower.starts_with(prefix));

    if allowed { raw.to_string() } else { "#".to_string() }
}
