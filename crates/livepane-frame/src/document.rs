//! Access to the preview document.
//!
//! The frame never builds markup for a whole page; it patches the nodes the
//! page template marked with `data-cms-path`. [`Document`] is the small set
//! of DOM operations that needs. [`MemoryDocument`] implements it without a
//! browser for tests and tooling.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::LazyLock,
};

use livepane_core::field_map::PATH_ATTRIBUTE;
use livepane_richtext::escape_html;
use regex::Regex;

/// DOM operations the frame renderer performs.
pub trait Document {
    /// Handle of one element.
    type Node: Clone;

    /// First element matching a CSS selector.
    fn query(&self, selector: &str) -> Option<Self::Node>;

    /// Every element carrying a content path, in document order.
    fn path_nodes(&self) -> Vec<Self::Node>;

    fn set_text(&mut self, node: &Self::Node, text: &str);

    fn set_inner_html(&mut self, node: &Self::Node, html: &str);

    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    fn remove_attribute(&mut self, node: &Self::Node, name: &str);

    /// Add or remove a class.
    fn toggle_class(&mut self, node: &Self::Node, class: &str, on: bool);

    fn scroll_into_view(&mut self, node: &Self::Node);
}

static ATTR_SELECTOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\[([A-Za-z_:][-A-Za-z0-9_:.]*)=(?:"([^"]*)"|'([^']*)')\]$"#)
        .expect("valid selector regex")
});

static START_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<([A-Za-z][A-Za-z0-9-]*)(\s[^>]*)?>").expect("valid start tag regex")
});

static ATTRIBUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("valid attribute regex")
});

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// One element of a [`MemoryDocument`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryNode {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub classes: BTreeSet<String>,
    /// Text content.
    pub text: String,
    /// Inner markup.
    pub html: String,
    /// How often the node was scrolled into view.
    pub scrolls: usize,
}

/// Flat in-memory document holding only addressable elements.
///
/// Only attribute selectors (`[name="value"]`) are supported.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    nodes: Vec<MemoryNode>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Document with one `div` per content path.
    pub fn with_paths<'a>(paths: impl IntoIterator<Item = &'a str>) -> Self {
        let mut document = Self::new();
        for path in paths {
            document.push("div", [(PATH_ATTRIBUTE, path)]);
        }
        document
    }

    /// Collect every element carrying a content path from template markup.
    pub fn from_markup(html: &str) -> Self {
        let mut document = Self::new();

        for caps in START_TAG_RE.captures_iter(html) {
            let tag = caps.get(1).map_or("", |m| m.as_str());
            let attrs = caps.get(2).map_or("", |m| m.as_str());

            let attributes: Vec<(String, String)> = ATTRIBUTE_RE
                .captures_iter(attrs)
                .filter_map(|attr| {
                    let name = attr.get(1)?.as_str().to_string();
                    let value = attr.get(2).or_else(|| attr.get(3))?.as_str().to_string();
                    Some((name, value))
                })
                .collect();

            if attributes.iter().any(|(name, _)| name == PATH_ATTRIBUTE) {
                document.push(tag, attributes);
            }
        }

        document
    }

    /// Append an element.
    pub fn push<K, V>(&mut self, tag: &str, attributes: impl IntoIterator<Item = (K, V)>) -> usize
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut node = MemoryNode {
            tag: tag.to_string(),
            ..MemoryNode::default()
        };
        for (name, value) in attributes {
            let (name, value) = (name.into(), value.into());
            if name == "class" {
                node.classes
                    .extend(value.split_whitespace().map(str::to_string));
            } else {
                node.attributes.insert(name, value);
            }
        }
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Element carrying `path`.
    pub fn node(&self, path: &str) -> Option<&MemoryNode> {
        self.nodes
            .iter()
            .find(|node| node.attributes.get(PATH_ATTRIBUTE).map(String::as_str) == Some(path))
    }

    /// Text content of the element carrying `path`.
    pub fn text(&self, path: &str) -> Option<&str> {
        self.node(path).map(|node| node.text.as_str())
    }

    /// Inner markup of the element carrying `path`.
    pub fn html(&self, path: &str) -> Option<&str> {
        self.node(path).map(|node| node.html.as_str())
    }

    pub fn attribute(&self, path: &str, name: &str) -> Option<&str> {
        self.node(path)?.attributes.get(name).map(String::as_str)
    }

    pub fn has_class(&self, path: &str, class: &str) -> bool {
        self.node(path).is_some_and(|node| node.classes.contains(class))
    }

    /// Content path of the element nearest to `node`; the flat document has
    /// no ancestors, so this is the node's own path.
    pub fn path_of(&self, node: usize) -> Option<&str> {
        self.nodes
            .get(node)?
            .attributes
            .get(PATH_ATTRIBUTE)
            .map(String::as_str)
    }
}

impl Document for MemoryDocument {
    type Node = usize;

    fn query(&self, selector: &str) -> Option<usize> {
        let caps = ATTR_SELECTOR_RE.captures(selector.trim())?;
        let name = caps.get(1)?.as_str();
        let value = caps.get(2).or_else(|| caps.get(3))?.as_str();

        self.nodes
            .iter()
            .position(|node| node.attributes.get(name).map(String::as_str) == Some(value))
    }

    fn path_nodes(&self) -> Vec<usize> {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.attributes.contains_key(PATH_ATTRIBUTE))
            .map(|(index, _)| index)
            .collect()
    }

    fn set_text(&mut self, node: &usize, text: &str) {
        if let Some(node) = self.nodes.get_mut(*node) {
            node.text = text.to_string();
            node.html = escape_html(text);
        }
    }

    fn set_inner_html(&mut self, node: &usize, html: &str) {
        if let Some(node) = self.nodes.get_mut(*node) {
            node.text = TAG_RE.replace_all(html, "").into_owned();
            node.html = html.to_string();
        }
    }

    fn set_attribute(&mut self, node: &usize, name: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(*node) {
            node.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn remove_attribute(&mut self, node: &usize, name: &str) {
        if let Some(node) = self.nodes.get_mut(*node) {
            node.attributes.remove(name);
        }
    }

    fn toggle_class(&mut self, node: &usize, class: &str, on: bool) {
        if let Some(node) = self.nodes.get_mut(*node) {
            if on {
                node.classes.insert(class.to_string());
            } else {
                node.classes.remove(class);
            }
        }
    }

    fn scroll_into_view(&mut self, node: &usize) {
        if let Some(node) = self.nodes.get_mut(*node) {
            node.scrolls += 1;
        }
    }
}
