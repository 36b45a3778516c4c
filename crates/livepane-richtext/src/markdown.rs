//! Markdown renderer using pulldown-cmark.

use livepane_protocol::RichTextConfig;
use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

use crate::escape_html;

/// How an opened markdown tag is closed again.
#[derive(Debug, Clone, Copy)]
enum Open {
    /// Emitted as a plain element.
    Element(&'static str),
    /// Emitted as `<pre><code>`.
    CodeBlock,
    /// Not in the allowlist; only its content is rendered.
    Dropped,
}

/// Image whose alt text is still being collected.
#[derive(Debug, Default)]
struct PendingImage {
    src: Option<String>,
    title: String,
    alt: String,
    depth: usize,
}

/// Markdown renderer bound to a rich-text allowlist.
#[derive(Debug, Clone)]
pub struct RichTextRenderer {
    config: RichTextConfig,
    options: Options,
}

impl Default for RichTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl RichTextRenderer {
    /// Create a renderer with the default allowlists.
    pub fn new() -> Self {
        Self::with_config(RichTextConfig::default())
    }

    /// Create a renderer with explicit allowlists.
    pub fn with_config(config: RichTextConfig) -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_STRIKETHROUGH);

        Self { config, options }
    }

    /// The allowlists in use.
    pub fn config(&self) -> &RichTextConfig {
        &self.config
    }

    /// Render markdown to sanitized HTML. Blank input renders to nothing.
    ///
    /// Single line breaks become `<br />`.
    pub fn render(&self, markdown: &str) -> String {
        let input = markdown.trim();
        if input.is_empty() {
            return String::new();
        }

        let mut html = String::with_capacity(input.len() * 2);
        let mut stack: Vec<Open> = Vec::new();
        let mut image: Option<PendingImage> = None;

        for event in Parser::new_ext(input, self.options) {
            if let Some(pending) = image.as_mut() {
                match event {
                    Event::End(TagEnd::Image) if pending.depth == 0 => {
                        if let Some(done) = image.take() {
                            self.push_image(&mut html, done);
                        }
                    }
                    Event::Start(_) => pending.depth += 1,
                    Event::End(_) => pending.depth = pending.depth.saturating_sub(1),
                    Event::Text(text) | Event::Code(text) => pending.alt.push_str(&text),
                    _ => {}
                }
                continue;
            }

            match event {
                Event::Start(Tag::Image {
                    dest_url, title, ..
                }) => {
                    image = Some(PendingImage {
                        src: self
                            .config
                            .allows_uri(&dest_url)
                            .then(|| dest_url.to_string()),
                        title: title.to_string(),
                        ..PendingImage::default()
                    });
                }

                Event::Start(Tag::Link {
                    dest_url, title, ..
                }) => {
                    if !self.config.allows_tag("a") {
                        stack.push(Open::Dropped);
                        continue;
                    }
                    html.push_str("<a");
                    if self.config.allows_attribute("a", "href") && self.config.allows_uri(&dest_url)
                    {
                        html.push_str(&format!(" href=\"{}\"", escape_html(&dest_url)));
                    }
                    if !title.is_empty() && self.config.allows_attribute("a", "title") {
                        html.push_str(&format!(" title=\"{}\"", escape_html(&title)));
                    }
                    html.push('>');
                    stack.push(Open::Element("a"));
                }

                Event::Start(Tag::CodeBlock(_)) => {
                    if self.config.allows_tag("pre") && self.config.allows_tag("code") {
                        html.push_str("<pre><code>");
                        stack.push(Open::CodeBlock);
                    } else {
                        stack.push(Open::Dropped);
                    }
                }

                Event::Start(tag) => {
                    let open = match element_for(&tag) {
                        Some(name) if self.config.allows_tag(name) => {
                            html.push_str(&format!("<{name}>"));
                            Open::Element(name)
                        }
                        _ => Open::Dropped,
                    };
                    stack.push(open);
                }

                Event::End(_) => match stack.pop() {
                    Some(Open::Element(name)) => {
                        html.push_str(&format!("</{name}>"));
                        if is_block(name) {
                            html.push('\n');
                        }
                    }
                    Some(Open::CodeBlock) => html.push_str("</code></pre>\n"),
                    Some(Open::Dropped) | None => {}
                },

                Event::Text(text) => html.push_str(&escape_html(&text)),

                Event::Code(code) => {
                    if self.config.allows_tag("code") {
                        html.push_str(&format!("<code>{}</code>", escape_html(&code)));
                    } else {
                        html.push_str(&escape_html(&code));
                    }
                }

                // Raw HTML is shown as text.
                Event::Html(raw) | Event::InlineHtml(raw) => html.push_str(&escape_html(&raw)),

                Event::SoftBreak | Event::HardBreak => {
                    if self.config.allows_tag("br") {
                        html.push_str("<br />\n");
                    } else {
                        html.push('\n');
                    }
                }

                Event::Rule => {
                    if self.config.allows_tag("hr") {
                        html.push_str("<hr />\n");
                    }
                }

                Event::InlineMath(math) | Event::DisplayMath(math) => {
                    html.push_str(&escape_html(&math));
                }

                Event::FootnoteReference(name) => {
                    html.push_str(&format!("[{}]", escape_html(&name)));
                }

                Event::TaskListMarker(_) => {}
            }
        }

        html
    }

    fn push_image(&self, html: &mut String, image: PendingImage) {
        if !self.config.allows_tag("img") {
            html.push_str(&escape_html(&image.alt));
            return;
        }

        html.push_str("<img");
        if let Some(src) = image.src.filter(|_| self.config.allows_attribute("img", "src")) {
            html.push_str(&format!(" src=\"{}\"", escape_html(&src)));
        }
        if self.config.allows_attribute("img", "alt") {
            html.push_str(&format!(" alt=\"{}\"", escape_html(&image.alt)));
        }
        if !image.title.is_empty() && self.config.allows_attribute("img", "title") {
            html.push_str(&format!(" title=\"{}\"", escape_html(&image.title)));
        }
        html.push_str(" />");
    }
}

/// Element emitted for a markdown tag, if it has a plain element form.
fn element_for(tag: &Tag) -> Option<&'static str> {
    match tag {
        Tag::Paragraph => Some("p"),
        Tag::Heading { level, .. } => Some(match *level as u8 {
            1 => "h1",
            2 => "h2",
            3 => "h3",
            4 => "h4",
            5 => "h5",
            _ => "h6",
        }),
        Tag::BlockQuote(_) => Some("blockquote"),
        Tag::List(Some(_)) => Some("ol"),
        Tag::List(None) => Some("ul"),
        Tag::Item => Some("li"),
        Tag::Emphasis => Some("em"),
        Tag::Strong => Some("strong"),
        Tag::Strikethrough => Some("s"),
        _ => None,
    }
}

fn is_block(name: &str) -> bool {
    matches!(
        name,
        "p" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "blockquote" | "ul" | "ol" | "li"
    )
}
