//! Excerpt card rendering
//!
//! Turns a [`ContentNode`] into an `<article>` fragment: a linked thumbnail,
//! a linked title, the pre-rendered excerpt with a "continue reading" link,
//! and the publish date. Rendering is pure and never fails; missing data is
//! resolved through explicit fallbacks.

use std::fmt;

use crate::config::{ClassNames, ExcerptConfig, ThumbnailPolicy};
use crate::content::ContentNode;
use crate::helpers::{html_escape, image_tag, link_to};

/// A rendered HTML fragment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup(String);

impl Markup {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Markup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Renders excerpt cards with a fixed configuration
#[derive(Debug, Clone)]
pub struct ExcerptRenderer {
    classes: ClassNames,
    thumbnail_policy: ThumbnailPolicy,
    more_text: String,
    heading_level: u8,
}

impl Default for ExcerptRenderer {
    fn default() -> Self {
        Self::new(&ExcerptConfig::default(), "Continue reading")
    }
}

impl ExcerptRenderer {
    /// Create a renderer; `more_text` is the label of the "continue reading" link
    pub fn new(config: &ExcerptConfig, more_text: impl Into<String>) -> Self {
        Self {
            classes: config.classes.clone(),
            thumbnail_policy: config.thumbnail_policy(),
            more_text: more_text.into(),
            heading_level: config.heading_level.clamp(1, 6),
        }
    }

    /// Render one node
    pub fn render(&self, node: &ContentNode) -> Markup {
        let slug = node.slug();
        let title = node.display_title();
        let classes = &self.classes;

        let mut html = String::new();
        html.push_str(&format!(
            r#"<article class="{}">"#,
            html_escape(&classes.excerpt)
        ));
        html.push('\n');

        if let Some(src) = self.thumbnail_src(node) {
            let image = image_tag(src, title, Some(&classes.thumbnail));
            html.push_str(&link_to(slug, &image, Some(&classes.thumbnail_anchor)));
            html.push('\n');
        }

        html.push_str(&format!(
            r#"<div class="{}">"#,
            html_escape(&classes.content)
        ));
        html.push('\n');

        html.push_str(&format!(
            "<h{level}>{}</h{level}>",
            link_to(slug, &html_escape(title), None),
            level = self.heading_level
        ));
        html.push('\n');

        // The excerpt is trusted HTML and goes in unescaped
        html.push_str(&format!(
            "<p><span>{}</span>&nbsp; {}</p>",
            node.excerpt.as_str(),
            link_to(slug, &html_escape(&self.more_text), None)
        ));
        html.push('\n');

        html.push_str(&format!(
            r#"<div class="{}"><small>{}</small></div>"#,
            html_escape(&classes.date),
            html_escape(node.date())
        ));
        html.push('\n');

        html.push_str("</div>\n</article>");

        Markup(html)
    }

    /// Render a list of nodes, one card after another
    pub fn render_all<'a, I>(&self, nodes: I) -> Markup
    where
        I: IntoIterator<Item = &'a ContentNode>,
    {
        let cards: Vec<String> = nodes
            .into_iter()
            .map(|node| self.render(node).into_string())
            .collect();
        Markup(cards.join("\n"))
    }

    fn thumbnail_src<'a>(&'a self, node: &'a ContentNode) -> Option<&'a str> {
        if let Some(src) = node.thumbnail_src() {
            return Some(src);
        }

        match &self.thumbnail_policy {
            ThumbnailPolicy::Omit => {
                tracing::debug!("No thumbnail for {}, omitting image", node.slug());
                None
            }
            ThumbnailPolicy::Placeholder(src) => {
                tracing::debug!("No thumbnail for {}, using placeholder", node.slug());
                Some(src.as_str())
            }
        }
    }
}
