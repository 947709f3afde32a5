//! Content node model

use serde::Deserialize;
use std::fmt;

use super::{FrontMatter, LoadError};

/// HTML that was sanitized upstream and is emitted without escaping
///
/// This is the only way text reaches the excerpt markup unescaped, so
/// constructing one asserts that the content is safe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct TrustedHtml(String);

impl TrustedHtml {
    /// Wrap an HTML fragment that is already sanitized
    pub fn from_sanitized(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for TrustedHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Node as it appears in a query result, before validation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawNode {
    pub slug: Option<String>,
    pub fields: Option<NodeFields>,
    pub frontmatter: FrontMatter,
    pub excerpt: Option<String>,
}

/// Derived fields attached to a node by the content pipeline
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NodeFields {
    pub slug: Option<String>,
}

/// A single blog-post record ready to render
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawNode")]
pub struct ContentNode {
    slug: String,
    pub frontmatter: FrontMatter,
    pub excerpt: TrustedHtml,
}

impl ContentNode {
    /// Create a node; the slug must not be blank
    pub fn new(
        slug: impl Into<String>,
        frontmatter: FrontMatter,
        excerpt: TrustedHtml,
    ) -> Result<Self, LoadError> {
        let slug = slug.into();
        if slug.trim().is_empty() {
            return Err(LoadError::MissingSlug);
        }
        Ok(Self {
            slug,
            frontmatter,
            excerpt,
        })
    }

    /// URL path of the node; target of every link in its excerpt
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Title shown in the excerpt, falling back to the slug
    pub fn display_title(&self) -> &str {
        self.frontmatter.title().unwrap_or(&self.slug)
    }

    /// Resolved thumbnail source, if present
    pub fn thumbnail_src(&self) -> Option<&str> {
        self.frontmatter.thumbnail.as_ref().and_then(|t| t.src())
    }

    /// Pre-formatted date text, empty when absent
    pub fn date(&self) -> &str {
        self.frontmatter.date.as_deref().unwrap_or("")
    }

    pub fn is_published(&self) -> bool {
        self.frontmatter.published
    }
}

impl TryFrom<RawNode> for ContentNode {
    type Error = LoadError;

    fn try_from(raw: RawNode) -> Result<Self, Self::Error> {
        let RawNode {
            slug,
            fields,
            frontmatter,
            excerpt,
        } = raw;

        // Pipeline-derived slug wins over hand-written ones
        let slug = [
            fields.and_then(|f| f.slug),
            slug,
            frontmatter.slug.clone(),
        ]
        .into_iter()
        .flatten()
        .find(|s| !s.trim().is_empty())
        .ok_or(LoadError::MissingSlug)?;

        let excerpt = excerpt
            .or_else(|| frontmatter.excerpt.clone())
            .map(TrustedHtml::from_sanitized)
            .unwrap_or_default();

        ContentNode::new(slug, frontmatter, excerpt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_slug_from_fields() {
        let node: ContentNode = serde_json::from_value(json!({
            "fields": {"slug": "/post-1"},
            "frontmatter": {"title": "Hello World"},
            "excerpt": "<p>Intro text</p>"
        }))
        .unwrap();

        assert_eq!(node.slug(), "/post-1");
        assert_eq!(node.display_title(), "Hello World");
        assert_eq!(node.excerpt.as_str(), "<p>Intro text</p>");
    }

    #[test]
    fn test_fields_slug_takes_precedence() {
        let node: ContentNode = serde_json::from_value(json!({
            "slug": "/top-level",
            "fields": {"slug": "/from-fields"},
            "frontmatter": {"slug": "/from-frontmatter"}
        }))
        .unwrap();
        assert_eq!(node.slug(), "/from-fields");

        let node: ContentNode = serde_json::from_value(json!({
            "fields": {"slug": ""},
            "frontmatter": {"slug": "/from-frontmatter"}
        }))
        .unwrap();
        assert_eq!(node.slug(), "/from-frontmatter");
    }

    #[test]
    fn test_missing_slug_is_rejected() {
        let result: Result<ContentNode, _> = serde_json::from_value(json!({
            "frontmatter": {"title": "Orphan"}
        }));
        assert!(result.is_err());

        let raw = RawNode {
            slug: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            ContentNode::try_from(raw),
            Err(LoadError::MissingSlug)
        ));
    }

    #[test]
    fn test_title_falls_back_to_slug() {
        let node = ContentNode::new("/post-1", FrontMatter::default(), TrustedHtml::default())
            .unwrap();
        assert_eq!(node.display_title(), "/post-1");
        assert_eq!(node.date(), "");
        assert!(node.thumbnail_src().is_none());
        assert!(node.excerpt.is_empty());
    }

    #[test]
    fn test_excerpt_from_frontmatter() {
        let node: ContentNode = serde_json::from_value(json!({
            "slug": "/post-2",
            "frontmatter": {"excerpt": "<em>short</em>"}
        }))
        .unwrap();
        assert_eq!(node.excerpt.as_str(), "<em>short</em>");
    }
}
