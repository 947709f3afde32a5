//! Front-matter of a content node

use chrono::{NaiveDate, NaiveDateTime};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

/// Custom deserializer that keeps any scalar (string, number, bool) as its text
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, MapAccess, SeqAccess, Visitor};
    use std::fmt;

    struct ScalarString;

    impl<'de> Visitor<'de> for ScalarString {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, number or boolean")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(value.to_string()))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        // Lists and maps are not display text; drop them instead of failing the node
        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            while seq.next_element::<IgnoredAny>()?.is_some() {}
            Ok(None)
        }

        fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
        where
            M: MapAccess<'de>,
        {
            while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
            Ok(None)
        }

        fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_any(ScalarString)
        }
    }

    deserializer.deserialize_any(ScalarString)
}

/// Front-matter data of a content node
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    #[serde(deserialize_with = "scalar_string")]
    pub title: Option<String>,
    /// Display text, already formatted upstream
    #[serde(deserialize_with = "scalar_string")]
    pub date: Option<String>,
    pub thumbnail: Option<Thumbnail>,
    pub slug: Option<String>,
    /// Pre-rendered excerpt for markdown sources
    pub excerpt: Option<String>,
    /// Nodes are published by default
    #[serde(default = "default_published")]
    pub published: bool,

    /// Additional custom fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

fn default_published() -> bool {
    true
}

impl Default for FrontMatter {
    fn default() -> Self {
        Self {
            title: None,
            date: None,
            thumbnail: None,
            slug: None,
            excerpt: None,
            published: true,
            extra: HashMap::new(),
        }
    }
}

/// Thumbnail reference as produced by the image pipeline
///
/// Either the processed shape `{childImageSharp: {resize: {src}}}` or a plain
/// path. Anything else is kept as `Unrecognized` so one odd value does not
/// sink the whole node.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Thumbnail {
    Path(String),
    Processed(ProcessedImage),
    Unrecognized(IgnoredAny),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProcessedImage {
    #[serde(rename = "childImageSharp", alias = "child_image_sharp")]
    pub child_image_sharp: Option<ImageSharp>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ImageSharp {
    pub resize: Option<ImageResize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ImageResize {
    pub src: Option<String>,
}

impl Thumbnail {
    /// Resolved image source, if the nested path is complete and non-blank
    pub fn src(&self) -> Option<&str> {
        let src = match self {
            Thumbnail::Path(path) => Some(path.as_str()),
            Thumbnail::Processed(image) => image
                .child_image_sharp
                .as_ref()?
                .resize
                .as_ref()?
                .src
                .as_deref(),
            Thumbnail::Unrecognized(_) => None,
        }?;

        let src = src.trim();
        if src.is_empty() {
            None
        } else {
            Some(src)
        }
    }
}

impl FrontMatter {
    /// Parse YAML front-matter from a markdown source
    /// Returns (front_matter, remaining_content)
    pub fn parse(content: &str) -> (Self, &str) {
        let content = content.trim_start();

        if !content.starts_with("---") {
            return (FrontMatter::default(), content);
        }

        let rest = &content[3..];
        let rest = rest.trim_start_matches(['\n', '\r']);

        let Some(end_pos) = rest.find("\n---") else {
            return (FrontMatter::default(), content);
        };

        let yaml_content = &rest[..end_pos];
        let remaining = &rest[end_pos + 4..];
        let remaining = remaining.trim_start_matches(['\n', '\r']);

        if yaml_content.trim().is_empty() {
            return (FrontMatter::default(), remaining);
        }

        // A `---` fence around prose is a markdown rule, not front-matter
        if !yaml_content.lines().any(looks_like_yaml_key) {
            return (FrontMatter::default(), content);
        }

        match serde_yaml::from_str::<FrontMatter>(yaml_content) {
            Ok(fm) => (fm, remaining),
            Err(e) => {
                tracing::warn!(
                    "Failed to parse YAML front-matter, treating as content: {}",
                    e
                );
                (FrontMatter::default(), content)
            }
        }
    }

    /// Title, unless absent or the empty string
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref().filter(|title| !title.is_empty())
    }

    /// Parse the date string for ordering purposes
    pub fn parse_date(&self) -> Option<NaiveDateTime> {
        self.date.as_deref().and_then(parse_date_string)
    }
}

/// `key: value` or `key:` with a plain identifier key (rules out URLs)
fn looks_like_yaml_key(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return false;
    }

    let Some(colon_pos) = trimmed.find(':') else {
        return false;
    };

    let key = &trimmed[..colon_pos];
    let is_valid_key = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        && !matches!(key, "http" | "https" | "ftp");

    let after_colon = &trimmed[colon_pos + 1..];
    is_valid_key && (after_colon.is_empty() || after_colon.starts_with(' '))
}

/// Parse a date string in various formats
fn parse_date_string(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();

    let formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%B %d, %Y",
        "%b %d, %Y",
        "%d %B %Y",
    ];

    for fmt in formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
        // Try parsing date only
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }

    // RFC 3339 / ISO 8601 with offset
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
date: 2024-01-15
thumbnail: /img/hello.jpg
excerpt: "<p>Intro</p>"
---

This is the content.
"#;

        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm.title(), Some("Hello World"));
        assert_eq!(fm.date.as_deref(), Some("2024-01-15"));
        assert_eq!(fm.thumbnail.as_ref().and_then(Thumbnail::src), Some("/img/hello.jpg"));
        assert_eq!(fm.excerpt.as_deref(), Some("<p>Intro</p>"));
        assert!(fm.published);
        assert!(remaining.contains("This is the content."));
    }

    #[test]
    fn test_markdown_separator_not_yaml() {
        let content = r#"
---

Check out https://example.com/path and http://test.com

---
More content.
"#;

        let (fm, remaining) = FrontMatter::parse(content);
        assert_eq!(fm.title, None);
        assert!(remaining.contains("https://example.com"));
    }

    #[test]
    fn test_scalar_titles_keep_their_text() {
        let fm: FrontMatter = serde_json::from_str(r#"{"title": 0, "date": 2020}"#).unwrap();
        assert_eq!(fm.title(), Some("0"));
        assert_eq!(fm.date.as_deref(), Some("2020"));

        let fm: FrontMatter = serde_json::from_str(r#"{"title": null}"#).unwrap();
        assert_eq!(fm.title(), None);
    }

    #[test]
    fn test_whitespace_title_is_kept() {
        let fm: FrontMatter = serde_json::from_str(r#"{"title": "  "}"#).unwrap();
        assert_eq!(fm.title(), Some("  "));

        let fm: FrontMatter = serde_json::from_str(r#"{"title": ""}"#).unwrap();
        assert_eq!(fm.title(), None);
    }

    #[test]
    fn test_non_scalar_title_and_date_are_absent() {
        let fm: FrontMatter =
            serde_json::from_str(r#"{"title": {"en": "Hi"}, "date": ["2020"], "published": false}"#)
                .unwrap();
        assert_eq!(fm.title(), None);
        assert_eq!(fm.date, None);
        // Later fields still parse
        assert!(!fm.published);

        let fm: FrontMatter = serde_yaml::from_str("title: [not, a, scalar]
date: 2020-01-01
").unwrap();
        assert_eq!(fm.title(), None);
        assert_eq!(fm.date.as_deref(), Some("2020-01-01"));
    }

    #[test]
    fn test_processed_thumbnail() {
        let fm: FrontMatter = serde_json::from_str(
            r#"{"thumbnail": {"childImageSharp": {"resize": {"src": "/img/1.jpg"}}}}"#,
        )
        .unwrap();
        assert_eq!(fm.thumbnail.as_ref().and_then(Thumbnail::src), Some("/img/1.jpg"));
    }

    #[test]
    fn test_incomplete_thumbnail_resolves_to_none() {
        for json in [
            r#"{"thumbnail": null}"#,
            r#"{"thumbnail": {}}"#,
            r#"{"thumbnail": {"childImageSharp": null}}"#,
            r#"{"thumbnail": {"childImageSharp": {"resize": {}}}}"#,
            r#"{"thumbnail": {"childImageSharp": {"resize": {"src": ""}}}}"#,
            r#"{"thumbnail": 42}"#,
        ] {
            let fm: FrontMatter = serde_json::from_str(json).unwrap();
            assert_eq!(fm.thumbnail.as_ref().and_then(Thumbnail::src), None, "{}", json);
        }
    }

    #[test]
    fn test_parse_date() {
        let fm = FrontMatter {
            date: Some("2024-01-15 10:30:00".to_string()),
            ..Default::default()
        };
        let dt = fm.parse_date().unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M").to_string(), "2024-01-15 10:30");

        let fm = FrontMatter {
            date: Some("January 01, 2020".to_string()),
            ..Default::default()
        };
        assert_eq!(
            fm.parse_date().unwrap().format("%Y-%m-%d").to_string(),
            "2020-01-01"
        );

        let fm = FrontMatter {
            date: Some("last tuesday".to_string()),
            ..Default::default()
        };
        assert!(fm.parse_date().is_none());
    }
}
