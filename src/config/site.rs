//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub source_dir: String,
    pub public_dir: String,
    pub i18n_dir: String,

    // Writing
    pub render_drafts: bool,

    // Index page
    pub stylesheet: Option<String>,

    // Excerpt cards
    #[serde(default)]
    pub excerpt: ExcerptConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            language: "en".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            source_dir: "content".to_string(),
            public_dir: "public".to_string(),
            i18n_dir: "languages".to_string(),

            render_drafts: false,

            stylesheet: None,

            excerpt: ExcerptConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

/// Excerpt card configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExcerptConfig {
    #[serde(default)]
    pub classes: ClassNames,
    /// Image shown when a node has no thumbnail; unset means the image is omitted
    pub thumbnail_placeholder: Option<String>,
    /// Overrides the translated "continue reading" label
    pub more_text: Option<String>,
    pub heading_level: u8,
    pub order_by: String,
}

impl Default for ExcerptConfig {
    fn default() -> Self {
        Self {
            classes: ClassNames::default(),
            thumbnail_placeholder: None,
            more_text: None,
            heading_level: 4,
            order_by: "-date".to_string(),
        }
    }
}

impl ExcerptConfig {
    /// Policy applied when a node carries no usable thumbnail
    pub fn thumbnail_policy(&self) -> ThumbnailPolicy {
        match self.thumbnail_placeholder.as_deref().map(str::trim) {
            Some(src) if !src.is_empty() => ThumbnailPolicy::Placeholder(src.to_string()),
            _ => ThumbnailPolicy::Omit,
        }
    }
}

/// Style class names referenced by the excerpt markup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassNames {
    pub excerpt: String,
    #[serde(rename = "thumbnailAnchor", alias = "thumbnail_anchor")]
    pub thumbnail_anchor: String,
    pub thumbnail: String,
    pub content: String,
    pub date: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            excerpt: "excerpt".to_string(),
            thumbnail_anchor: "thumbnailAnchor".to_string(),
            thumbnail: "thumbnail".to_string(),
            content: "content".to_string(),
            date: "date".to_string(),
        }
    }
}

/// What to do with the image slot when a node has no thumbnail
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailPolicy {
    /// Leave out the thumbnail anchor entirely
    Omit,
    /// Link this image source in place of the missing thumbnail
    Placeholder(String),
}
