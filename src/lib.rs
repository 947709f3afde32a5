//! excerpt-rs: blog-post excerpt cards for static sites
//!
//! This crate renders excerpt cards (thumbnail, title, pre-rendered excerpt,
//! "continue reading" link and date) from content nodes produced by a
//! static-site content pipeline.

pub mod commands;
pub mod config;
pub mod content;
pub mod excerpt;
pub mod helpers;
pub mod i18n;

use anyhow::Result;
use std::path::{Path, PathBuf};

pub use content::{ContentNode, TrustedHtml};
pub use excerpt::{ExcerptRenderer, Markup};

/// Name of the site configuration file
pub const CONFIG_FILE: &str = "_config.yml";

/// A site directory and its configuration
#[derive(Clone)]
pub struct Site {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Default input (content nodes)
    pub source_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
    /// Language files directory
    pub i18n_dir: PathBuf,
}

impl Site {
    /// Create a new site from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join(CONFIG_FILE);

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a site from an already loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let source_dir = base_dir.join(&config.source_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let i18n_dir = base_dir.join(&config.i18n_dir);

        Self {
            config,
            base_dir,
            source_dir,
            public_dir,
            i18n_dir,
        }
    }

    /// Path of the configuration file
    pub fn config_path(&self) -> PathBuf {
        self.base_dir.join(CONFIG_FILE)
    }

    /// Resolve a user-supplied path against the base directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Build an excerpt renderer with the configured label and classes
    pub fn renderer(&self) -> Result<ExcerptRenderer> {
        let more_text = match &self.config.excerpt.more_text {
            Some(text) => text.clone(),
            None => {
                let mut labels = i18n::I18n::new(&self.config.language);
                labels.load_languages(&self.i18n_dir)?;
                labels.get(i18n::CONTINUE_READING)
            }
        };

        Ok(ExcerptRenderer::new(&self.config.excerpt, more_text))
    }

    /// Load the content nodes under `input`
    pub fn load_nodes(&self, input: &Path) -> Result<Vec<ContentNode>> {
        Ok(content::NodeLoader::new(self).load(input)?)
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
