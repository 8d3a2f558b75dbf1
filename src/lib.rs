//! inkpost: a small content-managed blog
//!
//! Serves Markdown content with YAML front matter through a
//! placeholder-substitution template engine, and syncs posts from an
//! external RSS feed into the content store.

pub mod commands;
pub mod config;
pub mod content;
pub mod render;
pub mod server;
pub mod sync;
pub mod template;

use anyhow::Result;
use std::path::Path;

/// The main blog application
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Content directory (posts and pages)
    pub content_dir: std::path::PathBuf,
    /// Templates directory
    pub templates_dir: std::path::PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let content_dir = base_dir.join(&config.content_dir);
        let templates_dir = base_dir.join(&config.templates_dir);

        Ok(Self {
            config,
            base_dir,
            content_dir,
            templates_dir,
        })
    }

    /// Directory the feed importer writes posts into
    pub fn posts_dir(&self) -> std::path::PathBuf {
        self.content_dir.join("posts")
    }

    /// Directory pages are served from
    pub fn pages_dir(&self) -> std::path::PathBuf {
        self.content_dir.join("pages")
    }
}
