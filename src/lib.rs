//! folio: a small static site generator
//!
//! Markdown pages and blog posts with YAML front-matter are rendered through
//! two Tera templates into a static `public/` tree. A development server
//! renders pages on demand from the same pipeline.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

pub use config::{Environment, SiteConfig};

/// The site being built or served
///
/// Constructed once at startup and shared by reference; nothing in the
/// pipeline reads configuration from the process environment.
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub config: SiteConfig,
    /// Environment the base URL was resolved for
    pub env: Environment,
    /// Prefix for internal links ("" in development)
    pub base_url: String,
    /// Base directory
    pub base_dir: PathBuf,
    /// Markdown pages
    pub content_dir: PathBuf,
    /// Markdown blog posts
    pub posts_dir: PathBuf,
    /// `main.html` and `post.html`
    pub templates_dir: PathBuf,
    /// Stylesheets copied verbatim
    pub styles_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Site {
    /// Create a site from a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P, env: Environment) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            SiteConfig::load(&config_path)?
        } else {
            SiteConfig::default()
        };

        Ok(Self::with_config(base_dir, config, env))
    }

    /// Create a site from an already loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: SiteConfig, env: Environment) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let content_dir = base_dir.join(&config.content_dir);
        let posts_dir = content_dir.join(&config.posts_dir);
        let templates_dir = base_dir.join(&config.templates_dir);
        let styles_dir = base_dir.join(&config.styles_dir);
        let public_dir = base_dir.join(&config.public_dir);
        let base_url = config.base_url(env);

        Self {
            config,
            env,
            base_url,
            base_dir,
            content_dir,
            posts_dir,
            templates_dir,
            styles_dir,
            public_dir,
        }
    }

    /// Output directory for blog posts and the blog index
    pub fn blog_public_dir(&self) -> PathBuf {
        self.public_dir.join(&self.config.blog_dir)
    }

    /// Build the static site
    pub fn build(&self) -> Result<()> {
        commands::build::run(self)
    }
}
