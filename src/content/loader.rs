//! Content loader - discovers and loads pages and posts from the content directory

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{ContentKind, Document, FrontMatter, MarkdownRenderer};
use crate::Site;

/// Markdown files found under the content directory, in file-name order
#[derive(Debug, Default)]
pub struct Discovered {
    pub pages: Vec<PathBuf>,
    pub posts: Vec<PathBuf>,
}

impl Discovered {
    /// Pages first, then posts
    pub fn iter(&self) -> impl Iterator<Item = (ContentKind, &Path)> {
        self.pages
            .iter()
            .map(|p| (ContentKind::Page, p.as_path()))
            .chain(self.posts.iter().map(|p| (ContentKind::Post, p.as_path())))
    }
}

/// Loads content from the content directory
pub struct ContentLoader<'a> {
    site: &'a Site,
    renderer: &'a MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(site: &'a Site, renderer: &'a MarkdownRenderer) -> Self {
        Self { site, renderer }
    }

    /// Find all pages and posts
    pub fn discover(&self) -> Result<Discovered> {
        let mut discovered = Discovered::default();
        if !self.site.content_dir.exists() {
            tracing::warn!("Content directory not found: {:?}", self.site.content_dir);
            return Ok(discovered);
        }

        for entry in WalkDir::new(&self.site.content_dir)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file() || !is_markdown_file(path) {
                continue;
            }

            match ContentKind::classify(self.site, path) {
                Some(ContentKind::Page) => discovered.pages.push(path.to_path_buf()),
                Some(ContentKind::Post) => discovered.posts.push(path.to_path_buf()),
                None => tracing::debug!("Skipping {:?}: not a page or post", path),
            }
        }

        tracing::debug!(
            "Discovered {} pages and {} posts",
            discovered.pages.len(),
            discovered.posts.len()
        );
        Ok(discovered)
    }

    /// Load, split and render a single file
    pub fn load(&self, path: &Path, kind: ContentKind) -> Result<Document> {
        let content =
            fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        self.parse(path, kind, &content)
    }

    /// Split and render already loaded text
    pub fn parse(&self, path: &Path, kind: ContentKind, content: &str) -> Result<Document> {
        let (front_matter, body) = FrontMatter::parse(content)
            .with_context(|| format!("Failed to parse front-matter in {:?}", path))?;
        let html = self
            .renderer
            .render(body)
            .with_context(|| format!("Failed to render markdown in {:?}", path))?;

        Ok(Document {
            kind,
            slug: slug_for(path),
            source: path.to_path_buf(),
            front_matter,
            html,
        })
    }

    /// All posts, loaded in discovery order
    pub fn load_posts(&self) -> Result<Vec<Document>> {
        self.discover()?
            .posts
            .iter()
            .map(|p| self.load(p, ContentKind::Post))
            .collect()
    }

    /// All pages, loaded in discovery order
    pub fn load_pages(&self) -> Result<Vec<Document>> {
        self.discover()?
            .pages
            .iter()
            .map(|p| self.load(p, ContentKind::Page))
            .collect()
    }
}

/// File stem of a content file
pub fn slug_for(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("untitled")
        .to_string()
}

/// Only `.md` files are content; the server resolves pages by that extension
fn is_markdown_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("md")
}
