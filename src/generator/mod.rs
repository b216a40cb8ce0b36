//! Generator module - renders documents and writes the public tree

mod index;

pub use index::{render_index, sort_posts};

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::content::loader::{slug_for, ContentLoader};
use crate::content::{ContentKind, Document, MarkdownRenderer, PostSummary};
use crate::templates::TemplateRenderer;
use crate::Site;

/// Counts reported after a build
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub pages: usize,
    pub posts: usize,
    pub styles: usize,
}

/// Static site generator
///
/// Holds the markdown renderer and the compiled templates; both are
/// read-only after construction, so one generator can serve many requests.
pub struct Generator {
    site: Site,
    markdown: MarkdownRenderer,
    templates: TemplateRenderer,
}

impl Generator {
    /// Create a new generator, compiling the site's templates
    pub fn new(site: &Site) -> Result<Self> {
        let templates = TemplateRenderer::load(site)?;
        Ok(Self::with_templates(site, templates))
    }

    /// Create a generator around already compiled templates
    pub fn with_templates(site: &Site, templates: TemplateRenderer) -> Self {
        Self {
            site: site.clone(),
            markdown: MarkdownRenderer::with_options(&site.config.highlight),
            templates,
        }
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    /// A content loader sharing this generator's markdown renderer
    pub fn loader(&self) -> ContentLoader<'_> {
        ContentLoader::new(&self.site, &self.markdown)
    }

    /// Generate the entire site
    pub fn generate(&self) -> Result<BuildStats> {
        let blog_dir = self.site.blog_public_dir();
        fs::create_dir_all(&self.site.public_dir)
            .with_context(|| format!("Failed to create {:?}", self.site.public_dir))?;
        fs::create_dir_all(&blog_dir)
            .with_context(|| format!("Failed to create {:?}", blog_dir))?;

        // Styles land before any content is written
        let mut stats = BuildStats {
            styles: self.copy_styles()?,
            ..Default::default()
        };

        let loader = self.loader();
        let discovered = loader.discover()?;
        let mut summaries: Vec<PostSummary> = Vec::with_capacity(discovered.posts.len());

        for (kind, path) in discovered.iter() {
            if kind == ContentKind::Page && slug_for(path) == "index" {
                tracing::warn!(
                    "Skipping {:?}: {:?} is managed by hand",
                    path,
                    self.site.public_dir.join("index.html")
                );
                continue;
            }

            let document = loader.load(path, kind)?;
            let html = self.render_document(&document)?;
            let output = document.output_path(&self.site);
            write_file(&output, &html)?;

            match kind {
                ContentKind::Page => {
                    stats.pages += 1;
                    tracing::info!("Created page: {}", output.display());
                }
                ContentKind::Post => {
                    stats.posts += 1;
                    summaries.push(document.summary(&self.site));
                    tracing::info!("Created blog post: {}", output.display());
                }
            }
        }

        let index = self.render_blog_index(summaries)?;
        let index_path = blog_dir.join("index.html");
        write_file(&index_path, &index)?;
        tracing::info!("Created blog index: {}", index_path.display());

        Ok(stats)
    }

    /// Compose a loaded document with its template
    pub fn render_document(&self, document: &Document) -> Result<String> {
        match document.kind {
            ContentKind::Page => self.templates.render_page(document),
            ContentKind::Post => self
                .templates
                .render_post(document, &document.formatted_date(&self.site)),
        }
    }

    /// Split, render and compose page text read from `path`
    pub fn render_page_source(&self, path: &Path, content: &str) -> Result<String> {
        let document = self.loader().parse(path, ContentKind::Page, content)?;
        self.render_document(&document)
    }

    /// Sort the summaries and wrap the index fragment in the main template
    pub fn render_blog_index(&self, mut summaries: Vec<PostSummary>) -> Result<String> {
        sort_posts(&mut summaries);
        let title = &self.site.config.index_title;
        let fragment = render_index(title, &summaries)?;
        self.templates.render_main(title, &fragment)
    }

    /// Copy the styles directory into `<public>/styles`
    fn copy_styles(&self) -> Result<usize> {
        let source_dir = &self.site.styles_dir;
        if !source_dir.exists() {
            tracing::warn!("Styles directory not found: {:?}", source_dir);
            return Ok(0);
        }

        let dest_dir = self.site.public_dir.join("styles");
        let mut copied = 0;

        for entry in WalkDir::new(source_dir).follow_links(true).sort_by_file_name() {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let relative = path.strip_prefix(source_dir)?;
            let dest = dest_dir.join(relative);

            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }

            fs::copy(path, &dest)
                .with_context(|| format!("Failed to copy {:?} to {:?}", path, dest))?;
            tracing::debug!("Copied: {:?} -> {:?}", path, dest);
            copied += 1;
        }

        Ok(copied)
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content).with_context(|| format!("Failed to write {:?}", path))
}
