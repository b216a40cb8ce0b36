//! Page and post models

use chrono::NaiveDateTime;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::FrontMatter;
use crate::helpers::{format_date, url_for};
use crate::Site;

/// Whether a markdown file is a standalone page or a blog post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Page,
    Post,
}

impl ContentKind {
    /// Classify a file by the directory that directly contains it.
    ///
    /// Direct children of the posts directory are posts, direct children of
    /// the content directory are pages, anything else is not site content.
    pub fn classify(site: &Site, path: &Path) -> Option<Self> {
        let parent = path.parent()?;
        if parent == site.posts_dir {
            Some(ContentKind::Post)
        } else if parent == site.content_dir {
            Some(ContentKind::Page)
        } else {
            None
        }
    }
}

/// A markdown file after front-matter has been split off and the body rendered
#[derive(Debug, Clone)]
pub struct Document {
    pub kind: ContentKind,
    /// File stem, used for the output file name
    pub slug: String,
    /// Source file path
    pub source: PathBuf,
    pub front_matter: FrontMatter,
    /// Rendered HTML body
    pub html: String,
}

impl Document {
    /// Title from front-matter, falling back to the slug
    pub fn title(&self) -> &str {
        self.front_matter.title.as_deref().unwrap_or(&self.slug)
    }

    fn site_path(&self, site: &Site) -> String {
        match self.kind {
            ContentKind::Page => format!("/{}.html", self.slug),
            ContentKind::Post => format!("/{}/{}.html", site.config.blog_dir, self.slug),
        }
    }

    /// Where the composed document is written
    pub fn output_path(&self, site: &Site) -> PathBuf {
        let file_name = format!("{}.html", self.slug);
        match self.kind {
            ContentKind::Page => site.public_dir.join(file_name),
            ContentKind::Post => site.blog_public_dir().join(file_name),
        }
    }

    /// Public URL, including the base URL
    pub fn url(&self, site: &Site) -> String {
        url_for(&site.base_url, &self.site_path(site))
    }

    /// Display form of the date, empty when the date is missing or unparsable
    pub fn formatted_date(&self, site: &Site) -> String {
        self.front_matter
            .parse_date()
            .and_then(|d| format_date(&d, &site.config.date_format))
            .unwrap_or_default()
    }

    /// Index entry for this document
    pub fn summary(&self, site: &Site) -> PostSummary {
        PostSummary {
            title: self.title().to_string(),
            date: self.front_matter.date.clone(),
            description: self.front_matter.description.clone(),
            url: self.url(site),
            formatted_date: self.formatted_date(site),
            tags: self.front_matter.tags.clone(),
            sort_key: self.front_matter.parse_date(),
        }
    }
}

/// A blog post as listed on the index page
#[derive(Debug, Clone, Serialize)]
pub struct PostSummary {
    pub title: String,
    /// Raw front-matter date
    pub date: Option<String>,
    pub description: Option<String>,
    pub url: String,
    pub formatted_date: String,
    pub tags: Vec<String>,
    /// Parsed date; `None` sorts after every dated post
    #[serde(skip)]
    pub sort_key: Option<NaiveDateTime>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Environment, SiteConfig};

    fn site(env: Environment) -> Site {
        let config = SiteConfig {
            base_path: "/notebook".to_string(),
            ..Default::default()
        };
        Site::with_config("/srv/site", config, env)
    }

    fn document(kind: ContentKind, slug: &str, front_matter: FrontMatter) -> Document {
        Document {
            kind,
            slug: slug.to_string(),
            source: PathBuf::from(format!("{}.md", slug)),
            front_matter,
            html: String::new(),
        }
    }

    #[test]
    fn test_classify_by_parent_directory() {
        let site = site(Environment::Development);
        assert_eq!(
            ContentKind::classify(&site, Path::new("/srv/site/content/about.md")),
            Some(ContentKind::Page)
        );
        assert_eq!(
            ContentKind::classify(&site, Path::new("/srv/site/content/posts/x.md")),
            Some(ContentKind::Post)
        );
        assert_eq!(
            ContentKind::classify(&site, Path::new("/srv/site/content/posts/old/x.md")),
            None
        );
        assert_eq!(
            ContentKind::classify(&site, Path::new("/srv/site/content/drafts/x.md")),
            None
        );
    }

    #[test]
    fn test_classify_does_not_match_substrings() {
        let site = site(Environment::Development);
        assert_eq!(
            ContentKind::classify(&site, Path::new("/srv/site/content/my-posts.md")),
            Some(ContentKind::Page)
        );
        let nested = Site::with_config(
            "/srv/posts/site",
            SiteConfig::default(),
            Environment::Development,
        );
        assert_eq!(
            ContentKind::classify(&nested, Path::new("/srv/posts/site/content/x.md")),
            Some(ContentKind::Page)
        );
    }

    #[test]
    fn test_output_paths() {
        let site = site(Environment::Development);
        let page = document(ContentKind::Page, "x", FrontMatter::default());
        let post = document(ContentKind::Post, "x", FrontMatter::default());
        assert_eq!(page.output_path(&site), PathBuf::from("/srv/site/public/x.html"));
        assert_eq!(
            post.output_path(&site),
            PathBuf::from("/srv/site/public/blog/x.html")
        );
    }

    #[test]
    fn test_urls_follow_environment() {
        let post = document(ContentKind::Post, "x", FrontMatter::default());
        assert_eq!(post.url(&site(Environment::Development)), "/blog/x.html");
        assert_eq!(
            post.url(&site(Environment::Production)),
            "/notebook/blog/x.html"
        );
    }

    #[test]
    fn test_title_falls_back_to_slug() {
        let untitled = document(ContentKind::Page, "faq", FrontMatter::default());
        assert_eq!(untitled.title(), "faq");

        let titled = document(
            ContentKind::Page,
            "faq",
            FrontMatter {
                title: Some("Questions".to_string()),
                ..Default::default()
            },
        );
        assert_eq!(titled.title(), "Questions");
    }

    #[test]
    fn test_summary() {
        let site = site(Environment::Development);
        let post = document(
            ContentKind::Post,
            "first",
            FrontMatter {
                title: Some("First".to_string()),
                date: Some("2024-01-02".to_string()),
                tags: vec!["a".to_string()],
                ..Default::default()
            },
        );
        let summary = post.summary(&site);
        assert_eq!(summary.title, "First");
        assert_eq!(summary.url, "/blog/first.html");
        assert_eq!(summary.formatted_date, "January 2, 2024");
        assert!(summary.sort_key.is_some());

        let undated = document(ContentKind::Post, "later", FrontMatter::default());
        let summary = undated.summary(&site);
        assert_eq!(summary.formatted_date, "");
        assert!(summary.sort_key.is_none());
    }
}
