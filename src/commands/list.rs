//! List site content

use anyhow::Result;
use indexmap::IndexMap;
use std::fmt::Write;

use crate::content::loader::ContentLoader;
use crate::content::{MarkdownRenderer, PostSummary};
use crate::generator::sort_posts;
use crate::Site;

/// List site content by type
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    print!("{}", render(site, content_type)?);
    Ok(())
}

/// Render the listing as text
pub fn render(site: &Site, content_type: &str) -> Result<String> {
    let renderer = MarkdownRenderer::new();
    let loader = ContentLoader::new(site, &renderer);
    let mut out = String::new();

    match content_type {
        "post" | "posts" => {
            let posts = sorted_summaries(site, &loader)?;
            writeln!(out, "Posts ({}):", posts.len())?;
            for post in posts {
                let date = post.sort_key.map(|d| d.format("%Y-%m-%d").to_string());
                writeln!(
                    out,
                    "  {} - {} [{}]",
                    date.as_deref().unwrap_or("undated   "),
                    post.title,
                    post.url
                )?;
            }
        }
        "page" | "pages" => {
            let pages = loader.load_pages()?;
            writeln!(out, "Pages ({}):", pages.len())?;
            for page in pages {
                writeln!(out, "  {} [{}]", page.title(), page.url(site))?;
            }
        }
        "tag" | "tags" => {
            let posts = sorted_summaries(site, &loader)?;
            let mut tags: IndexMap<String, usize> = IndexMap::new();
            for post in &posts {
                for tag in &post.tags {
                    *tags.entry(tag.clone()).or_insert(0) += 1;
                }
            }
            writeln!(out, "Tags ({}):", tags.len())?;
            let mut tags: Vec<_> = tags.into_iter().collect();
            tags.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            for (tag, count) in tags {
                writeln!(out, "  {} ({})", tag, count)?;
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, page, tag",
                content_type
            );
        }
    }

    Ok(out)
}

fn sorted_summaries(site: &Site, loader: &ContentLoader) -> Result<Vec<PostSummary>> {
    let mut posts: Vec<_> = loader
        .load_posts()?
        .iter()
        .map(|post| post.summary(site))
        .collect();
    sort_posts(&mut posts);
    Ok(posts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Environment;
    use std::fs;
    use tempfile::TempDir;

    fn site() -> (TempDir, Site) {
        let tmp = TempDir::new().unwrap();
        let posts = tmp.path().join("content/posts");
        fs::create_dir_all(&posts).unwrap();
        fs::write(
            posts.join("old.md"),
            "---\ntitle: Old\ndate: 2023-05-01\ntags: [rust, web]\n---\n",
        )
        .unwrap();
        fs::write(
            posts.join("new.md"),
            "---\ntitle: New\ndate: 2024-05-01\ntags: [rust]\n---\n",
        )
        .unwrap();
        fs::write(tmp.path().join("content/about.md"), "# About").unwrap();
        let site = Site::new(tmp.path(), Environment::Development).unwrap();
        (tmp, site)
    }

    #[test]
    fn test_list_posts_newest_first() {
        let (_tmp, site) = site();
        let out = render(&site, "posts").unwrap();
        assert_eq!(
            out,
            "Posts (2):\n  2024-05-01 - New [/blog/new.html]\n  2023-05-01 - Old [/blog/old.html]\n"
        );
    }

    #[test]
    fn test_list_pages_and_tags() {
        let (_tmp, site) = site();
        assert_eq!(render(&site, "page").unwrap(), "Pages (1):\n  about [/about.html]\n");
        assert_eq!(
            render(&site, "tags").unwrap(),
            "Tags (2):\n  rust (2)\n  web (1)\n"
        );
    }

    #[test]
    fn test_list_unknown_type() {
        let (_tmp, site) = site();
        assert!(render(&site, "drafts").is_err());
    }
}
