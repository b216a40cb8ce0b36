//! Create a new post or page

use anyhow::Result;
use std::fs;
use std::path::PathBuf;

use crate::Site;

/// Create a markdown file with front-matter for `title`, returning its path
pub fn create(site: &Site, title: &str, page: bool) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Cannot derive a file name from title {:?}", title);
    }

    let target_dir = if page {
        &site.content_dir
    } else {
        &site.posts_dir
    };
    fs::create_dir_all(target_dir)?;

    let file_path = target_dir.join(format!("{}.md", slug));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let title_yaml = serde_yaml::to_string(title)?;
    let mut content = format!("---\ntitle: {}", title_yaml);
    if !page {
        let now = chrono::Local::now();
        content.push_str(&format!(
            "date: {}\ndescription: \"\"\ntags: []\n",
            now.format("%Y-%m-%d")
        ));
    }
    content.push_str("---\n\n");

    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::FrontMatter;
    use crate::Environment;
    use tempfile::TempDir;

    #[test]
    fn test_new_post() {
        let tmp = TempDir::new().unwrap();
        let site = Site::new(tmp.path(), Environment::Development).unwrap();

        let path = create(&site, "My Next Post: Part 2", false).unwrap();
        assert_eq!(path, site.posts_dir.join("my-next-post-part-2.md"));

        let content = fs::read_to_string(&path).unwrap();
        let (fm, _) = FrontMatter::parse(&content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("My Next Post: Part 2"));
        assert!(fm.parse_date().is_some());
    }

    #[test]
    fn test_new_page() {
        let tmp = TempDir::new().unwrap();
        let site = Site::new(tmp.path(), Environment::Development).unwrap();

        let path = create(&site, "Contact", true).unwrap();
        assert_eq!(path, site.content_dir.join("contact.md"));
        let (fm, _) = FrontMatter::parse(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(fm.date.is_none());
    }

    #[test]
    fn test_new_refuses_to_overwrite() {
        let tmp = TempDir::new().unwrap();
        let site = Site::new(tmp.path(), Environment::Development).unwrap();

        create(&site, "Twice", false).unwrap();
        assert!(create(&site, "Twice", false).is_err());
    }
}
