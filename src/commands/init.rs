//! Initialize a new site

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::templates::{DEFAULT_MAIN, DEFAULT_POST};

const CONFIG: &str = r#"# Site
title: My Site
index_title: Blog Posts

# URL
## Prefix for internal links when FOLIO_ENV=production
base_path: /my-site
blog_dir: blog

# Directory
content_dir: content
posts_dir: posts
templates_dir: templates
styles_dir: styles
public_dir: public

# Date format (strftime)
date_format: "%B %-d, %Y"

highlight:
  enable: false
  theme: base16-ocean.dark
  line_number: false

server:
  ip: localhost
  port: 3001
"#;

const STYLES: &str = r#"body {
    font-family: system-ui, sans-serif;
    line-height: 1.6;
    max-width: 42rem;
    margin: 0 auto;
    padding: 1rem;
}

nav a {
    margin-right: 1rem;
}

.post-preview {
    margin-bottom: 2rem;
}

.tag {
    display: inline-block;
    margin-right: 0.5rem;
    padding: 0 0.4rem;
    border-radius: 0.2rem;
    background: #eee;
    font-size: 0.85em;
}
"#;

const ABOUT: &str = r#"---
title: About
---

# About

This page lives at `content/about.md` and is rendered to `about.html`.
"#;

const HOME: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8" />
    <title>My Site</title>
    <link rel="stylesheet" href="styles/main.css" />
</head>
<body>
    <h1>My Site</h1>
    <p><a href="blog/">Read the blog</a> or learn more <a href="about.html">about this site</a>.</p>
</body>
</html>
"#;

/// Initialize a new site in the given directory
///
/// Existing files are left untouched, so running it twice is harmless.
pub fn init_site(target_dir: &Path) -> Result<()> {
    let today = chrono::Local::now().format("%Y-%m-%d");
    let hello = format!(
        r#"---
title: Hello World
date: {}
description: The first post on this site.
tags:
  - meta
---

Welcome! Posts live in `content/posts/` and are listed on the blog index,
newest first.

## Writing

Run `folio new "My Next Post"` to start another one.
"#,
        today
    );

    let files: [(&str, &str); 7] = [
        ("_config.yml", CONFIG),
        ("templates/main.html", DEFAULT_MAIN),
        ("templates/post.html", DEFAULT_POST),
        ("styles/main.css", STYLES),
        ("content/about.md", ABOUT),
        ("content/posts/hello-world.md", &hello),
        ("public/index.html", HOME),
    ];

    for (relative, content) in files {
        let path = target_dir.join(relative);
        if path.exists() {
            tracing::info!("Skipped existing {:?}", path);
            continue;
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, content).with_context(|| format!("Failed to write {:?}", path))?;
        tracing::debug!("Created {:?}", path);
    }

    Ok(())
}
