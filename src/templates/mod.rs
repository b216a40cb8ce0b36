//! Page templates using the Tera template engine
//!
//! `main.html` wraps pages and the blog index, `post.html` wraps blog posts.
//! Both are compiled once and shared read-only.

use anyhow::{Context as _, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tera::{Context, Tera};

use crate::content::Document;
use crate::helpers::url_for;
use crate::Site;

/// Template for pages and the blog index
pub const MAIN_TEMPLATE: &str = "main.html";
/// Template for blog posts
pub const POST_TEMPLATE: &str = "post.html";

/// Variables every template receives; extra front-matter fields may not
/// shadow them
const RESERVED: [&str; 8] = [
    "content",
    "title",
    "is_post",
    "date",
    "formatted_date",
    "description",
    "tags",
    "base_url",
];

/// Template renderer holding the compiled page and post templates
pub struct TemplateRenderer {
    tera: Tera,
    base_url: String,
}

impl TemplateRenderer {
    /// Read and compile `main.html` and `post.html` from the templates directory
    pub fn load(site: &Site) -> Result<Self> {
        let main = read_template(&site.templates_dir, MAIN_TEMPLATE)?;
        let post = read_template(&site.templates_dir, POST_TEMPLATE)?;
        Self::from_sources(&main, &post, &site.base_url)
    }

    /// Compile templates from source text
    pub fn from_sources(main: &str, post: &str, base_url: &str) -> Result<Self> {
        let mut tera = Tera::default();

        // Content is trusted HTML; nothing is escaped
        tera.autoescape_on(vec![]);

        tera.add_raw_templates(vec![(MAIN_TEMPLATE, main), (POST_TEMPLATE, post)])
            .context("Failed to compile templates")?;

        let base = base_url.to_string();
        tera.register_function(
            "url",
            move |args: &HashMap<String, tera::Value>| -> tera::Result<tera::Value> {
                let path = match args.get("path") {
                    Some(val) => tera::try_get_value!("url", "path", String, val),
                    None => String::new(),
                };
                Ok(tera::Value::String(url_for(&base, &path)))
            },
        );

        let base = base_url.to_string();
        tera.register_filter(
            "url",
            move |value: &tera::Value,
                  _args: &HashMap<String, tera::Value>|
                  -> tera::Result<tera::Value> {
                let path = tera::try_get_value!("url", "value", String, value);
                Ok(tera::Value::String(url_for(&base, &path)))
            },
        );

        Ok(Self {
            tera,
            base_url: base_url.to_string(),
        })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        self.tera
            .render(template_name, context)
            .with_context(|| format!("Failed to render template {}", template_name))
    }

    /// Wrap an HTML fragment in the main template
    pub fn render_main(&self, title: &str, content: &str) -> Result<String> {
        let context = self.base_context(&PageContext {
            title,
            content,
            is_post: false,
        });
        self.render(MAIN_TEMPLATE, &context)
    }

    /// Render a page document through the main template
    pub fn render_page(&self, document: &Document) -> Result<String> {
        let mut context = self.base_context(&PageContext {
            title: document.title(),
            content: &document.html,
            is_post: false,
        });
        insert_front_matter(&mut context, document, None);
        self.render(MAIN_TEMPLATE, &context)
    }

    /// Render a post document through the post template
    pub fn render_post(&self, document: &Document, formatted_date: &str) -> Result<String> {
        let mut context = self.base_context(&PageContext {
            title: document.title(),
            content: &document.html,
            is_post: true,
        });
        insert_front_matter(&mut context, document, Some(formatted_date));
        self.render(POST_TEMPLATE, &context)
    }

    fn base_context(&self, page: &PageContext) -> Context {
        let mut context = Context::new();
        context.insert("title", page.title);
        context.insert("content", page.content);
        context.insert("is_post", &page.is_post);
        context.insert("base_url", &self.base_url);
        context
    }
}

struct PageContext<'a> {
    title: &'a str,
    content: &'a str,
    is_post: bool,
}

fn insert_front_matter(context: &mut Context, document: &Document, formatted_date: Option<&str>) {
    let fm = &document.front_matter;
    if let Some(date) = &fm.date {
        context.insert("date", date);
    }
    if let Some(formatted_date) = formatted_date {
        context.insert("formatted_date", formatted_date);
    }
    if let Some(description) = &fm.description {
        context.insert("description", description);
    }
    context.insert("tags", &fm.tags);

    for (key, value) in &fm.extra {
        if RESERVED.contains(&key.as_str()) {
            continue;
        }
        context.insert(key.as_str(), value);
    }
}

fn read_template(templates_dir: &Path, name: &str) -> Result<String> {
    let path = templates_dir.join(name);
    fs::read_to_string(&path).with_context(|| format!("Failed to read template {:?}", path))
}

/// Default page template written by `init`
pub const DEFAULT_MAIN: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>{{ title }}</title>
    <link rel="stylesheet" href="{{ url(path="/styles/main.css") }}" />
</head>
<body>
    <nav>
        <a href="{{ url(path="/") }}">Home</a>
        <a href="{{ url(path="/blog/") }}">Blog</a>
        <a href="{{ url(path="/about.html") }}">About</a>
    </nav>
    <main{% if is_post %} class="post"{% endif %}>
{{ content }}
    </main>
</body>
</html>
"#;

/// Default post template written by `init`
pub const DEFAULT_POST: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>{{ title }}</title>
    {% if description %}<meta name="description" content="{{ description }}" />{% endif %}
    <link rel="stylesheet" href="{{ url(path="/styles/main.css") }}" />
</head>
<body>
    <nav>
        <a href="{{ url(path="/") }}">Home</a>
        <a href="{{ url(path="/blog/") }}">Blog</a>
    </nav>
    <article class="post">
        <h1>{{ title }}</h1>
        {% if date %}<time datetime="{{ date }}">{{ formatted_date }}</time>{% endif %}
        {% if tags %}
        <div class="tags">
            {% for tag in tags %}<span class="tag">{{ tag }}</span>{% endfor %}
        </div>
        {% endif %}
{{ content }}
    </article>
</body>
</html>
"#;
