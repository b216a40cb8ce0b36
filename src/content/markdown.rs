//! Markdown rendering

use anyhow::Result;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use std::collections::HashMap;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::HighlightConfig;

/// Markdown renderer
///
/// Headings get slug ids, single newlines become `<br />`, quotes and
/// dashes are made typographic, and raw HTML passes through untouched.
pub struct MarkdownRenderer {
    highlighter: Option<Highlighter>,
}

struct Highlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
}

impl MarkdownRenderer {
    /// Create a renderer without code highlighting
    pub fn new() -> Self {
        Self { highlighter: None }
    }

    /// Create a renderer from the highlight configuration
    pub fn with_options(highlight: &HighlightConfig) -> Self {
        let highlighter = highlight.enable.then(|| Highlighter {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: highlight.theme.clone(),
            line_numbers: highlight.line_number,
        });
        Self { highlighter }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> Result<String> {
        // Front-matter is split off before rendering, so no metadata blocks
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut ids = HeadingIds::default();

        // Heading currently being collected: its start tag, inner events and text
        let mut heading: Option<(Tag, Vec<Event>, String)> = None;

        let mut in_code_block = false;
        let mut code_block_lang: Option<String> = None;
        let mut code_block_content = String::new();

        for event in parser {
            if matches!(event, Event::End(TagEnd::Heading(_))) {
                if let Some((start, inner, text)) = heading.take() {
                    events.push(Event::Start(ids.assign(start, &text)));
                    events.extend(inner);
                }
                events.push(event);
                continue;
            }

            if let Some((_, inner, text)) = heading.as_mut() {
                match event {
                    Event::Text(ref t) | Event::Code(ref t) => {
                        text.push_str(t);
                        inner.push(event);
                    }
                    Event::SoftBreak => {
                        text.push(' ');
                        inner.push(Event::HardBreak);
                    }
                    _ => inner.push(event),
                }
                continue;
            }

            match event {
                Event::Start(tag @ Tag::Heading { .. }) => {
                    heading = Some((tag, Vec::new(), String::new()));
                }
                Event::Start(Tag::CodeBlock(kind)) if self.highlighter.is_some() => {
                    in_code_block = true;
                    code_block_lang = match kind {
                        CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                        _ => None,
                    };
                    code_block_content.clear();
                }
                Event::End(TagEnd::CodeBlock) if in_code_block => {
                    if let Some(highlighter) = &self.highlighter {
                        let highlighted =
                            highlighter.highlight(&code_block_content, code_block_lang.as_deref());
                        events.push(Event::Html(CowStr::from(highlighted)));
                    }
                    in_code_block = false;
                    code_block_lang = None;
                }
                Event::Text(text) if in_code_block => {
                    code_block_content.push_str(&text);
                }
                Event::SoftBreak => events.push(Event::HardBreak),
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Hands out unique heading ids within one document
#[derive(Default)]
struct HeadingIds {
    seen: HashMap<String, usize>,
}

impl HeadingIds {
    fn assign<'a>(&mut self, tag: Tag<'a>, text: &str) -> Tag<'a> {
        let Tag::Heading {
            level,
            id,
            classes,
            attrs,
        } = tag
        else {
            return tag;
        };

        // An explicit `{#id}` wins, but still reserves its slot
        let id = match id {
            Some(explicit) => {
                self.seen.entry(explicit.to_string()).or_insert(0);
                explicit
            }
            None => CowStr::from(self.unique(&heading_slug(text))),
        };

        Tag::Heading {
            level,
            id: Some(id),
            classes,
            attrs,
        }
    }

    fn unique(&mut self, slug: &str) -> String {
        let Some(count) = self.seen.get(slug).copied() else {
            self.seen.insert(slug.to_string(), 0);
            return slug.to_string();
        };

        // Skip suffixes already taken by real headings
        let mut n = count + 1;
        let mut candidate = format!("{}-{}", slug, n);
        while self.seen.contains_key(&candidate) {
            n += 1;
            candidate = format!("{}-{}", slug, n);
        }
        self.seen.insert(slug.to_string(), n);
        self.seen.insert(candidate.clone(), 0);
        candidate
    }
}

/// Anchor id for a heading's text
pub fn heading_slug(text: &str) -> String {
    let slug = slug::slugify(text);
    if slug.is_empty() {
        "section".to_string()
    } else {
        slug
    }
}

impl Highlighter {
    /// Highlight a code block
    fn highlight(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next());

        let highlighted = theme.and_then(|theme| {
            highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok()
        });

        match highlighted {
            Some(highlighted) if self.line_numbers => add_line_numbers(&highlighted, lang),
            Some(highlighted) => format!(
                r#"<div class="highlight language-{}">{}</div>"#,
                lang, highlighted
            ),
            None => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                lang,
                html_escape(code)
            ),
        }
    }
}

/// Add line numbers to highlighted code
fn add_line_numbers(code: &str, lang: &str) -> String {
    let lines: Vec<&str> = code.lines().collect();

    let gutter = (1..=lines.len())
        .map(|n| format!(r#"<span class="line-number">{}</span>"#, n))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code">{}</td></tr></table></figure>"#,
        lang,
        gutter,
        lines.join("\n")
    )
}

/// Simple HTML escaping
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_basic_markdown() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Hello World\n\nThis is a test.").unwrap();
        assert!(html.contains(r#"<h1 id="hello-world">Hello World</h1>"#));
        assert!(html.contains("<p>This is a test.</p>"));
    }

    #[test]
    fn test_duplicate_heading_ids() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("## Notes\n\n## Notes\n\n## Notes").unwrap();
        assert!(html.contains(r#"<h2 id="notes">"#));
        assert!(html.contains(r#"<h2 id="notes-1">"#));
        assert!(html.contains(r#"<h2 id="notes-2">"#));
    }

    #[test]
    fn test_duplicate_heading_skips_taken_suffix() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("## Notes 1\n\n## Notes\n\n## Notes").unwrap();
        assert_eq!(html.matches(r#"id="notes-1""#).count(), 1);
        assert!(html.contains(r#"<h2 id="notes-1">Notes 1</h2>"#));
        assert!(html.contains(r#"<h2 id="notes">Notes</h2>"#));
        assert!(html.contains(r#"<h2 id="notes-2">Notes</h2>"#));
    }

    #[test]
    fn test_explicit_heading_id() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("# Intro {#start}").unwrap();
        assert!(html.contains(r#"<h1 id="start">Intro</h1>"#));
    }

    #[test]
    fn test_heading_with_inline_code() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("## Using `cargo` today").unwrap();
        assert!(html.contains(r#"id="using-cargo-today""#));
        assert!(html.contains("<code>cargo</code>"));
    }

    #[test]
    fn test_single_newline_is_line_break() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("first line\nsecond line").unwrap();
        assert!(html.contains("first line<br />\nsecond line"));
    }

    #[test]
    fn test_smart_punctuation() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("\"quoted\" -- and --- it's").unwrap();
        assert!(html.contains('\u{201c}'));
        assert!(html.contains('\u{201d}'));
        assert!(html.contains('\u{2013}'));
        assert!(html.contains('\u{2014}'));
        assert!(html.contains('\u{2019}'));
    }

    #[test]
    fn test_gfm_tables_and_strikethrough() {
        let renderer = MarkdownRenderer::new();
        let html = renderer
            .render("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~")
            .unwrap();
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>1</td>"));
        assert!(html.contains("<del>gone</del>"));
    }

    #[test]
    fn test_xhtml_void_elements() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("![alt](/x.png)\n\n***").unwrap();
        assert!(html.contains(r#"<img src="/x.png" alt="alt" />"#));
        assert!(html.contains("<hr />"));
    }

    #[test]
    fn test_raw_html_passthrough() {
        let renderer = MarkdownRenderer::new();
        let html = renderer
            .render("<div class=\"note\">kept</div>\n\ntext <span>inline</span>")
            .unwrap();
        assert!(html.contains("<div class=\"note\">kept</div>"));
        assert!(html.contains("<span>inline</span>"));
    }

    #[test]
    fn test_plain_code_block() {
        let renderer = MarkdownRenderer::new();
        let html = renderer.render("```rust\nfn main() {}\n```").unwrap();
        assert!(html.contains(r#"<pre><code class="language-rust">fn main() {}"#));
    }

    #[test]
    fn test_highlighted_code_block() {
        let renderer = MarkdownRenderer::with_options(&HighlightConfig {
            enable: true,
            line_number: true,
            ..Default::default()
        });
        let html = renderer.render("```rust\nfn main() {}\n```").unwrap();
        assert!(html.contains("highlight rust"));
        assert!(html.contains("line-number"));
        assert!(!html.contains("<code class=\"language-rust\">"));
    }

    #[test]
    fn test_heading_slug_fallback() {
        assert_eq!(heading_slug("Hi"), "hi");
        assert_eq!(heading_slug("!!!"), "section");
    }
}
