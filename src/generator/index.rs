//! Blog index assembly

use std::cmp::Ordering;
use std::fmt::{self, Write};

use crate::content::PostSummary;

/// Sort posts newest first.
///
/// Posts without a parseable date go last; the sort is stable, so posts
/// with equal keys keep their discovery order.
pub fn sort_posts(posts: &mut [PostSummary]) {
    posts.sort_by(|a, b| match (&a.sort_key, &b.sort_key) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Render the index fragment for already sorted posts
pub fn render_index(title: &str, posts: &[PostSummary]) -> Result<String, fmt::Error> {
    let mut html = String::new();
    writeln!(html, "<h1>{}</h1>", title)?;
    html.push_str("<div class=\"posts-list\">\n");

    for post in posts {
        html.push_str("<article class=\"post-preview\">\n");
        writeln!(html, "    <h2><a href=\"{}\">{}</a></h2>", post.url, post.title)?;
        if let Some(date) = &post.date {
            writeln!(
                html,
                "    <time datetime=\"{}\">{}</time>",
                date, post.formatted_date
            )?;
        }
        if let Some(description) = post.description.as_deref().filter(|d| !d.is_empty()) {
            writeln!(html, "    <p>{}</p>", description)?;
        }
        if !post.tags.is_empty() {
            html.push_str("    <div class=\"tags\">");
            for tag in &post.tags {
                write!(html, "<span class=\"tag\">{}</span>", tag)?;
            }
            html.push_str("</div>\n");
        }
        html.push_str("</article>\n");
    }

    html.push_str("</div>\n");
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::parse_date;

    fn summary(title: &str, date: Option<&str>) -> PostSummary {
        PostSummary {
            title: title.to_string(),
            date: date.map(str::to_string),
            description: None,
            url: format!("/blog/{}.html", title),
            formatted_date: String::new(),
            tags: Vec::new(),
            sort_key: date.and_then(parse_date),
        }
    }

    fn titles(posts: &[PostSummary]) -> Vec<&str> {
        posts.iter().map(|p| p.title.as_str()).collect()
    }

    #[test]
    fn test_sort_newest_first() {
        let mut posts = vec![
            summary("march", Some("2024-03-01")),
            summary("january", Some("2024-01-01")),
            summary("february", Some("2024-02-01")),
        ];
        sort_posts(&mut posts);
        assert_eq!(titles(&posts), vec!["march", "february", "january"]);
    }

    #[test]
    fn test_undated_posts_sort_last_in_discovery_order() {
        let mut posts = vec![
            summary("undated-a", None),
            summary("old", Some("2020-01-01")),
            summary("garbage", Some("someday")),
            summary("new", Some("2024-01-01")),
            summary("undated-b", None),
        ];
        sort_posts(&mut posts);
        assert_eq!(
            titles(&posts),
            vec!["new", "old", "undated-a", "garbage", "undated-b"]
        );
    }

    #[test]
    fn test_equal_dates_keep_discovery_order() {
        let mut posts = vec![
            summary("first", Some("2024-01-01")),
            summary("second", Some("2024-01-01")),
        ];
        sort_posts(&mut posts);
        assert_eq!(titles(&posts), vec!["first", "second"]);
    }

    #[test]
    fn test_render_index_entries() {
        let mut described = summary("hello", Some("2024-01-02"));
        described.formatted_date = "January 2, 2024".to_string();
        described.description = Some("A greeting".to_string());
        described.tags = vec!["a".to_string(), "b".to_string()];

        let html = render_index("Blog Posts", &[described, summary("bare", None)]).unwrap();

        assert!(html.starts_with("<h1>Blog Posts</h1>\n<div class=\"posts-list\">"));
        assert!(html.contains("<h2><a href=\"/blog/hello.html\">hello</a></h2>"));
        assert!(html.contains("<time datetime=\"2024-01-02\">January 2, 2024</time>"));
        assert!(html.contains("<p>A greeting</p>"));
        assert!(html.contains(
            "<div class=\"tags\"><span class=\"tag\">a</span><span class=\"tag\">b</span></div>"
        ));
        assert_eq!(html.matches("<article class=\"post-preview\">").count(), 2);
        assert_eq!(html.matches("<p>").count(), 1);
        assert_eq!(html.matches("<div class=\"tags\">").count(), 1);
    }

    #[test]
    fn test_render_empty_index() {
        let html = render_index("Blog Posts", &[]).unwrap();
        assert_eq!(html, "<h1>Blog Posts</h1>\n<div class=\"posts-list\">\n</div>\n");
    }
}
