//! URL helper functions

/// Prefix an internal path with the site's base URL
///
/// Absolute URLs, protocol-relative URLs and in-page anchors are returned
/// unchanged.
///
/// # Examples
/// ```
/// use folio::helpers::url_for;
///
/// assert_eq!(url_for("/notebook", "/styles/main.css"), "/notebook/styles/main.css");
/// assert_eq!(url_for("", "/blog/"), "/blog/");
/// ```
pub fn url_for(base_url: &str, path: &str) -> String {
    if is_external(path) || path.starts_with('#') {
        return path.to_string();
    }

    let base = base_url.trim_end_matches('/');
    if path.is_empty() {
        return format!("{}/", base);
    }

    if path.starts_with('/') {
        format!("{}{}", base, path)
    } else {
        format!("{}/{}", base, path)
    }
}

/// Whether a link points outside the site
pub fn is_external(path: &str) -> bool {
    path.starts_with("http://")
        || path.starts_with("https://")
        || path.starts_with("//")
        || path.starts_with("mailto:")
}

/// Decode a percent-encoded URL path segment
pub fn decode_segment(segment: &str) -> String {
    percent_encoding::percent_decode_str(segment)
        .decode_utf8_lossy()
        .into_owned()
}
