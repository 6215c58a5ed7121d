//! HTML helper functions

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TAG: Regex = Regex::new(r"<[^>]*>").unwrap();
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Strip HTML tags from a string
///
/// `&nbsp;` becomes a plain space and the result is trimmed.
pub fn strip_html(s: &str) -> String {
    TAG.replace_all(s, "").replace("&nbsp;", " ").trim().to_string()
}

/// Strip tags, then cut to `max_length` characters
///
/// The ellipsis is appended only when something was cut off.
///
/// # Examples
/// ```ignore
/// truncate_text("<p>Hello <b>world</b></p>", 5) // -> "Hello..."
/// ```
pub fn truncate_text(s: &str, max_length: usize) -> String {
    let stripped = strip_html(s);

    if stripped.chars().count() <= max_length {
        stripped
    } else {
        let truncated: String = stripped.chars().take(max_length).collect();
        format!("{}...", truncated.trim())
    }
}

/// Generate an image tag
pub fn image_tag(src: &str, alt: &str, class: Option<&str>) -> String {
    let class_attr = class
        .map(|c| format!(r#" class="{}""#, html_escape(c)))
        .unwrap_or_default();

    format!(
        r#"<img src="{}" alt="{}"{}>"#,
        html_escape(src),
        html_escape(alt),
        class_attr
    )
}

/// Generate an anchor tag; `text` is inserted as-is
pub fn link_to(href: &str, text: &str, external: bool) -> String {
    if external {
        format!(
            r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
            html_escape(href),
            text
        )
    } else {
        format!(r#"<a href="{}">{}</a>"#, html_escape(href), text)
    }
}
