//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::html::strip_html;
use crate::config::SiteConfig;
use crate::content::Post;

/// Characters left alone by `encodeURIComponent`
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Path of a post page
///
/// # Examples
/// ```ignore
/// post_path("hello-world") // -> "/post/hello-world"
/// ```
pub fn post_path(slug: &str) -> String {
    format!("/post/{}", encode_component(slug))
}

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/about") // -> "https://example.com/about"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    let base = config.url.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        format!("{}/", base)
    } else {
        format!("{}/{}", base, path)
    }
}

/// Encode a URL query component
pub fn encode_component(s: &str) -> String {
    utf8_percent_encode(s, COMPONENT).to_string()
}

/// Social share targets for a post
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLinks {
    pub facebook: String,
    pub twitter: String,
    pub pinterest: String,
}

/// Build share links for `post`; `image` is attached to the Pinterest pin
pub fn share_links(config: &SiteConfig, post: &Post, image: Option<&str>) -> ShareLinks {
    let url = encode_component(&full_url_for(config, &post_path(&post.slug)));
    let title = encode_component(&strip_html(&post.title.rendered));

    let mut pinterest = format!(
        "https://pinterest.com/pin/create/button/?url={}&description={}",
        url, title
    );
    if let Some(image) = image {
        pinterest.push_str(&format!("&media={}", encode_component(image)));
    }

    ShareLinks {
        facebook: format!("https://www.facebook.com/sharer/sharer.php?u={}", url),
        twitter: format!("https://twitter.com/intent/tweet?url={}&text={}", url, title),
        pinterest,
    }
}
