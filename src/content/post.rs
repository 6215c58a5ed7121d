//! Post and Page models as served by the WordPress REST API

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A `{ "rendered": "..." }` field from the REST API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rendered {
    #[serde(default)]
    pub rendered: String,
}

impl From<&str> for Rendered {
    fn from(s: &str) -> Self {
        Self {
            rendered: s.to_string(),
        }
    }
}

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Post id
    pub id: u64,

    /// Publication date, site local (`2024-01-15T10:30:00`)
    #[serde(default)]
    pub date: String,

    /// Rendered title (may contain HTML entities)
    #[serde(default)]
    pub title: Rendered,

    /// Rendered excerpt HTML
    #[serde(default)]
    pub excerpt: Rendered,

    /// Rendered body HTML
    #[serde(default)]
    pub content: Rendered,

    /// URL-safe slug
    #[serde(default)]
    pub slug: String,

    /// Featured media attachment id (0 when unset)
    #[serde(default)]
    pub featured_media: u64,

    /// Embedded resources, present when requested with `_embed`
    #[serde(rename = "_embedded", default, skip_serializing_if = "Option::is_none")]
    pub embedded: Option<Embedded>,
}

impl Post {
    /// Create a post with minimal required fields
    pub fn new(id: u64, slug: &str, title: &str, date: &str) -> Self {
        Self {
            id,
            date: date.to_string(),
            title: title.into(),
            excerpt: Rendered::default(),
            content: Rendered::default(),
            slug: slug.to_string(),
            featured_media: 0,
            embedded: None,
        }
    }

    /// First embedded featured media entry, if any
    pub fn featured_media(&self) -> Option<&Media> {
        self.embedded.as_ref()?.featured_media.first()
    }
}

/// Resources embedded by `_embed`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Embedded {
    #[serde(rename = "wp:featuredmedia", default)]
    pub featured_media: Vec<Media>,
}

/// A media attachment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Media {
    /// Canonical (original upload) URL
    #[serde(default)]
    pub source_url: String,

    #[serde(default)]
    pub alt_text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_details: Option<MediaDetails>,
}

/// Pre-generated renditions of a media attachment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaDetails {
    #[serde(default)]
    pub sizes: HashMap<String, MediaSize>,
}

/// A single rendition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaSize {
    #[serde(default)]
    pub source_url: String,
}

/// A static page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: u64,

    #[serde(default)]
    pub title: Rendered,

    #[serde(default)]
    pub content: Rendered,

    #[serde(default)]
    pub slug: String,
}

/// One page of posts together with the server-reported page count
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostBatch {
    pub posts: Vec<Post>,
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
}

impl PostBatch {
    /// The neutral batch returned when the CMS cannot be reached
    pub fn empty() -> Self {
        Self::default()
    }
}
