//! Presentation helpers
//!
//! Pure functions that shape CMS content for display: dates, HTML
//! stripping and truncation, featured images and URLs.

mod date;
mod html;
mod media;
mod url;

pub use date::*;
pub use html::*;
pub use media::*;
pub use url::*;

use serde::Serialize;

use crate::config::SiteConfig;
use crate::content::Post;

/// Excerpt length on post cards
pub const CARD_EXCERPT_LENGTH: usize = 150;

/// Excerpt length on hero slides
pub const SLIDE_EXCERPT_LENGTH: usize = 120;

/// A post shaped for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostSummary {
    pub id: u64,
    pub slug: String,
    pub path: String,
    /// Title with tags stripped
    pub title: String,
    pub excerpt: String,
    pub image: String,
    pub date: DateParts,
}

impl PostSummary {
    /// Shape `post` using an image of `size` and an excerpt of `excerpt_length` chars
    pub fn from_post(
        config: &SiteConfig,
        post: &Post,
        size: ImageSize,
        excerpt_length: usize,
    ) -> Self {
        Self {
            id: post.id,
            slug: post.slug.clone(),
            path: post_path(&post.slug),
            title: strip_html(&post.title.rendered),
            excerpt: truncate_text(&post.excerpt.rendered, excerpt_length),
            image: featured_image_or(post, size, &config.placeholder_image),
            date: format_date(&post.date),
        }
    }
}
