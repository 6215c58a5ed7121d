//! Featured image selection

use std::fmt;
use std::str::FromStr;

use crate::content::Post;

/// Shown when a post has no usable featured image
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.jpg";

/// Pre-generated image renditions WordPress offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    Medium,
    #[default]
    Large,
    Full,
}

impl ImageSize {
    /// Key of this size in `media_details.sizes`
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Medium => "medium",
            ImageSize::Large => "large",
            ImageSize::Full => "full",
        }
    }
}

impl fmt::Display for ImageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "medium" => Ok(ImageSize::Medium),
            "large" => Ok(ImageSize::Large),
            "full" => Ok(ImageSize::Full),
            other => Err(format!("unknown image size: {}", other)),
        }
    }
}

/// Resolve the featured image URL of `post` for `size`
///
/// Falls back to the canonical upload when the rendition is missing, and to
/// [`PLACEHOLDER_IMAGE`] when nothing usable is embedded.
pub fn featured_image_url(post: &Post, size: ImageSize) -> String {
    featured_image_or(post, size, PLACEHOLDER_IMAGE)
}

/// Like [`featured_image_url`] with a caller-supplied placeholder
pub fn featured_image_or(post: &Post, size: ImageSize, placeholder: &str) -> String {
    let Some(media) = post.featured_media() else {
        return placeholder.to_string();
    };

    let sized = media
        .media_details
        .as_ref()
        .and_then(|d| d.sizes.get(size.as_str()))
        .map(|s| s.source_url.as_str())
        .filter(|url| !url.is_empty());

    match sized {
        Some(url) => url.to_string(),
        None if !media.source_url.is_empty() => media.source_url.clone(),
        None => placeholder.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Embedded, Media, MediaDetails, MediaSize};
    use std::collections::HashMap;

    fn post_with_media(sizes: &[(&str, &str)]) -> Post {
        let sizes: HashMap<String, MediaSize> = sizes
            .iter()
            .map(|(k, v)| {
                (
                    k.to_string(),
                    MediaSize {
                        source_url: v.to_string(),
                    },
                )
            })
            .collect();

        let mut post = Post::new(1, "p", "P", "2024-01-01T00:00:00");
        post.embedded = Some(Embedded {
            featured_media: vec![Media {
                source_url: "https://cdn/full.jpg".to_string(),
                alt_text: String::new(),
                media_details: Some(MediaDetails { sizes }),
            }],
        });
        post
    }

    #[test]
    fn test_size_specific_url() {
        let post = post_with_media(&[("medium", "https://cdn/m.jpg")]);
        assert_eq!(featured_image_url(&post, ImageSize::Medium), "https://cdn/m.jpg");
    }

    #[test]
    fn test_falls_back_to_source_url() {
        let post = post_with_media(&[("medium", "https://cdn/m.jpg")]);
        assert_eq!(featured_image_url(&post, ImageSize::Large), "https://cdn/full.jpg");
    }

    #[test]
    fn test_placeholder_without_media() {
        let post = Post::new(1, "p", "P", "2024-01-01T00:00:00");
        assert_eq!(featured_image_url(&post, ImageSize::Large), PLACEHOLDER_IMAGE);

        let mut empty = post.clone();
        empty.embedded = Some(Embedded::default());
        assert_eq!(featured_image_url(&empty, ImageSize::Full), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_custom_placeholder() {
        let post = Post::new(1, "p", "P", "2024-01-01T00:00:00");
        assert_eq!(featured_image_or(&post, ImageSize::Medium, "/blank.png"), "/blank.png");
    }

    #[test]
    fn test_parse_size() {
        assert_eq!("full".parse::<ImageSize>(), Ok(ImageSize::Full));
        assert!("huge".parse::<ImageSize>().is_err());
        assert_eq!(ImageSize::default().to_string(), "large");
    }
}
