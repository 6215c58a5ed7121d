//! HTML views
//!
//! Plain markup. Slider navigation and "Show more" are ordinary links
//! back to the home page; a small inline script animates the slider.

use crate::config::SiteConfig;
use crate::content::{Page, Post};
use crate::controllers::{CarouselState, Nav, PageCursor};
use crate::helpers::{
    date_xml, featured_image_or, format_date, html_escape, image_tag, link_to, parse_date,
    share_links, strip_html, ImageSize, PostSummary, CARD_EXCERPT_LENGTH, SLIDE_EXCERPT_LENGTH,
};

/// Wrap `body` in the site layout
pub fn layout(config: &SiteConfig, title: Option<&str>, body: &str) -> String {
    let title = match title {
        Some(t) => format!("{} - {}", t, config.title),
        None => config.title.clone(),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<link rel="stylesheet" href="/style.css">
</head>
<body>
<header class="site-header"><a class="logo" href="/">{site}</a>
<nav><a href="/">Home</a> <a href="/about">About</a> <a href="/#contact">Contact</a></nav>
</header>
<main>
{body}
</main>
<footer class="site-footer">&copy; {site}</footer>
</body>
</html>
"#,
        title = html_escape(&title),
        site = html_escape(&config.title),
        body = body,
    )
}

/// Homepage: hero slider over `slides`, then the first page of the grid
pub fn home(
    config: &SiteConfig,
    slides: &[Post],
    slider: CarouselState,
    posts: &[Post],
    cursor: PageCursor,
    has_more: bool,
) -> String {
    let mut body = String::new();
    body.push_str(&hero_slider(config, slides, slider));
    body.push_str(&blog_grid(config, posts, cursor, has_more));
    layout(config, None, &body)
}

/// The rotating hero slider
pub fn hero_slider(config: &SiteConfig, slides: &[Post], state: CarouselState) -> String {
    if slides.is_empty() {
        return r#"<div class="hero-slider empty"><p>No posts available</p></div>"#.to_string();
    }

    let mut html = format!(
        r#"<div class="hero-slider" data-interval="{}" data-settle="{}">"#,
        config.slider.interval, config.slider.settle
    );

    for (i, post) in slides.iter().enumerate() {
        let summary = PostSummary::from_post(config, post, ImageSize::Large, SLIDE_EXCERPT_LENGTH);
        let class = if i == state.index() { "slide active" } else { "slide" };
        html.push_str(&format!(
            r#"<div class="{}">{}<div class="slide-body"><div class="date">{}</div><h3>{}</h3><p>{}</p>{}</div></div>"#,
            class,
            image_tag(&summary.image, &summary.title, None),
            summary.date.full,
            link_to(&summary.path, &post.title.rendered, false),
            html_escape(&summary.excerpt),
            link_to(&summary.path, "Read More", false),
        ));
    }

    // Where Prev and Next lead from the shown slide
    let target = |nav| {
        let mut next = state;
        next.request(nav);
        next.index()
    };
    let (prev, next) = (target(Nav::Prev), target(Nav::Next));
    html.push_str(&format!(
        r#"<a class="slider-nav prev" href="/?slide={prev}" data-slide="{prev}" aria-label="Previous slide">&lsaquo;</a>"#
    ));
    html.push_str(&format!(
        r#"<a class="slider-nav next" href="/?slide={next}" data-slide="{next}" aria-label="Next slide">&rsaquo;</a>"#
    ));

    html.push_str(r#"<div class="indicators">"#);
    for i in 0..slides.len() {
        let class = if i == state.index() { " active" } else { "" };
        html.push_str(&format!(
            r#"<a class="indicator{}" href="/?slide={}" data-slide="{}" aria-label="Go to slide {}"></a>"#,
            class,
            i,
            i,
            i + 1
        ));
    }
    html.push_str("</div></div>");
    html.push_str(SLIDER_SCRIPT);
    html
}

/// Browser driver for the hero slider
///
/// Advances every `data-interval` ms and ignores clicks for `data-settle` ms
/// after each change. Without it the nav links reload the page on the
/// requested slide.
pub const SLIDER_SCRIPT: &str = r#"<script>
(function () {
  var slider = document.querySelector('.hero-slider[data-interval]');
  if (!slider) return;
  var slides = slider.querySelectorAll('.slide');
  var dots = slider.querySelectorAll('.indicator');
  var interval = parseInt(slider.getAttribute('data-interval'), 10) || 6000;
  var settle = parseInt(slider.getAttribute('data-settle'), 10) || 500;
  var current = 0;
  var settling = false;
  for (var i = 0; i < slides.length; i++) {
    if (slides[i].classList.contains('active')) current = i;
  }
  function show(target) {
    if (settling || isNaN(target) || target < 0 || target >= slides.length) return;
    slides[current].classList.remove('active');
    if (dots[current]) dots[current].classList.remove('active');
    current = target;
    slides[current].classList.add('active');
    if (dots[current]) dots[current].classList.add('active');
    settling = true;
    setTimeout(function () { settling = false; }, settle);
  }
  slider.addEventListener('click', function (event) {
    var link = event.target.closest('.slider-nav, .indicator');
    if (!link) return;
    event.preventDefault();
    if (link.classList.contains('prev')) show((current + slides.length - 1) % slides.length);
    else if (link.classList.contains('next')) show((current + 1) % slides.length);
    else show(parseInt(link.getAttribute('data-slide'), 10));
  });
  setInterval(function () { show((current + 1) % slides.length); }, interval);
})();
</script>"#;

/// The post grid with its "Show more" link
///
/// The link asks for the home page with one more page of posts loaded.
pub fn blog_grid(config: &SiteConfig, posts: &[Post], cursor: PageCursor, has_more: bool) -> String {
    let mut html = String::from(
        r#"<section class="blog-grid" id="more"><h5 class="section-title">Latest Blog Posts</h5><div class="masonry-grid">"#,
    );

    if posts.is_empty() {
        html.push_str("<p>No posts available</p>");
    }
    for post in posts {
        html.push_str(&post_card(config, post));
    }
    html.push_str("</div>");

    if has_more {
        html.push_str(&format!(
            r#"<div class="load-more"><a class="btn-primary" href="/?pages={next}#more" data-next-page="{next}" data-per-page="{per_page}">Show more</a></div>"#,
            next = cursor.current + 1,
            per_page = cursor.per_page
        ));
    }

    html.push_str("</section>");
    html
}

fn post_card(config: &SiteConfig, post: &Post) -> String {
    let summary = PostSummary::from_post(config, post, ImageSize::Medium, CARD_EXCERPT_LENGTH);
    let share = share_links(config, post, None);

    format!(
        r#"<article class="post-card"><a href="{path}">{img}</a><div class="date-badge"><span class="day">{day}</span><span class="month">{month}</span></div><h5>{title}</h5><p>{excerpt}</p><div class="social-share">Share on: {fb} {tw} {pin}</div></article>"#,
        path = html_escape(&summary.path),
        img = image_tag(&summary.image, &summary.title, None),
        day = summary.date.day,
        month = summary.date.month,
        title = link_to(&summary.path, &post.title.rendered, false),
        excerpt = html_escape(&summary.excerpt),
        fb = link_to(&share.facebook, "Facebook", true),
        tw = link_to(&share.twitter, "Twitter", true),
        pin = link_to(&share.pinterest, "Pinterest", true),
    )
}

/// A single post
pub fn post(config: &SiteConfig, post: &Post) -> String {
    let image = featured_image_or(post, ImageSize::Large, &config.placeholder_image);
    let title = strip_html(&post.title.rendered);
    let date = format_date(&post.date);
    let datetime = parse_date(&post.date).map(|d| date_xml(&d)).unwrap_or_default();
    let share = share_links(config, post, Some(&image));

    let body = format!(
        r#"<article class="post"><a class="back" href="/">Back to Blog</a>{img}<header><time class="date" datetime="{datetime}">{date}</time><h1>{heading}</h1></header><div class="prose">{content}</div><div class="share">Share this post: {fb} {tw} {pin}</div><a class="btn-primary" href="/">View All Posts</a></article>"#,
        img = image_tag(&image, &title, Some("featured")),
        date = date.full,
        datetime = datetime,
        heading = post.title.rendered,
        content = post.content.rendered,
        fb = link_to(&share.facebook, "Facebook", true),
        tw = link_to(&share.twitter, "Twitter", true),
        pin = link_to(&share.pinterest, "Pinterest", true),
    );

    layout(config, Some(&title), &body)
}

/// The about page, from the CMS when it has one
pub fn about(config: &SiteConfig, page: Option<&Page>) -> String {
    let (title, content) = match page {
        Some(page) => (strip_html(&page.title.rendered), page.content.rendered.clone()),
        None => (config.about.title.clone(), config.about.body.clone()),
    };

    let image = if config.about.image.is_empty() {
        String::new()
    } else {
        image_tag(&config.about.image, &title, Some("about-image"))
    };

    let body = format!(
        r#"<div class="about">{}<div class="about-body">{}</div></div>"#,
        image, content
    );
    layout(config, Some(&title), &body)
}

/// Shown for unknown paths and missing posts
pub fn not_found(config: &SiteConfig) -> String {
    let body = r#"<div class="not-found"><h1>404</h1><p>The page you are looking for could not be found.</p><a class="btn-primary" href="/">Back to Home</a></div>"#;
    layout(config, Some("Page Not Found"), body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_post;

    fn cursor(total_pages: u32) -> PageCursor {
        PageCursor {
            current: 1,
            per_page: 9,
            total_pages,
        }
    }

    #[test]
    fn test_empty_home() {
        let config = SiteConfig::default();
        let html = home(&config, &[], CarouselState::new(0), &[], cursor(0), false);
        assert!(html.contains("No posts available"));
        assert!(!html.contains("Show more"));
    }

    #[test]
    fn test_active_slide_and_show_more() {
        let config = SiteConfig::default();
        let posts: Vec<Post> = (1..=3).map(sample_post).collect();
        let html = home(&config, &posts, CarouselState::new(3), &posts, cursor(2), true);

        assert_eq!(html.matches(r#"class="slide active""#).count(), 1);
        assert!(html.contains(r#"href="/?pages=2#more""#));
        assert!(html.contains(r#"data-next-page="2""#));
        assert!(html.contains("/post/post-2"));
    }

    #[test]
    fn test_slider_links_follow_state() {
        let config = SiteConfig::default();
        let posts: Vec<Post> = (1..=3).map(sample_post).collect();
        let html = hero_slider(&config, &posts, CarouselState::new(3));

        assert!(html.contains(r#"class="slider-nav prev" href="/?slide=2""#));
        assert!(html.contains(r#"class="slider-nav next" href="/?slide=1""#));
        assert!(html.contains(r#"class="indicator active" href="/?slide=0""#));
        assert!(html.contains(SLIDER_SCRIPT));
    }

    #[test]
    fn test_post_page() {
        let config = SiteConfig::default();
        let html = post(&config, &sample_post(4));
        assert!(html.contains("<title>Post 4 - Design Pulp</title>"));
        assert!(html.contains("<p>Body of post 4</p>"));
        assert!(html.contains(r#"<time class="date" datetime="2024-01-05T10:00:00">January 05, 2024</time>"#));
    }

    #[test]
    fn test_about_fallback() {
        let config = SiteConfig::default();
        let html = about(&config, None);
        assert!(html.contains(&config.about.body));
    }
}
