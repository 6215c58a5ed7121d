//! Terminal preview of the hero slider

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::content::ContentSource;
use crate::controllers::{Carousel, CarouselState, CarouselTiming, Nav};
use crate::helpers::{ImageSize, PostSummary, SLIDE_EXCERPT_LENGTH};
use crate::Pulp;

/// Rotate through the latest posts until Ctrl+C
///
/// Typing `n`, `p` or a slide number followed by Enter navigates manually.
pub async fn run(pulp: &Pulp) -> Result<()> {
    let client = pulp.content_client()?;
    let batch = client.fetch_posts(1, pulp.config.per_page).await;

    let slides = batch.posts.iter().map(|post| {
        PostSummary::from_post(&pulp.config, post, ImageSize::Large, SLIDE_EXCERPT_LENGTH)
    });
    let carousel = Carousel::new(slides, pulp.config.slider.count);
    if carousel.is_empty() {
        println!("No posts available");
        return Ok(());
    }

    let active = carousel.activate(CarouselTiming::from(&pulp.config.slider));
    let mut changes = active.subscribe();
    let mut input = BufReader::new(tokio::io::stdin()).lines();

    println!("n = next, p = previous, 1-{} = jump, Ctrl+C = quit", active.items().len());
    let mut shown = active.state();
    print_slide(active.items(), shown);

    loop {
        tokio::select! {
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = *changes.borrow_and_update();
                if state.index() != shown.index() {
                    print_slide(active.items(), state);
                    shown = state;
                }
            }
            line = input.next_line() => match line? {
                Some(line) => match parse_nav(&line) {
                    Some(nav) => active.navigate(nav),
                    None => println!("?"),
                },
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    active.deactivate();
    Ok(())
}

fn print_slide(slides: &[PostSummary], state: CarouselState) {
    if let Some(slide) = slides.get(state.index()) {
        println!("{}", describe(slide, state));
    }
}

/// One slide as two lines of text
fn describe(slide: &PostSummary, state: CarouselState) -> String {
    format!(
        "[{}/{}] {} - {}\n      {}",
        state.index() + 1,
        state.len(),
        slide.date.full,
        slide.title,
        slide.excerpt
    )
}

/// Parse a navigation command typed by the user
fn parse_nav(line: &str) -> Option<Nav> {
    match line.trim() {
        "n" | "next" => Some(Nav::Next),
        "p" | "prev" => Some(Nav::Prev),
        other => other
            .parse::<usize>()
            .ok()
            .filter(|n| *n >= 1)
            .map(|n| Nav::Jump(n - 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::testing::sample_post;

    #[test]
    fn test_parse_nav() {
        assert_eq!(parse_nav("n\n"), Some(Nav::Next));
        assert_eq!(parse_nav("prev"), Some(Nav::Prev));
        assert_eq!(parse_nav("3"), Some(Nav::Jump(2)));
        assert_eq!(parse_nav("0"), None);
        assert_eq!(parse_nav("x"), None);
    }

    #[test]
    fn test_describe() {
        let config = SiteConfig::default();
        let slide = PostSummary::from_post(&config, &sample_post(2), ImageSize::Large, 10);
        let mut state = CarouselState::new(4);
        state.request(Nav::Jump(1));

        assert_eq!(
            describe(&slide, state),
            "[2/4] January 03, 2024 - Post 2\n      Excerpt of..."
        );
    }
}
