//! List site content

use anyhow::Result;
use std::sync::Arc;

use crate::content::{ContentSource, FeedClient};
use crate::controllers::{LoadOutcome, PageLoader, PostFeed};
use crate::helpers::{format_date, strip_html};
use crate::Pulp;

/// List site content by type
///
/// Posts are read through a [`PostFeed`]; with `all` it keeps loading until
/// the feed runs dry. `via` points at a running pulp-rs server whose
/// `/api/posts` endpoint is used instead of the CMS.
pub async fn run(pulp: &Pulp, content_type: &str, all: bool, via: Option<&str>) -> Result<()> {
    let per_page = pulp.config.per_page;

    match content_type {
        "post" | "posts" => match via {
            Some(site_url) => {
                let client = FeedClient::new(site_url, pulp.config.request_timeout())?;
                let first = client.fetch(1, per_page).await?;
                list_posts(PostFeed::from_batch(client, first, per_page), all).await;
            }
            None => {
                let client: Arc<dyn ContentSource> = Arc::new(pulp.content_client()?);
                let first = client.fetch_posts(1, per_page).await;
                list_posts(PostFeed::from_batch(client, first, per_page), all).await;
            }
        },
        "page" | "pages" => {
            let pages = pulp.content_client()?.fetch_pages().await;
            println!("Pages ({}):", pages.len());
            for page in pages {
                println!("  {} [{}]", strip_html(&page.title.rendered), page.slug);
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, page", content_type);
        }
    }

    Ok(())
}

async fn list_posts<L: PageLoader>(feed: PostFeed<L>, all: bool) {
    if all {
        while let LoadOutcome::Loaded(count) = feed.load_more().await {
            tracing::debug!("Loaded {} more posts (page {})", count, feed.cursor().current);
        }
    }

    print!("{}", render_posts(&feed));
}

/// Text listing of everything the feed holds so far
fn render_posts<L: PageLoader>(feed: &PostFeed<L>) -> String {
    let posts = feed.posts();
    let mut out = format!("Posts ({}):\n", posts.len());

    for post in &posts {
        out.push_str(&format!(
            "  {} - {} [{}]\n",
            format_date(&post.date).full,
            strip_html(&post.title.rendered),
            post.slug
        ));
    }

    if feed.has_more() {
        let cursor = feed.cursor();
        out.push_str(&format!(
            "  ... page {} of {}, use --all to load the rest\n",
            cursor.current, cursor.total_pages
        ));
    }

    out
}
