//! HTTP clients for the WordPress REST API and the site's own feed endpoint

use anyhow::{bail, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::{Page, Post, PostBatch};
use crate::cache::ResponseCache;
use crate::config::SiteConfig;

/// Header carrying the page count of a collection
pub const TOTAL_PAGES_HEADER: &str = "X-WP-TotalPages";

/// Read access to published content
///
/// Implementations never fail: an unreachable or misbehaving backend
/// yields an empty batch, `None` or an empty list, and the failure is logged.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch one page of posts, newest first
    async fn fetch_posts(&self, page: u32, per_page: u32) -> PostBatch;

    /// Fetch a single post by slug
    async fn fetch_post(&self, slug: &str) -> Option<Post>;

    /// Fetch all static pages
    async fn fetch_pages(&self) -> Vec<Page>;

    /// Fetch a single static page by slug
    async fn fetch_page(&self, slug: &str) -> Option<Page>;
}

/// A raw successful response, as stored in the cache
#[derive(Debug, Clone)]
struct CachedBody {
    body: String,
    total_pages: Option<u32>,
}

/// WordPress REST API client
#[derive(Debug)]
pub struct WordPressClient {
    client: Client,
    api_url: String,
    cache: ResponseCache<CachedBody>,
}

impl WordPressClient {
    /// Create a client for the API configured in `config`
    pub fn new(config: &SiteConfig) -> Result<Self> {
        Self::with_options(&config.api_url, config.request_timeout(), config.revalidate())
    }

    /// Create a client for `api_url` (e.g. `https://example.com/wp-json/wp/v2`)
    pub fn with_options(api_url: &str, timeout: Duration, revalidate: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pulp-rs/", env!("CARGO_PKG_VERSION")))
            .build()?;

        tracing::debug!("Content API: {}", api_url);

        Ok(Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            cache: ResponseCache::new(revalidate),
        })
    }

    /// Build an endpoint URL under the API root
    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }

    /// GET a collection and decode it, consulting the cache first
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<(T, Option<u32>)> {
        let request = self.client.get(self.endpoint(path)).query(query).build()?;
        let key = request.url().to_string();

        if let Some(hit) = self.cache.get(&key) {
            tracing::debug!("Cache hit: {}", key);
            return Ok((serde_json::from_str(&hit.body)?, hit.total_pages));
        }

        tracing::debug!("GET {}", key);
        let response = self.client.execute(request).await?;

        let status = response.status();
        if !status.is_success() {
            bail!("{} returned {}", key, status);
        }

        let total_pages = response
            .headers()
            .get(TOTAL_PAGES_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok());

        let body = response.text().await?;
        let value = serde_json::from_str(&body)?;

        self.cache.insert(key, CachedBody { body, total_pages });
        Ok((value, total_pages))
    }

    /// Forget every cached response
    pub fn invalidate(&self) {
        self.cache.clear();
    }
}

#[async_trait]
impl ContentSource for WordPressClient {
    async fn fetch_posts(&self, page: u32, per_page: u32) -> PostBatch {
        let query = [
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
            ("_embed", "1".to_string()),
        ];

        match self.get::<Vec<Post>>("posts", &query).await {
            Ok((posts, total_pages)) => PostBatch {
                posts,
                total_pages: total_pages.unwrap_or(1),
            },
            Err(e) => {
                tracing::error!("Error fetching posts: {}", e);
                PostBatch::empty()
            }
        }
    }

    async fn fetch_post(&self, slug: &str) -> Option<Post> {
        let query = [("slug", slug.to_string()), ("_embed", "1".to_string())];

        match self.get::<Vec<Post>>("posts", &query).await {
            Ok((posts, _)) => posts.into_iter().next(),
            Err(e) => {
                tracing::error!("Error fetching post {}: {}", slug, e);
                None
            }
        }
    }

    async fn fetch_pages(&self) -> Vec<Page> {
        match self.get::<Vec<Page>>("pages", &[]).await {
            Ok((pages, _)) => pages,
            Err(e) => {
                tracing::error!("Error fetching pages: {}", e);
                Vec::new()
            }
        }
    }

    async fn fetch_page(&self, slug: &str) -> Option<Page> {
        let query = [("slug", slug.to_string())];

        match self.get::<Vec<Page>>("pages", &query).await {
            Ok((pages, _)) => pages.into_iter().next(),
            Err(e) => {
                tracing::error!("Error fetching page {}: {}", slug, e);
                None
            }
        }
    }
}

/// Client for the site's own `/api/posts` endpoint
///
/// Unlike [`WordPressClient`], failures are returned to the caller so the
/// feed controller can stop paging.
#[derive(Debug, Clone)]
pub struct FeedClient {
    client: Client,
    site_url: String,
}

impl FeedClient {
    /// Create a client for a running pulp-rs server at `site_url`
    pub fn new(site_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            site_url: site_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch one page of posts through the internal endpoint
    pub async fn fetch(&self, page: u32, per_page: u32) -> Result<PostBatch> {
        let response = self
            .client
            .get(format!("{}/api/posts", self.site_url))
            .query(&[("page", page), ("per_page", per_page)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            bail!("/api/posts returned {}", status);
        }

        Ok(response.json().await?)
    }
}
