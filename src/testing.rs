//! Test fixtures: an in-process stand-in for WordPress and Gravity Forms

use async_trait::async_trait;
use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::content::{ContentSource, Page, Post, PostBatch};

/// Shared state of the fake backend
#[derive(Debug, Clone, Default)]
pub struct FakeWordPress {
    pub posts: Arc<Vec<Post>>,
    pub pages: Arc<Vec<Page>>,
    /// Requests served by the content routes
    pub hits: Arc<AtomicUsize>,
    /// When set, every route answers 500
    pub fail: Arc<AtomicBool>,
    /// Bodies received by the forms route
    pub submissions: Arc<Mutex<Vec<Value>>>,
}

impl FakeWordPress {
    /// A backend holding `count` posts (`post-1` newest) and an about page
    pub fn with_posts(count: u64) -> Self {
        let posts = (1..=count).map(sample_post).collect();
        let about = Page {
            id: 100,
            title: "About".into(),
            content: "<p>About us</p>".into(),
            slug: "about".to_string(),
        };

        Self {
            posts: Arc::new(posts),
            pages: Arc::new(vec![about]),
            ..Default::default()
        }
    }

    pub fn submission_count(&self) -> usize {
        self.submissions.lock().map(|s| s.len()).unwrap_or(0)
    }
}

/// A post with a date in January 2024 and no embedded media
pub fn sample_post(id: u64) -> Post {
    let mut post = Post::new(
        id,
        &format!("post-{}", id),
        &format!("Post {}", id),
        &format!("2024-01-{:02}T10:00:00", (id % 28) + 1),
    );
    post.excerpt = format!("<p>Excerpt of <b>post {}</b></p>", id).as_str().into();
    post.content = format!("<p>Body of post {}</p>", id).as_str().into();
    post
}

/// Serve `wp` on an ephemeral port and return its base URL
pub async fn spawn_wordpress(wp: FakeWordPress) -> String {
    let app = Router::new()
        .route("/wp-json/wp/v2/posts", get(posts_handler))
        .route("/wp-json/wp/v2/pages", get(pages_handler))
        .route("/wp-json/gf/v2/forms/:id/submissions", post(submission_handler))
        .with_state(wp);

    spawn_router(app).await
}

/// Serve any router on an ephemeral port and return its base URL
pub async fn spawn_router(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

async fn posts_handler(
    State(wp): State<FakeWordPress>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    wp.hits.fetch_add(1, Ordering::SeqCst);
    if wp.fail.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    if let Some(slug) = query.get("slug") {
        let matched: Vec<&Post> = wp.posts.iter().filter(|p| &p.slug == slug).collect();
        return Json(matched).into_response();
    }

    let page: usize = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(1);
    let per_page: usize = query.get("per_page").and_then(|p| p.parse().ok()).unwrap_or(10);
    let total_pages = wp.posts.len().div_ceil(per_page);

    if page > total_pages.max(1) {
        return StatusCode::BAD_REQUEST.into_response();
    }

    let slice: Vec<&Post> = wp.posts.iter().skip((page - 1) * per_page).take(per_page).collect();

    let mut headers = HeaderMap::new();
    headers.insert("X-WP-TotalPages", HeaderValue::from(total_pages));
    (headers, Json(slice)).into_response()
}

async fn pages_handler(
    State(wp): State<FakeWordPress>,
    Query(query): Query<HashMap<String, String>>,
) -> Response {
    wp.hits.fetch_add(1, Ordering::SeqCst);
    if wp.fail.load(Ordering::SeqCst) {
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    let pages: Vec<&Page> = wp
        .pages
        .iter()
        .filter(|p| query.get("slug").map_or(true, |slug| &p.slug == slug))
        .collect();
    Json(pages).into_response()
}

async fn submission_handler(
    State(wp): State<FakeWordPress>,
    Path(_id): Path<u32>,
    Json(body): Json<Value>,
) -> Response {
    if let Ok(mut submissions) = wp.submissions.lock() {
        submissions.push(body);
    }

    if wp.fail.load(Ordering::SeqCst) {
        let error = serde_json::json!({ "code": "gform_error", "message": "Form is closed" });
        return (StatusCode::BAD_REQUEST, Json(error)).into_response();
    }

    Json(serde_json::json!({ "is_valid": true })).into_response()
}

/// A [`ContentSource`] backed by in-memory lists
#[derive(Debug, Clone, Default)]
pub struct MemoryContent {
    pub posts: Vec<Post>,
    pub pages: Vec<Page>,
}

impl MemoryContent {
    /// Same content as [`FakeWordPress::with_posts`]
    pub fn with_posts(count: u64) -> Self {
        let wp = FakeWordPress::with_posts(count);
        Self {
            posts: wp.posts.to_vec(),
            pages: wp.pages.to_vec(),
        }
    }
}

#[async_trait]
impl ContentSource for MemoryContent {
    async fn fetch_posts(&self, page: u32, per_page: u32) -> PostBatch {
        let per_page = per_page.max(1) as usize;
        let skip = (page.max(1) as usize - 1) * per_page;
        PostBatch {
            posts: self.posts.iter().skip(skip).take(per_page).cloned().collect(),
            total_pages: self.posts.len().div_ceil(per_page) as u32,
        }
    }

    async fn fetch_post(&self, slug: &str) -> Option<Post> {
        self.posts.iter().find(|p| p.slug == slug).cloned()
    }

    async fn fetch_pages(&self) -> Vec<Page> {
        self.pages.clone()
    }

    async fn fetch_page(&self, slug: &str) -> Option<Page> {
        self.pages.iter().find(|p| p.slug == slug).cloned()
    }
}
