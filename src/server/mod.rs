//! HTTP server: HTML pages plus the JSON endpoints for posts and the contact form

pub mod api;
pub mod views;

use anyhow::Result;
use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::SiteConfig;
use crate::content::{ContentSource, WordPressClient};
use crate::controllers::{Carousel, LoadOutcome, Nav, PostFeed};
use crate::forms::{ContactProxy, FormsBackend, GravityForms};
use crate::Pulp;

/// Server state shared by every handler
pub struct AppState {
    pub config: SiteConfig,
    pub content: Arc<dyn ContentSource>,
    pub contact: ContactProxy,
    pub public_dir: PathBuf,
}

impl AppState {
    pub fn new(
        config: SiteConfig,
        content: Arc<dyn ContentSource>,
        forms: Arc<dyn FormsBackend>,
        public_dir: PathBuf,
    ) -> Self {
        let contact = ContactProxy::new(forms, config.forms.clone());
        Self {
            config,
            content,
            contact,
            public_dir,
        }
    }
}

/// Build the application router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home_handler))
        .route("/post/:slug", get(post_handler))
        .route("/about", get(about_handler))
        .route("/api/posts", get(api::posts))
        .route("/api/contact", post(api::contact))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(pulp: &Pulp, ip: &str, port: u16) -> Result<()> {
    let content = Arc::new(WordPressClient::new(&pulp.config)?);
    let forms = Arc::new(GravityForms::new(&pulp.config)?);
    let state = Arc::new(AppState::new(
        pulp.config.clone(),
        content,
        forms,
        pulp.public_dir.clone(),
    ));

    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for Ctrl+C: {}", e);
    }
}

/// Most grid pages the home page will load for `?pages=`
const MAX_HOME_PAGES: u32 = 20;

/// Home page query: `?slide=` picks the shown slide, `?pages=` how many
/// grid pages are loaded. Unparseable values are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct HomeQuery {
    slide: Option<String>,
    pages: Option<String>,
}

impl HomeQuery {
    fn slide(&self) -> Option<usize> {
        self.slide.as_deref().and_then(|s| s.trim().parse().ok())
    }

    fn pages(&self) -> u32 {
        self.pages
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(1)
            .clamp(1, MAX_HOME_PAGES)
    }
}

/// Homepage: one upfront fetch seeds both the slider and the grid
async fn home_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<HomeQuery>,
) -> Html<String> {
    let per_page = state.config.per_page;
    let batch = state.content.fetch_posts(1, per_page).await;

    let slider = Carousel::new(batch.posts.iter().cloned(), state.config.slider.count);
    let mut shown = slider.initial_state();
    if let Some(index) = query.slide() {
        if shown.request(Nav::Jump(index)) {
            shown.settle();
        }
    }

    let feed = PostFeed::from_batch(state.content.clone(), batch, per_page);
    while feed.cursor().current < query.pages() {
        if !matches!(feed.load_more().await, LoadOutcome::Loaded(_)) {
            break;
        }
    }

    Html(views::home(
        &state.config,
        slider.items(),
        shown,
        &feed.posts(),
        feed.cursor(),
        feed.has_more(),
    ))
}

async fn post_handler(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    match state.content.fetch_post(&slug).await {
        Some(post) => Html(views::post(&state.config, &post)).into_response(),
        None => not_found(&state),
    }
}

async fn about_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    let page = state.content.fetch_page("about").await;
    Html(views::about(&state.config, page.as_ref()))
}

/// Serve static files from the public directory, 404 page otherwise
async fn fallback_handler(State(state): State<Arc<AppState>>, request: Request<Body>) -> Response {
    let mut service = ServeDir::new(&state.public_dir);
    match service.try_call(request).await {
        Ok(response) if response.status() != StatusCode::NOT_FOUND => response.into_response(),
        Ok(_) => not_found(&state),
        Err(e) => {
            tracing::error!("Static file error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

fn not_found(state: &AppState) -> Response {
    (StatusCode::NOT_FOUND, Html(views::not_found(&state.config))).into_response()
}
