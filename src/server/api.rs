//! JSON endpoints: `/api/posts` and `/api/contact`

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

use super::AppState;
use crate::content::PostBatch;
use crate::forms::{ContactReply, ContactSubmission, ValidationError};

/// Largest page size the content API accepts
const MAX_PER_PAGE: u32 = 100;

/// Shown to the visitor for any unexpected failure
const GENERIC_ERROR: &str = "An error occurred. Please try again later.";

/// Errors surfaced by the JSON endpoints
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(e) => {
                (StatusCode::BAD_REQUEST, Json(ContactReply::failed(&e.to_string()))).into_response()
            }
            ApiError::Internal(e) => {
                tracing::error!("Request failed: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ContactReply::failed(GENERIC_ERROR)),
                )
                    .into_response()
            }
        }
    }
}

/// Raw `/api/posts` query; unparseable values fall back to defaults
#[derive(Debug, Default, Deserialize)]
pub struct PostsQuery {
    page: Option<String>,
    per_page: Option<String>,
}

impl PostsQuery {
    fn page(&self) -> u32 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1)
    }

    fn per_page(&self, default: u32) -> u32 {
        self.per_page
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(default)
            .min(MAX_PER_PAGE)
    }
}

/// `GET /api/posts?page=&per_page=`
pub async fn posts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PostsQuery>,
) -> Json<PostBatch> {
    let page = query.page();
    let per_page = query.per_page(state.config.per_page);
    tracing::debug!("Posts API: page {} ({} per page)", page, per_page);

    Json(state.content.fetch_posts(page, per_page).await)
}

/// `POST /api/contact`
pub async fn contact(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<Json<ContactReply>, ApiError> {
    let body: Value = serde_json::from_slice(&body).map_err(|e| ApiError::Internal(e.into()))?;
    let valid = ContactSubmission::from_json(&body).validate()?;

    Ok(Json(state.contact.submit(&valid).await))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: Option<&str>, per_page: Option<&str>) -> PostsQuery {
        PostsQuery {
            page: page.map(String::from),
            per_page: per_page.map(String::from),
        }
    }

    #[test]
    fn test_query_defaults() {
        let q = query(None, None);
        assert_eq!(q.page(), 1);
        assert_eq!(q.per_page(9), 9);
    }

    #[test]
    fn test_query_garbage_and_bounds() {
        assert_eq!(query(Some("abc"), None).page(), 1);
        assert_eq!(query(Some("0"), None).page(), 1);
        assert_eq!(query(Some("3"), None).page(), 3);
        assert_eq!(query(None, Some("-2")).per_page(9), 9);
        assert_eq!(query(None, Some("500")).per_page(9), 100);
    }
}
