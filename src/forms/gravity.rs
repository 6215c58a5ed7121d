//! Gravity Forms REST client

use async_trait::async_trait;
use indexmap::IndexMap;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use crate::config::SiteConfig;

/// Why a forms backend did not accept a submission
#[derive(Error, Debug)]
pub enum FormsError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Form rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Somewhere form submissions can be delivered
#[async_trait]
pub trait FormsBackend: Send + Sync {
    /// Deliver `fields` (input id → value) to form `form_id`
    async fn submit(&self, form_id: u32, fields: &IndexMap<String, String>)
        -> Result<(), FormsError>;
}

/// Error body returned by the Gravity Forms API
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Gravity Forms REST API client
#[derive(Debug, Clone)]
pub struct GravityForms {
    client: Client,
    endpoint: String,
}

impl GravityForms {
    /// Create a client for the endpoint configured in `config`
    pub fn new(config: &SiteConfig) -> anyhow::Result<Self> {
        Self::with_endpoint(&config.forms.endpoint, config.request_timeout())
    }

    /// Create a client for `endpoint` (e.g. `https://example.com/wp-json/gf/v2`)
    pub fn with_endpoint(endpoint: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    fn submissions_url(&self, form_id: u32) -> String {
        format!("{}/forms/{}/submissions", self.endpoint, form_id)
    }
}

#[async_trait]
impl FormsBackend for GravityForms {
    async fn submit(
        &self,
        form_id: u32,
        fields: &IndexMap<String, String>,
    ) -> Result<(), FormsError> {
        let url = self.submissions_url(form_id);
        tracing::debug!("POST {}", url);

        let response = self.client.post(&url).json(fields).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(|body| body.message)
            .unwrap_or_else(|| "Failed to submit form".to_string());

        Err(FormsError::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
